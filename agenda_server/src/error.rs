use agenda_core::appointments::SchedulingError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde::Serialize;
use utoipa::{ToResponse, ToSchema};

#[derive(Debug, Serialize, ToResponse, ToSchema)]
pub struct ErrorServer {
    pub message: String,
    pub status: u16,
}

impl std::fmt::Display for ErrorServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ErrorServer {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl From<SchedulingError> for ErrorServer {
    fn from(error: SchedulingError) -> Self {
        let status = match &error {
            SchedulingError::PastStartTime
            | SchedulingError::InvalidRange
            | SchedulingError::InvalidProposal(_)
            | SchedulingError::UnknownParty { .. } => StatusCode::BAD_REQUEST,
            SchedulingError::SchedulingConflict(_) => StatusCode::CONFLICT,
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::StoreFailure(e) => {
                error!("Store failure: {}", e);
                return ErrorServer {
                    status: StatusCode::INTERNAL_SERVER_ERROR.into(),
                    message: "Internal Server Error".to_string(),
                };
            }
        };

        ErrorServer {
            status: status.into(),
            message: error.to_string(),
        }
    }
}
