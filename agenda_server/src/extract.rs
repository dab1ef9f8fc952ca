use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::ErrorServer;

/// `Json` whose rejections use the `ErrorServer` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ErrorServer))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for ErrorServer {
    fn from(rejection: JsonRejection) -> Self {
        ErrorServer {
            status: rejection.status().into(),
            message: rejection.body_text(),
        }
    }
}
