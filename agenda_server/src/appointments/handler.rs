use std::sync::Arc;

use agenda_core::appointments::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentProposal,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use log::debug;

use super::dto::MessageResponse;
use crate::{error::ErrorServer, extract::AppJson, state::ServerState, util::run_blocking};

#[utoipa::path(
    get,
    path = "/appointments",
    description = "List appointments with host and client resolved",
    responses(
        (status = 200, description = "Success", body = [AppointmentDetails]),
    )
)]
pub async fn list_appointments(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<Vec<AppointmentDetails>>, ErrorServer> {
    let appointments = run_blocking(&server_state, |s| s.scheduler().list_appointments()).await?;

    Ok(Json(appointments))
}

#[utoipa::path(
    get,
    path = "/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment id")),
    description = "Get a single appointment",
    responses(
        (status = 200, description = "Success", body = AppointmentDetails),
        (status = 404, description = "Appointment not found"),
    )
)]
pub async fn get_appointment(
    State(server_state): State<Arc<ServerState>>,
    Path(id): Path<AppointmentId>,
) -> Result<Json<AppointmentDetails>, ErrorServer> {
    let appointment = run_blocking(&server_state, move |s| s.scheduler().get_appointment(id)).await?;

    Ok(Json(appointment))
}

#[utoipa::path(
    post,
    path = "/createAppointment",
    request_body = AppointmentProposal,
    description = "Book a new appointment",
    responses(
        (status = 201, description = "Created", body = Appointment),
        (status = 400, description = "Start time in the past, invalid range or invalid fields"),
        (status = 409, description = "Host or client already booked"),
    )
)]
pub async fn create_appointment(
    State(server_state): State<Arc<ServerState>>,
    AppJson(proposal): AppJson<AppointmentProposal>,
) -> Result<(StatusCode, Json<Appointment>), ErrorServer> {
    debug!(
        "Create request for host {} and client {}",
        proposal.host_id, proposal.client_id
    );

    let appointment = run_blocking(&server_state, move |s| {
        s.scheduler().create(proposal, Utc::now())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment id")),
    request_body = AppointmentProposal,
    description = "Replace every field of an appointment",
    responses(
        (status = 200, description = "Success", body = Appointment),
        (status = 400, description = "Start time in the past, invalid range or invalid fields"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Host or client already booked"),
    )
)]
pub async fn update_appointment(
    State(server_state): State<Arc<ServerState>>,
    Path(id): Path<AppointmentId>,
    AppJson(proposal): AppJson<AppointmentProposal>,
) -> Result<Json<Appointment>, ErrorServer> {
    let appointment = run_blocking(&server_state, move |s| {
        s.scheduler().update(id, proposal, Utc::now())
    })
    .await?;

    Ok(Json(appointment))
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment id")),
    description = "Delete an appointment",
    responses(
        (status = 200, description = "Success", body = MessageResponse),
        (status = 404, description = "Appointment not found"),
    )
)]
pub async fn delete_appointment(
    State(server_state): State<Arc<ServerState>>,
    Path(id): Path<AppointmentId>,
) -> Result<Json<MessageResponse>, ErrorServer> {
    run_blocking(&server_state, move |s| s.scheduler().delete(id)).await?;

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully".to_string(),
    }))
}
