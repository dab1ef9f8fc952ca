use std::sync::Arc;

use agenda_core::appointments::{Buyer, NewBuyer, NewVendor, Vendor};
use axum::{Json, extract::State, http::StatusCode};

use crate::{error::ErrorServer, extract::AppJson, state::ServerState, util::run_blocking};

#[utoipa::path(
    get,
    path = "/vendors",
    description = "List vendors",
    responses(
        (status = 200, description = "Success", body = [Vendor]),
    )
)]
pub async fn list_vendors(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Vendor>>, ErrorServer> {
    let vendors = run_blocking(&server_state, |s| s.scheduler().list_vendors()).await?;

    Ok(Json(vendors))
}

#[utoipa::path(
    post,
    path = "/vendors",
    request_body = NewVendor,
    description = "Register a vendor",
    responses(
        (status = 201, description = "Created", body = Vendor),
        (status = 400, description = "Bad Request"),
    )
)]
pub async fn register_vendor(
    State(server_state): State<Arc<ServerState>>,
    AppJson(request): AppJson<NewVendor>,
) -> Result<(StatusCode, Json<Vendor>), ErrorServer> {
    let vendor =
        run_blocking(&server_state, move |s| s.scheduler().register_vendor(request)).await?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

#[utoipa::path(
    get,
    path = "/buyers",
    description = "List buyers",
    responses(
        (status = 200, description = "Success", body = [Buyer]),
    )
)]
pub async fn list_buyers(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Buyer>>, ErrorServer> {
    let buyers = run_blocking(&server_state, |s| s.scheduler().list_buyers()).await?;

    Ok(Json(buyers))
}

#[utoipa::path(
    post,
    path = "/buyers",
    request_body = NewBuyer,
    description = "Register a buyer",
    responses(
        (status = 201, description = "Created", body = Buyer),
        (status = 400, description = "Bad Request"),
    )
)]
pub async fn register_buyer(
    State(server_state): State<Arc<ServerState>>,
    AppJson(request): AppJson<NewBuyer>,
) -> Result<(StatusCode, Json<Buyer>), ErrorServer> {
    let buyer = run_blocking(&server_state, move |s| s.scheduler().register_buyer(request)).await?;

    Ok((StatusCode::CREATED, Json(buyer)))
}
