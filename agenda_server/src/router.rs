use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::{
    appointments::handler::{
        create_appointment, delete_appointment, get_appointment, list_appointments,
        update_appointment,
    },
    directory::handler::{list_buyers, list_vendors, register_buyer, register_vendor},
    docs::{dto::ApiDoc, handler::api_docs},
    info::handler::info,
    state::ServerState,
};

pub fn router(state: Arc<ServerState>) -> Router {
    let doc = ApiDoc::openapi();

    let appointment_router: Router<Arc<ServerState>> = Router::new()
        .route("/appointments", get(list_appointments))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/createAppointment", post(create_appointment));

    let directory_router: Router<Arc<ServerState>> = Router::new()
        .route("/vendors", get(list_vendors).post(register_vendor))
        .route("/buyers", get(list_buyers).post(register_buyer));

    Router::new()
        .merge(Redoc::with_url("/redoc", doc))
        .merge(appointment_router)
        .merge(directory_router)
        .route("/", get(info))
        .route("/docs", get(api_docs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::appointments::{Scheduler, SledStore};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, Duration, Utc};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn create_test_app() -> (Router, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db = sled::open(temp_dir.path()).unwrap();
        let store = SledStore::new(db).unwrap();
        let state = Arc::new(ServerState::from(Scheduler::from(store)));
        (router(state), temp_dir)
    }

    fn tomorrow_at(hour: u32) -> DateTime<Utc> {
        (Utc::now() + Duration::days(1))
            .date_naive()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
            .and_utc()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, value)
    }

    async fn seed_parties(app: &Router) -> (u64, u64) {
        let (status, vendor) = send(app, "POST", "/vendors", Some(json!({ "name": "Acme" }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, buyer) = send(
            app,
            "POST",
            "/buyers",
            Some(json!({ "name": "Robin", "companyName": "Wayne Enterprises" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        (
            vendor["id"].as_u64().unwrap(),
            buyer["id"].as_u64().unwrap(),
        )
    }

    fn booking(host_id: u64, client_id: u64, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
        json!({
            "title": "Product demo",
            "type": "virtual",
            "location": "HQ",
            "hostId": host_id,
            "clientId": client_id,
            "startTime": start,
            "endTime": end,
        })
    }

    #[tokio::test]
    async fn test_booking_lifecycle() {
        let (app, _temp) = create_test_app();
        let (host_id, client_id) = seed_parties(&app).await;

        let (status, created) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(host_id, client_id, tomorrow_at(10), tomorrow_at(11))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["location"], "");
        assert_eq!(created["type"], "virtual");
        let id = created["id"].as_u64().unwrap();

        let (status, listed) = send(&app, "GET", "/appointments", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["host"]["name"], "Acme");
        assert_eq!(listed[0]["client"]["companyName"], "Wayne Enterprises");

        let (status, fetched) = send(&app, "GET", &format!("/appointments/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Product demo");

        let (status, deleted) = send(&app, "DELETE", &format!("/appointments/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Appointment deleted successfully");

        let (status, missing) = send(&app, "DELETE", &format!("/appointments/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["status"], 404);

        let (status, _) = send(&app, "GET", &format!("/appointments/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_bad_times() {
        let (app, _temp) = create_test_app();
        let (host_id, client_id) = seed_parties(&app).await;

        let yesterday = Utc::now() - Duration::days(1);
        let (status, body) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(host_id, client_id, yesterday, yesterday + Duration::hours(1))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Appointment startTime cannot be in the past");

        let (status, body) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(host_id, client_id, tomorrow_at(10), tomorrow_at(9))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "Appointment endTime cannot be smaller than or equal to startTime"
        );
    }

    #[tokio::test]
    async fn test_conflicts_return_409() {
        let (app, _temp) = create_test_app();
        let (host_id, client_id) = seed_parties(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(host_id, client_id, tomorrow_at(10), tomorrow_at(12))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(host_id, client_id, tomorrow_at(11), tomorrow_at(13))),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body["message"],
            format!(
                "Conflicting appointments found with both the host and the client (Host ID: {}, Client ID: {})",
                host_id, client_id
            )
        );

        let (status, _) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(host_id, client_id, tomorrow_at(12), tomorrow_at(13))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_update_endpoint() {
        let (app, _temp) = create_test_app();
        let (host_id, client_id) = seed_parties(&app).await;

        let original = booking(host_id, client_id, tomorrow_at(10), tomorrow_at(11));
        let (_, created) = send(&app, "POST", "/createAppointment", Some(original.clone())).await;
        let id = created["id"].as_u64().unwrap();

        let (status, unchanged) =
            send(&app, "PUT", &format!("/appointments/{}", id), Some(original)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(unchanged["id"], id);

        let mut moved = booking(host_id, client_id, tomorrow_at(14), tomorrow_at(15));
        moved["type"] = json!("physical");
        let (status, updated) =
            send(&app, "PUT", &format!("/appointments/{}", id), Some(moved.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["location"], "HQ");

        let (status, _) = send(&app, "PUT", "/appointments/9999", Some(moved)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_party_is_bad_request() {
        let (app, _temp) = create_test_app();
        let (_, client_id) = seed_parties(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/createAppointment",
            Some(booking(5555, client_id, tomorrow_at(10), tomorrow_at(11))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unknown host (ID: 5555)");
    }

    #[tokio::test]
    async fn test_directory_and_info() {
        let (app, _temp) = create_test_app();
        seed_parties(&app).await;

        let (status, vendors) = send(&app, "GET", "/vendors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(vendors[0]["name"], "Acme");

        let (status, buyers) = send(&app, "GET", "/buyers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(buyers[0]["companyName"], "Wayne Enterprises");

        let (status, body) = send(&app, "POST", "/vendors", Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Vendor name cannot be empty");

        let (status, info) = send(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["name"], "agenda_server");

        let (status, docs) = send(&app, "GET", "/docs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(docs["paths"]["/createAppointment"].is_object());
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let (app, _temp) = create_test_app();
        let (host_id, client_id) = seed_parties(&app).await;

        let mut hybrid = booking(host_id, client_id, tomorrow_at(10), tomorrow_at(11));
        hybrid["type"] = json!("hybrid");
        let (status, body) = send(&app, "POST", "/createAppointment", Some(hybrid)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);
        assert!(body["message"].as_str().unwrap().contains("hybrid"));

        let mut bad_instant = booking(host_id, client_id, tomorrow_at(10), tomorrow_at(11));
        bad_instant["startTime"] = json!("tomorrow morning");
        let (status, body) = send(&app, "PUT", "/appointments/1", Some(bad_instant)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], 422);

        let (status, body) = send(&app, "POST", "/vendors", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("name"));
    }
}
