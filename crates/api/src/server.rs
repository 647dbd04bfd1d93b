//! HTTP server for the hotel operations API
//!
//! Staff PIN login, the auto-assignment trigger, push subscription
//! management, guest requests and room transitions, served over axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument};

use innkeep_core::{
    is_valid_topic, Database, GuestRequest, MaintenanceCategory, MaintenanceRecord, Priority,
    PushSubscription, RoomStatus, ServiceKind, Session, SESSION_TTL_HOURS,
};

use crate::dto::{
    Ack, AutoAssignRequest, AutoAssignResponse, CompleteGuestRequest, CreateGuestRequest,
    CreateMaintenanceRequest, GuestRequestDto, MaintenanceActionRequest, MaintenanceDto,
    PinLoginRequest, PushRequest, RoomDto, SessionClaims, TransitionRequest,
};
use crate::error::{Error, Result};

/// Name of the session cookie set on login
pub const SESSION_COOKIE: &str = "innkeep_session";

/// Server state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<Mutex<Database>>,
}

impl ApiState {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

/// Build the API router
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/auth/pin", post(pin_login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/assignments/auto", post(auto_assign_handler))
        .route("/api/push/subscribe", post(push_subscribe_handler))
        .route("/api/push/unsubscribe", post(push_unsubscribe_handler))
        .route("/api/rooms/transition", post(transition_handler))
        .route("/api/requests", post(create_request_handler))
        .route("/api/requests/complete", post(complete_request_handler))
        .route("/api/maintenance", post(create_maintenance_handler))
        .route("/api/maintenance/start", post(start_maintenance_handler))
        .route("/api/maintenance/complete", post(complete_maintenance_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve the API on the given address until shutdown
pub async fn serve(addr: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let app = router(state);

    info!(addr = %addr, "Starting API server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Extract the session token from a bearer header or the session cookie
fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.to_string());
        }
    }

    let cookies = headers.get(COOKIE).and_then(|v| v.to_str().ok())?;
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(token) = cookie.strip_prefix(&format!("{SESSION_COOKIE}=")) {
            return Some(token.to_string());
        }
    }
    None
}

/// Resolve a valid session or fail with a generic 401
async fn require_session(state: &ApiState, headers: &HeaderMap) -> Result<Session> {
    let token = token_from_headers(headers).ok_or(Error::Unauthorized)?;
    let db = state.db.lock().await;
    let session = db.sessions().find_valid(&token)?;
    session.ok_or(Error::Unauthorized)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /api/auth/pin
///
/// Validates the PIN shape before any lookup, then issues a session
/// token and sets the session cookie with the 8-hour expiry.
#[instrument(skip(state, body))]
async fn pin_login_handler(
    State(state): State<ApiState>,
    Json(body): Json<PinLoginRequest>,
) -> Result<impl IntoResponse> {
    let session = {
        let db = state.db.lock().await;
        innkeep_core::login_with_pin(&db, body.hotel_id, &body.pin)?
    };

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        session.token,
        SESSION_TTL_HOURS * 3600
    );

    let claims = SessionClaims::from(session);
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(claims)))
}

/// POST /api/auth/logout
#[instrument(skip(state, headers))]
async fn logout_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Ack>> {
    let session = require_session(&state, &headers).await?;
    let db = state.db.lock().await;
    db.sessions().delete(&session.token)?;
    Ok(Json(Ack { success: true }))
}

/// POST /api/assignments/auto
///
/// The hotel comes from the caller's session; a hotel id in the body
/// must match it.
#[instrument(skip(state, headers, body))]
async fn auto_assign_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<AutoAssignRequest>,
) -> Result<Json<AutoAssignResponse>> {
    let session = require_session(&state, &headers).await?;
    if body.hotel_id.is_some_and(|id| id != session.hotel_id) {
        return Err(Error::Forbidden);
    }
    if let Some(date) = &body.date {
        tracing::debug!(%date, "date hint ignored, sweep uses current state");
    }

    let db = state.db.lock().await;
    let report = innkeep_core::auto_assign(&db, session.hotel_id)?;
    Ok(Json(report.into()))
}

/// POST /api/push/subscribe
#[instrument(skip(state, body), fields(topic = %body.topic))]
async fn push_subscribe_handler(
    State(state): State<ApiState>,
    Json(body): Json<PushRequest>,
) -> Result<Json<Ack>> {
    if !is_valid_topic(&body.topic) {
        return Err(Error::BadRequest("invalid topic".into()));
    }
    if body.token.is_empty() {
        return Err(Error::BadRequest("missing device token".into()));
    }

    let db = state.db.lock().await;
    let subscription = PushSubscription::new(body.hotel_id, body.token, body.topic);
    db.push().subscribe(&subscription)?;
    Ok(Json(Ack { success: true }))
}

/// POST /api/push/unsubscribe
#[instrument(skip(state, body), fields(topic = %body.topic))]
async fn push_unsubscribe_handler(
    State(state): State<ApiState>,
    Json(body): Json<PushRequest>,
) -> Result<Json<Ack>> {
    if !is_valid_topic(&body.topic) {
        return Err(Error::BadRequest("invalid topic".into()));
    }

    let db = state.db.lock().await;
    let removed = db.push().unsubscribe(&body.token, &body.topic)?;
    Ok(Json(Ack { success: removed }))
}

/// POST /api/rooms/transition
///
/// Applies a status transition on behalf of the logged-in staff member.
#[instrument(skip(state, headers, body), fields(room_id = %body.room_id, target = %body.new_status))]
async fn transition_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<RoomDto>> {
    let session = require_session(&state, &headers).await?;

    let new_status = RoomStatus::parse(&body.new_status)
        .ok_or_else(|| Error::BadRequest(format!("unknown status '{}'", body.new_status)))?;

    let db = state.db.lock().await;
    let outcome = innkeep_core::apply_transition(
        &db,
        body.room_id,
        new_status,
        session.staff_id,
        body.note,
    )?;
    Ok(Json(outcome.room.into()))
}

/// POST /api/requests
///
/// Guest self-service: no session, the room is addressed directly.
#[instrument(skip(state, body), fields(room_id = %body.room_id))]
async fn create_request_handler(
    State(state): State<ApiState>,
    Json(body): Json<CreateGuestRequest>,
) -> Result<Json<GuestRequestDto>> {
    let kind = ServiceKind::parse(&body.kind)
        .ok_or_else(|| Error::BadRequest(format!("unknown service kind '{}'", body.kind)))?;
    let priority = match body.priority.as_deref() {
        None => Priority::Normal,
        Some(p) => {
            Priority::parse(p).ok_or_else(|| Error::BadRequest(format!("unknown priority '{p}'")))?
        }
    };

    let db = state.db.lock().await;
    let room = db.rooms().find_by_id(body.room_id)?.ok_or(Error::NotFound)?;
    if room.hotel_id != body.hotel_id {
        return Err(Error::NotFound);
    }

    let mut request = GuestRequest::new(body.hotel_id, body.room_id, kind, priority);
    if let Some(quantity) = body.quantity {
        request = request.with_quantity(quantity);
    }
    db.requests().create(&request)?;
    Ok(Json(request.into()))
}

/// POST /api/requests/complete
#[instrument(skip(state, headers, body), fields(request_id = %body.request_id))]
async fn complete_request_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<CompleteGuestRequest>,
) -> Result<Json<GuestRequestDto>> {
    let session = require_session(&state, &headers).await?;

    let db = state.db.lock().await;
    let request = db
        .requests()
        .find_by_id(body.request_id)?
        .ok_or(Error::NotFound)?;
    if request.hotel_id != session.hotel_id {
        return Err(Error::NotFound);
    }

    if !db.requests().complete(request.id, session.staff_id)? {
        return Err(Error::BadRequest("request already completed".into()));
    }

    let completed = db
        .requests()
        .find_by_id(body.request_id)?
        .ok_or(Error::NotFound)?;
    Ok(Json(completed.into()))
}

/// POST /api/maintenance
///
/// Report a maintenance issue against a room.
#[instrument(skip(state, headers, body), fields(room_id = %body.room_id))]
async fn create_maintenance_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<CreateMaintenanceRequest>,
) -> Result<Json<MaintenanceDto>> {
    let session = require_session(&state, &headers).await?;

    let category = MaintenanceCategory::parse(&body.category)
        .ok_or_else(|| Error::BadRequest(format!("unknown category '{}'", body.category)))?;
    let priority = match body.priority.as_deref() {
        None => Priority::Normal,
        Some(p) => {
            Priority::parse(p).ok_or_else(|| Error::BadRequest(format!("unknown priority '{p}'")))?
        }
    };

    let db = state.db.lock().await;
    let room = db.rooms().find_by_id(body.room_id)?.ok_or(Error::NotFound)?;
    if room.hotel_id != session.hotel_id {
        return Err(Error::NotFound);
    }

    let mut record = MaintenanceRecord::new(
        session.hotel_id,
        room.id,
        session.staff_id,
        category,
        priority,
    );
    if let Some(at) = body.scheduled_for {
        record = record.scheduled(at);
    }
    record.images = body.images;
    db.maintenance().create(&record)?;
    Ok(Json(record.into()))
}

/// POST /api/maintenance/start
#[instrument(skip(state, headers, body), fields(record_id = %body.record_id))]
async fn start_maintenance_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<MaintenanceActionRequest>,
) -> Result<Json<MaintenanceDto>> {
    let session = require_session(&state, &headers).await?;

    let db = state.db.lock().await;
    let record = db
        .maintenance()
        .find_by_id(body.record_id)?
        .ok_or(Error::NotFound)?;
    if record.hotel_id != session.hotel_id {
        return Err(Error::NotFound);
    }

    if !db.maintenance().start(record.id)? {
        return Err(Error::BadRequest("record is not pending".into()));
    }

    let started = db
        .maintenance()
        .find_by_id(record.id)?
        .ok_or(Error::NotFound)?;
    Ok(Json(started.into()))
}

/// POST /api/maintenance/complete
///
/// Elapsed time is measured from when work started.
#[instrument(skip(state, headers, body), fields(record_id = %body.record_id))]
async fn complete_maintenance_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<MaintenanceActionRequest>,
) -> Result<Json<MaintenanceDto>> {
    let session = require_session(&state, &headers).await?;

    let db = state.db.lock().await;
    let record = db
        .maintenance()
        .find_by_id(body.record_id)?
        .ok_or(Error::NotFound)?;
    if record.hotel_id != session.hotel_id {
        return Err(Error::NotFound);
    }

    let started_at = record
        .started_at
        .ok_or_else(|| Error::BadRequest("record was never started".into()))?;
    let elapsed = (chrono::Utc::now() - started_at).num_minutes().max(0) as u32;

    if !db.maintenance().complete(record.id, elapsed)? {
        return Err(Error::BadRequest("record is not in progress".into()));
    }

    let completed = db
        .maintenance()
        .find_by_id(record.id)?
        .ok_or(Error::NotFound)?;
    Ok(Json(completed.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_core::{auth, Hotel, Room, Staff, StaffRole};
    use uuid::Uuid;

    async fn test_state() -> (ApiState, Hotel) {
        let db = Database::open_in_memory().unwrap();
        let hotel = Hotel::new("Test Hotel".into(), "UTC".into());
        db.hotels().create(&hotel).unwrap();
        (ApiState::new(Arc::new(Mutex::new(db))), hotel)
    }

    async fn login(state: &ApiState, hotel_id: Uuid, pin: &str) -> SessionClaims {
        {
            let db = state.db.lock().await;
            let mut staff = Staff::new(hotel_id, "Ana".into(), StaffRole::Housekeeper);
            staff.pin_hash = Some(auth::hash_pin(pin).unwrap());
            db.staff().create(&staff).unwrap();
            let session = auth::login_with_pin(&db, hotel_id, pin).unwrap();
            SessionClaims::from(session)
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        headers
    }

    #[test]
    fn test_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            "other=1; innkeep_session=abc123; theme=dark".parse().unwrap(),
        );
        assert_eq!(token_from_headers(&headers), Some("abc123".to_string()));
    }

    #[tokio::test]
    async fn test_pin_login_rejects_malformed_pin() {
        let (state, hotel) = test_state().await;
        let result = pin_login_handler(
            State(state),
            Json(PinLoginRequest {
                pin: "123456789".into(),
                hotel_id: hotel.id,
            }),
        )
        .await;
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_auto_assign_requires_session() {
        let (state, hotel) = test_state().await;
        let result = auto_assign_handler(
            State(state),
            HeaderMap::new(),
            Json(AutoAssignRequest {
                hotel_id: Some(hotel.id),
                date: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn test_auto_assign_reports_empty_sweep() {
        let (state, hotel) = test_state().await;
        let claims = login(&state, hotel.id, "4812").await;

        let response = auto_assign_handler(
            State(state),
            bearer(&claims.token),
            Json(AutoAssignRequest {
                hotel_id: None,
                date: None,
            }),
        )
        .await
        .unwrap();
        assert!(!response.0.success);
        assert_eq!(response.0.assignments_created, 0);
    }

    #[tokio::test]
    async fn test_push_subscribe_validates_topic() {
        let (state, _hotel) = test_state().await;
        let result = push_subscribe_handler(
            State(state),
            Json(PushRequest {
                token: "device-1".into(),
                topic: "front desk".into(),
                hotel_id: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_transition_via_session() {
        let (state, hotel) = test_state().await;

        let room = {
            let db = state.db.lock().await;
            let mut room = Room::new(hotel.id, "101".into(), 1, "double".into());
            db.rooms().create(&room).unwrap();
            let version = room.version;
            room.status = RoomStatus::NeedCleaning;
            assert!(db.rooms().update_checked(&room, version).unwrap());
            room
        };

        let claims = login(&state, hotel.id, "4812").await;
        let response = transition_handler(
            State(state),
            bearer(&claims.token),
            Json(TransitionRequest {
                room_id: room.id,
                new_status: "cleaning_occupied".into(),
                note: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.0.status, "cleaning_occupied");
    }

    #[tokio::test]
    async fn test_maintenance_lifecycle() {
        let (state, hotel) = test_state().await;

        let room = {
            let db = state.db.lock().await;
            let room = Room::new(hotel.id, "101".into(), 1, "double".into());
            db.rooms().create(&room).unwrap();
            room
        };

        let claims = login(&state, hotel.id, "4812").await;

        let created = create_maintenance_handler(
            State(state.clone()),
            bearer(&claims.token),
            Json(CreateMaintenanceRequest {
                room_id: room.id,
                category: "plumbing".into(),
                priority: Some("high".into()),
                scheduled_for: None,
                images: vec!["leak.jpg".into()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(created.0.status, "pending");

        // Completing before starting is a client error
        let premature = complete_maintenance_handler(
            State(state.clone()),
            bearer(&claims.token),
            Json(MaintenanceActionRequest {
                record_id: created.0.id,
            }),
        )
        .await;
        assert!(matches!(premature, Err(Error::BadRequest(_))));

        let started = start_maintenance_handler(
            State(state.clone()),
            bearer(&claims.token),
            Json(MaintenanceActionRequest {
                record_id: created.0.id,
            }),
        )
        .await
        .unwrap();
        assert_eq!(started.0.status, "in_progress");
        assert!(started.0.started_at.is_some());

        let completed = complete_maintenance_handler(
            State(state),
            bearer(&claims.token),
            Json(MaintenanceActionRequest {
                record_id: created.0.id,
            }),
        )
        .await
        .unwrap();
        assert_eq!(completed.0.status, "completed");
        assert!(completed.0.elapsed_minutes.is_some());
    }

    #[tokio::test]
    async fn test_guest_request_lifecycle() {
        let (state, hotel) = test_state().await;

        let room = {
            let db = state.db.lock().await;
            let room = Room::new(hotel.id, "101".into(), 1, "double".into());
            db.rooms().create(&room).unwrap();
            room
        };

        let created = create_request_handler(
            State(state.clone()),
            Json(CreateGuestRequest {
                hotel_id: hotel.id,
                room_id: room.id,
                kind: "towels".into(),
                priority: None,
                quantity: Some(2),
            }),
        )
        .await
        .unwrap();
        assert_eq!(created.0.status, "pending");
        assert_eq!(created.0.quantity, Some(2));

        let claims = login(&state, hotel.id, "4812").await;
        let completed = complete_request_handler(
            State(state.clone()),
            bearer(&claims.token),
            Json(CompleteGuestRequest {
                request_id: created.0.id,
            }),
        )
        .await
        .unwrap();
        assert_eq!(completed.0.status, "completed");

        // Completing twice is a client error
        let again = complete_request_handler(
            State(state),
            bearer(&claims.token),
            Json(CompleteGuestRequest {
                request_id: created.0.id,
            }),
        )
        .await;
        assert!(matches!(again, Err(Error::BadRequest(_))));
    }
}
