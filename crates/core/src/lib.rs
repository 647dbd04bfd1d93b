//! Innkeep Core Library
//!
//! Core models, the room status state machine, housekeeping assignment,
//! night audit, and storage for the Innkeep hotel operations platform.

pub mod assignment;
pub mod auth;
pub mod error;
pub mod housekeeping;
pub mod invariants;
pub mod models;
pub mod night_audit;
pub mod storage;
pub mod transitions;

pub use assignment::{auto_assign, plan_assignments, Assignment, AssignmentReport};
pub use auth::{login_with_pin, validate_pin_format, SESSION_TTL_HOURS};
pub use error::{Error, Result};
pub use housekeeping::{apply_transition, TransitionOutcome, HOUSEKEEPING_TOPIC};
pub use models::*;
pub use night_audit::{run_night_audit, NightAuditReport};
pub use storage::{
    Database, HistoryRepository, HistoryStore, HotelRepository, HotelStore, MaintenanceStore,
    NotificationStore, PushStore, RequestStore, RoomRepository, RoomStore, SessionStore,
    StaffRepository, StaffStore, Storage,
};
pub use transitions::TransitionMatrix;
