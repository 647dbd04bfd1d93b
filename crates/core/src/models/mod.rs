//! Core domain models

mod history;
mod hotel;
mod maintenance;
mod notification;
mod request;
mod room;
mod session;
mod staff;

pub use history::StatusHistoryEntry;
pub use hotel::{Hotel, SubscriptionStatus};
pub use maintenance::{MaintenanceCategory, MaintenanceRecord, MaintenanceStatus};
pub use notification::{is_valid_topic, Notification, PushSubscription};
pub use request::{GuestRequest, RequestStatus, ServiceKind};
pub use room::{Priority, Room, RoomStatus};
pub use session::{AccessType, Session};
pub use staff::{Staff, StaffRole};
