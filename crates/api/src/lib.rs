//! Innkeep HTTP API
//!
//! The web surface over innkeep-core: staff PIN login, auto-assignment
//! trigger, push subscriptions, room transitions and guest requests.

pub mod dto;
pub mod error;
pub mod server;

pub use error::{Error, Result};
pub use server::{router, serve, ApiState, SESSION_COOKIE};
