//! Role-gated room status transitions
//!
//! The single authoritative table of which statuses each staff role may
//! move a room into. Everything that checks a transition goes through here.

use crate::models::{RoomStatus, StaffRole};

/// Transition matrix for staff roles
pub struct TransitionMatrix;

impl TransitionMatrix {
    /// Statuses this role is allowed to move a room into
    pub fn allowed_targets(role: StaffRole) -> &'static [RoomStatus] {
        match role {
            StaffRole::Housekeeper => &[
                RoomStatus::CleaningOccupied,
                RoomStatus::CleaningCheckout,
                RoomStatus::CleaningTouch,
                RoomStatus::PublicAreas,
                RoomStatus::CleanOccupied,
            ],
            StaffRole::Manager => &[RoomStatus::Inspection, RoomStatus::Available],
            StaffRole::Maintenance => &[RoomStatus::Maintenance, RoomStatus::Available],
            StaffRole::Reception => &[
                RoomStatus::Available,
                RoomStatus::Occupied,
                RoomStatus::Checkout,
                RoomStatus::InHouse,
            ],
        }
    }

    /// Check whether a role may move a room into the given status
    pub fn can_transition(role: StaffRole, target: RoomStatus) -> bool {
        Self::allowed_targets(role).contains(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_housekeeper_targets() {
        assert!(TransitionMatrix::can_transition(
            StaffRole::Housekeeper,
            RoomStatus::CleaningOccupied
        ));
        assert!(TransitionMatrix::can_transition(
            StaffRole::Housekeeper,
            RoomStatus::PublicAreas
        ));
        assert!(!TransitionMatrix::can_transition(
            StaffRole::Housekeeper,
            RoomStatus::Maintenance
        ));
        assert!(!TransitionMatrix::can_transition(
            StaffRole::Housekeeper,
            RoomStatus::Inspection
        ));
    }

    #[test]
    fn test_manager_targets() {
        assert!(TransitionMatrix::can_transition(
            StaffRole::Manager,
            RoomStatus::Inspection
        ));
        assert!(TransitionMatrix::can_transition(
            StaffRole::Manager,
            RoomStatus::Available
        ));
        assert!(!TransitionMatrix::can_transition(
            StaffRole::Manager,
            RoomStatus::Checkout
        ));
    }

    #[test]
    fn test_maintenance_targets() {
        assert!(TransitionMatrix::can_transition(
            StaffRole::Maintenance,
            RoomStatus::Maintenance
        ));
        assert!(TransitionMatrix::can_transition(
            StaffRole::Maintenance,
            RoomStatus::Available
        ));
        assert!(!TransitionMatrix::can_transition(
            StaffRole::Maintenance,
            RoomStatus::CleaningTouch
        ));
    }

    #[test]
    fn test_reception_targets() {
        assert!(TransitionMatrix::can_transition(
            StaffRole::Reception,
            RoomStatus::Checkout
        ));
        assert!(TransitionMatrix::can_transition(
            StaffRole::Reception,
            RoomStatus::InHouse
        ));
        assert!(!TransitionMatrix::can_transition(
            StaffRole::Reception,
            RoomStatus::CleaningCheckout
        ));
    }
}
