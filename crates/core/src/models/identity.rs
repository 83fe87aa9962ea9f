//! Verified caller identity and the capability checks derived from it.

use serde::{Deserialize, Serialize};

use super::appointment::Appointment;

/// Roles issued by the account service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Doctor,
    User,
    #[serde(other)]
    Unknown,
}

/// The subject behind a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: i64,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn new(subject_id: i64, roles: Vec<Role>) -> Self {
        Self { subject_id, roles }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Creating, replacing and deleting timetables is reserved to administrators.
    pub fn can_manage_timetables(&self) -> bool {
        self.is_admin()
    }

    /// An appointment may be cancelled by the user who booked it or by an administrator.
    pub fn can_delete_appointment(&self, appointment: &Appointment) -> bool {
        self.is_admin() || appointment.user_id == self.subject_id
    }
}
