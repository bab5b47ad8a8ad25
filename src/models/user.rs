//! Users and role-based permissions.
//!
//! A user is a single entity tagged with a role. Permissions are a pure
//! function of the role.

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Manages facilities and may override room availability.
    Administrator,
    /// Schedules evaluations for the units they coordinate.
    Coordinator,
}

/// An action guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Change room availability.
    ManageRooms,
    /// Allocate and release evaluation sessions.
    ScheduleEvaluations,
}

impl Role {
    /// Whether this role holds `permission`.
    pub fn allows(self, permission: Permission) -> bool {
        match (self, permission) {
            (Self::Administrator, _) => true,
            (Self::Coordinator, Permission::ScheduleEvaluations) => true,
            (Self::Coordinator, Permission::ManageRooms) => false,
        }
    }
}

/// A system user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    /// Creates a new user.
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Creates an administrator.
    pub fn administrator(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, Role::Administrator)
    }

    /// Creates a coordinator.
    pub fn coordinator(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(name, email, Role::Coordinator)
    }

    /// Fails with [`SchedulingError::Forbidden`] unless the user's role
    /// holds `permission`.
    pub fn ensure(&self, permission: Permission) -> Result<(), SchedulingError> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(SchedulingError::Forbidden {
                user: self.email.clone(),
                permission,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Administrator.allows(Permission::ManageRooms));
        assert!(Role::Administrator.allows(Permission::ScheduleEvaluations));
        assert!(Role::Coordinator.allows(Permission::ScheduleEvaluations));
        assert!(!Role::Coordinator.allows(Permission::ManageRooms));
    }

    #[test]
    fn test_ensure() {
        let admin = User::administrator("Ana", "ana@uni.example");
        let coord = User::coordinator("Rui", "rui@uni.example");

        assert!(admin.ensure(Permission::ManageRooms).is_ok());
        let err = coord.ensure(Permission::ManageRooms).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
