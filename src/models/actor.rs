//! Actors and roles
//!
//! An actor is the `{user_id, role}` pair performing a mutation. Only the
//! role drives authorization; who the user is was settled upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the user performing a mutation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The requesting citizen
    Citizen,
    /// Desk officer processing requests
    Officer,
    /// Commune chairman, same transition powers as an officer
    Chairman,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Citizen => "citizen",
            Role::Officer => "officer",
            Role::Chairman => "chairman",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "citizen" => Some(Role::Citizen),
            "officer" => Some(Role::Officer),
            "chairman" => Some(Role::Chairman),
            _ => None,
        }
    }

    /// Whether this role may move a request into a non-pending status
    pub fn can_drive_lifecycle(&self) -> bool {
        matches!(self, Role::Officer | Role::Chairman)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The `{user_id, role}` pair performing a mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("officer"), Some(Role::Officer));
        assert_eq!(Role::from_str("CHAIRMAN"), Some(Role::Chairman));
        assert_eq!(Role::from_str("Citizen"), Some(Role::Citizen));
        assert_eq!(Role::from_str("mayor"), None);
    }

    #[test]
    fn test_lifecycle_roles() {
        assert!(Role::Officer.can_drive_lifecycle());
        assert!(Role::Chairman.can_drive_lifecycle());
        assert!(!Role::Citizen.can_drive_lifecycle());
    }
}
