//! Identifier and role types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Primary key type for all resources
pub type Id = i64;

/// User roles, ordered by privilege.
///
/// Stored as TEXT (`type_name = "TEXT"`, so sqlx maps the enum to the
/// string type); the column carries a CHECK constraint instead of a
/// database enum so text comparisons in dynamic filters work unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, Default,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
pub enum Role {
    #[default]
    User,
    Guide,
    LeadGuide,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::LeadGuide => "lead-guide",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "guide" => Some(Role::Guide),
            "lead-guide" => Some(Role::LeadGuide),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Staff roles may see operational views like the monthly plan
    pub fn is_staff(&self) -> bool {
        *self >= Role::Guide
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Guide, Role::LeadGuide, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("superuser"), None);
    }

    #[test]
    fn test_role_is_text_in_the_database() {
        use sqlx::{Postgres, Type, TypeInfo};
        let info = <Role as Type<Postgres>>::type_info();
        assert_eq!(info.name(), <str as Type<Postgres>>::type_info().name());
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::LeadGuide);
        assert!(Role::LeadGuide > Role::Guide);
        assert!(Role::Guide > Role::User);
        assert!(!Role::User.is_staff());
        assert!(Role::Guide.is_staff());
    }
}
