//! Role-based access checks.

use serde::Serialize;

use wf_core::{Id, Role};

/// The authenticated user attached to a request after token validation
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Whether the user holds any of the given roles
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Guides, lead guides, and admins
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: 1,
            name: "Test".into(),
            email: "test@example.com".into(),
            role,
        }
    }

    #[test]
    fn test_has_any_role() {
        let u = user(Role::LeadGuide);
        assert!(u.has_any_role(&[Role::Admin, Role::LeadGuide]));
        assert!(!u.has_any_role(&[Role::Admin]));
    }

    #[test]
    fn test_staff_and_admin() {
        assert!(user(Role::Admin).is_admin());
        assert!(user(Role::Guide).is_staff());
        assert!(!user(Role::User).is_staff());
    }
}
