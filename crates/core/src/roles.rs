//! Well-known role and project permission constants.
//!
//! These must match the CHECK constraints in
//! `20260101000001_create_users_and_projects.sql`.

/// Global role granting every project permission.
pub const ROLE_ADMIN: &str = "admin";
/// Default global role. Project access comes from `project_permissions`.
pub const ROLE_USER: &str = "user";

/// Lowest project permission. Enough to edit the project's task graph.
pub const PERMISSION_STUDENT: &str = "student";
pub const PERMISSION_COACH: &str = "coach";
pub const PERMISSION_ADMIN: &str = "admin";

/// All project permission levels, lowest first.
pub const VALID_PERMISSIONS: &[&str] = &[PERMISSION_STUDENT, PERMISSION_COACH, PERMISSION_ADMIN];

/// Returns `true` if the given global role is recognised.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_USER
}

/// Returns `true` if the given project permission level is recognised.
pub fn is_valid_permission(permission: &str) -> bool {
    VALID_PERMISSIONS.contains(&permission)
}

/// Rank of a project permission level (`student` = 0). `None` if unknown.
pub fn permission_rank(permission: &str) -> Option<usize> {
    VALID_PERMISSIONS.iter().position(|p| *p == permission)
}

/// Whether an actor may mutate a project's task graph.
///
/// Global admins always may. Everyone else needs a recognised permission on
/// the project at `student` level or above.
pub fn is_project_student(global_role: &str, permission: Option<&str>) -> bool {
    if global_role == ROLE_ADMIN {
        return true;
    }
    permission.is_some_and(|p| has_at_least(p, PERMISSION_STUDENT))
}

/// Whether `permission` is at or above `minimum`. Unknown levels never pass.
pub fn has_at_least(permission: &str, minimum: &str) -> bool {
    match (permission_rank(permission), permission_rank(minimum)) {
        (Some(have), Some(need)) => have >= need,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_always_project_student() {
        assert!(is_project_student(ROLE_ADMIN, None));
        assert!(is_project_student(ROLE_ADMIN, Some("bogus")));
    }

    #[test]
    fn user_without_permission_is_rejected() {
        assert!(!is_project_student(ROLE_USER, None));
    }

    #[test]
    fn every_permission_level_counts_as_student() {
        for permission in VALID_PERMISSIONS {
            assert!(is_project_student(ROLE_USER, Some(permission)));
        }
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(!is_project_student(ROLE_USER, Some("guest")));
        assert!(!is_valid_permission("guest"));
    }

    #[test]
    fn permission_ranks_are_ordered() {
        assert_eq!(permission_rank(PERMISSION_STUDENT), Some(0));
        assert!(permission_rank(PERMISSION_COACH) > permission_rank(PERMISSION_STUDENT));
        assert!(permission_rank(PERMISSION_ADMIN) > permission_rank(PERMISSION_COACH));
        assert_eq!(permission_rank("guest"), None);
    }

    #[test]
    fn has_at_least_compares_ranks() {
        assert!(has_at_least(PERMISSION_ADMIN, PERMISSION_COACH));
        assert!(!has_at_least(PERMISSION_STUDENT, PERMISSION_COACH));
        assert!(!has_at_least("guest", PERMISSION_STUDENT));
    }

    #[test]
    fn roles_are_validated() {
        assert!(is_valid_role(ROLE_ADMIN));
        assert!(is_valid_role(ROLE_USER));
        assert!(!is_valid_role("student"));
    }
}
