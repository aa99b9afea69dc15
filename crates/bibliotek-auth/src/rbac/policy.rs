//! Authorization policy: role sets, role hierarchy, and resource ownership.

use uuid::Uuid;

use bibliotek_core::error::AppError;
use bibliotek_entity::user::UserRole;

/// The resource families the ownership policy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// User accounts.
    Users,
    /// The book catalog.
    Books,
    /// Loan records.
    Loans,
}

/// How far a caller's access to a resource family reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAccess {
    /// Unrestricted access to every record.
    Full,
    /// Access restricted to records the caller owns.
    OwnOnly,
}

/// Enforces role and ownership checks.
///
/// Two distinct checks exist on purpose: `require_any` is exact set
/// membership (an admin is NOT implicitly in `[librarian]`), while
/// `has_permission` walks the hierarchy.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    /// Creates a new policy.
    pub fn new() -> Self {
        Self
    }

    /// Requires the role to be one of the explicitly allowed roles.
    pub fn require_any(&self, role: UserRole, allowed: &[UserRole]) -> Result<(), AppError> {
        if allowed.contains(&role) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' is not permitted for this operation"
            )))
        }
    }

    /// Checks whether the role sits at or above the given minimum in the
    /// hierarchy.
    pub fn has_permission(&self, role: UserRole, minimum: UserRole) -> bool {
        role.has_at_least(&minimum)
    }

    /// Resolves how far a caller may reach into a resource family.
    ///
    /// Admins see everything. Librarians manage the catalog and all loans
    /// but only their own account. Regular members are confined to records
    /// they own, and cannot touch the catalog at all.
    pub fn resource_access(
        &self,
        role: UserRole,
        resource: ResourceKind,
    ) -> Result<ResourceAccess, AppError> {
        match (role, resource) {
            (UserRole::Admin, _) => Ok(ResourceAccess::Full),
            (UserRole::Librarian, ResourceKind::Books | ResourceKind::Loans) => {
                Ok(ResourceAccess::Full)
            }
            (UserRole::Librarian, ResourceKind::Users) => Ok(ResourceAccess::OwnOnly),
            (UserRole::User, ResourceKind::Loans | ResourceKind::Users) => {
                Ok(ResourceAccess::OwnOnly)
            }
            (UserRole::User, ResourceKind::Books) => Err(AppError::authorization(
                "Role 'user' is not permitted for this operation",
            )),
        }
    }

    /// Requires the caller to own the record unless their access is full.
    pub fn require_ownership(
        &self,
        role: UserRole,
        resource: ResourceKind,
        caller_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), AppError> {
        match self.resource_access(role, resource)? {
            ResourceAccess::Full => Ok(()),
            ResourceAccess::OwnOnly if caller_id == owner_id => Ok(()),
            ResourceAccess::OwnOnly => Err(AppError::authorization(
                "You may only access your own resources",
            )),
        }
    }
}
