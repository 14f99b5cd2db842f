//! Access gate — resolves whether a principal may act on a file or user
//! account.
//!
//! Every check re-derives from the caller's current role and the target's
//! current ownership; no permission state is cached between calls. The
//! gate never looks a resource up itself — callers check existence first
//! so that NotFound always precedes Forbidden.

use uuid::Uuid;

use depot_core::error::AppError;
use depot_entity::user::UserRole;

use super::policy::{Action, RbacPolicies, Resource};

/// Enforces role- and ownership-based access for file and account
/// operations.
#[derive(Debug, Clone)]
pub struct AccessGate {
    /// The capability table.
    policies: RbacPolicies,
}

impl AccessGate {
    /// Creates a gate with the default policy set.
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    /// Creates a gate with custom policies.
    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Whether the caller may perform `action` on a file owned by
    /// `owner_id`: granted by the any-file capability, or by ownership
    /// plus the own-file capability.
    pub fn allows_file(
        &self,
        role: UserRole,
        user_id: Uuid,
        owner_id: Uuid,
        action: Action,
    ) -> bool {
        if self.policies.has_capability(role, Resource::File, action) {
            return true;
        }
        owner_id == user_id && self.policies.has_capability(role, Resource::OwnFile, action)
    }

    /// Whether the caller may download the file.
    pub fn can_download(&self, role: UserRole, user_id: Uuid, owner_id: Uuid) -> bool {
        self.allows_file(role, user_id, owner_id, Action::Read)
    }

    /// Whether the caller may modify the file (new version, rollback,
    /// share).
    pub fn can_update(&self, role: UserRole, user_id: Uuid, owner_id: Uuid) -> bool {
        self.allows_file(role, user_id, owner_id, Action::Update)
    }

    /// Whether the caller may delete the file.
    pub fn can_delete(&self, role: UserRole, user_id: Uuid, owner_id: Uuid) -> bool {
        self.allows_file(role, user_id, owner_id, Action::Delete)
    }

    /// Require a file capability, or fail with Forbidden.
    pub fn require_file(
        &self,
        role: UserRole,
        user_id: Uuid,
        owner_id: Uuid,
        action: Action,
    ) -> Result<(), AppError> {
        if self.allows_file(role, user_id, owner_id, action) {
            Ok(())
        } else {
            Err(AppError::forbidden("No permission for this file"))
        }
    }

    /// Require the file-create capability, or fail with Forbidden.
    pub fn require_file_create(&self, role: UserRole) -> Result<(), AppError> {
        if self.policies.has_capability(role, Resource::File, Action::Create) {
            Ok(())
        } else {
            Err(AppError::forbidden("No permission to create files"))
        }
    }

    /// Require an any-account capability (admin user management), or fail
    /// with Forbidden.
    pub fn require_account_admin(&self, role: UserRole, action: Action) -> Result<(), AppError> {
        if self
            .policies
            .has_capability(role, Resource::UserAccount, action)
        {
            Ok(())
        } else {
            Err(AppError::forbidden("No permission to manage user accounts"))
        }
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_act_on_any_file() {
        let gate = AccessGate::new();
        let admin = Uuid::new_v4();
        let owner = Uuid::new_v4();

        assert!(gate.can_download(UserRole::Admin, admin, owner));
        assert!(gate.can_delete(UserRole::Admin, admin, owner));
        assert!(gate.can_update(UserRole::Admin, admin, owner));
    }

    #[test]
    fn test_owner_can_act_on_own_file() {
        let gate = AccessGate::new();
        let owner = Uuid::new_v4();

        assert!(gate.can_download(UserRole::User, owner, owner));
        assert!(gate.can_delete(UserRole::User, owner, owner));
        assert!(gate.can_update(UserRole::User, owner, owner));
    }

    #[test]
    fn test_non_owner_user_is_denied() {
        let gate = AccessGate::new();
        let caller = Uuid::new_v4();
        let owner = Uuid::new_v4();

        assert!(!gate.can_download(UserRole::User, caller, owner));
        assert!(!gate.can_delete(UserRole::User, caller, owner));

        let err = gate
            .require_file(UserRole::User, caller, owner, Action::Delete)
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[test]
    fn test_both_roles_can_create_files() {
        let gate = AccessGate::new();
        assert!(gate.require_file_create(UserRole::Admin).is_ok());
        assert!(gate.require_file_create(UserRole::User).is_ok());
    }

    #[test]
    fn test_account_admin_requires_admin_role() {
        let gate = AccessGate::new();
        assert!(gate.require_account_admin(UserRole::Admin, Action::Delete).is_ok());
        assert!(gate.require_account_admin(UserRole::User, Action::Delete).is_err());
    }
}
