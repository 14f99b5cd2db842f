//! Role-to-capability mapping definitions.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use depot_entity::user::UserRole;

/// A protected resource class.
///
/// The `Own*` variants scope a capability to resources the caller owns;
/// the plain variants grant it over any instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Any user account.
    UserAccount,
    /// The caller's own account.
    OwnUserAccount,
    /// Any file.
    File,
    /// A file owned by the caller.
    OwnFile,
}

/// An action on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/download.
    Read,
    /// Modify (upload a new version, rollback, share).
    Update,
    /// Delete.
    Delete,
    /// Create.
    Create,
}

/// Defines the mapping from each role to the set of (resource, action)
/// capabilities it holds unconditionally.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    /// Role → set of capabilities.
    policies: HashMap<UserRole, HashSet<(Resource, Action)>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let mut policies = HashMap::new();

        // Admin has full control over files and user accounts.
        let admin: HashSet<(Resource, Action)> = [
            (Resource::UserAccount, Action::Read),
            (Resource::UserAccount, Action::Update),
            (Resource::UserAccount, Action::Delete),
            (Resource::File, Action::Read),
            (Resource::File, Action::Update),
            (Resource::File, Action::Delete),
            (Resource::File, Action::Create),
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::Admin, admin);

        // Regular users are restricted to their own resources: they can
        // read other accounts, modify only their own, create files, and
        // read/update/delete only files they own.
        let user: HashSet<(Resource, Action)> = [
            (Resource::UserAccount, Action::Read),
            (Resource::OwnUserAccount, Action::Update),
            (Resource::File, Action::Create),
            (Resource::OwnFile, Action::Read),
            (Resource::OwnFile, Action::Update),
            (Resource::OwnFile, Action::Delete),
        ]
        .into_iter()
        .collect();
        policies.insert(UserRole::User, user);

        Self { policies }
    }

    /// Checks whether the given role holds the specified capability.
    pub fn has_capability(&self, role: UserRole, resource: Resource, action: Action) -> bool {
        self.policies
            .get(&role)
            .is_some_and(|caps| caps.contains(&(resource, action)))
    }

    /// Returns the capability set for the given role.
    pub fn capabilities_for(&self, role: UserRole) -> HashSet<(Resource, Action)> {
        self.policies.get(&role).cloned().unwrap_or_default()
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_holds_any_file_capabilities() {
        let policies = RbacPolicies::new();
        for action in [Action::Read, Action::Update, Action::Delete, Action::Create] {
            assert!(policies.has_capability(UserRole::Admin, Resource::File, action));
        }
    }

    #[test]
    fn test_user_scoped_to_own_file() {
        let policies = RbacPolicies::new();
        assert!(policies.has_capability(UserRole::User, Resource::File, Action::Create));
        assert!(!policies.has_capability(UserRole::User, Resource::File, Action::Read));
        assert!(policies.has_capability(UserRole::User, Resource::OwnFile, Action::Read));
        assert!(policies.has_capability(UserRole::User, Resource::OwnFile, Action::Delete));
    }

    #[test]
    fn test_user_cannot_manage_accounts() {
        let policies = RbacPolicies::new();
        assert!(!policies.has_capability(UserRole::User, Resource::UserAccount, Action::Delete));
        assert!(policies.has_capability(UserRole::User, Resource::OwnUserAccount, Action::Update));
    }
}
