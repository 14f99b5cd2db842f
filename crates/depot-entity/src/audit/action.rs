//! Audit action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A user logged in.
    Login,
    /// A user logged out.
    Logout,
    /// A new account was registered.
    Register,
    /// A file version was uploaded.
    Upload,
    /// A file was downloaded by its owner or an admin.
    Download,
    /// A file was downloaded anonymously via a share token.
    DownloadShare,
    /// A file (and all its versions) was deleted.
    Delete,
    /// A file's current pointer was rolled back to a prior version.
    Rollback,
    /// A public share token was issued for a file.
    Share,
    /// An admin deleted a user account.
    DeleteUser,
    /// An admin changed a user's role.
    ChangeRole,
}

impl AuditAction {
    /// Return the action as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Register => "register",
            Self::Upload => "upload",
            Self::Download => "download",
            Self::DownloadShare => "download_share",
            Self::Delete => "delete",
            Self::Rollback => "rollback",
            Self::Share => "share",
            Self::DeleteUser => "delete_user",
            Self::ChangeRole => "change_role",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = depot_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "register" => Ok(Self::Register),
            "upload" => Ok(Self::Upload),
            "download" => Ok(Self::Download),
            "download_share" => Ok(Self::DownloadShare),
            "delete" => Ok(Self::Delete),
            "rollback" => Ok(Self::Rollback),
            "share" => Ok(Self::Share),
            "delete_user" => Ok(Self::DeleteUser),
            "change_role" => Ok(Self::ChangeRole),
            _ => Err(depot_core::AppError::validation(format!(
                "Invalid audit action: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for action in [
            AuditAction::Login,
            AuditAction::Upload,
            AuditAction::DownloadShare,
            AuditAction::Rollback,
            AuditAction::ChangeRole,
        ] {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
    }
}
