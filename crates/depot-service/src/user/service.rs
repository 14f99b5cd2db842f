//! Registration, login, and admin user management.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use depot_auth::rbac::Action;
use depot_auth::{AccessGate, IssuedToken, JwtEncoder, PasswordHasher};
use depot_core::error::AppError;
use depot_database::repositories::UserRepository;
use depot_entity::audit::AuditAction;
use depot_entity::user::{CreateUser, User, UserRole};

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::file::FileService;

/// Handles account lifecycle and credential verification.
#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    file_service: FileService,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
    gate: Arc<AccessGate>,
    audit: AuditService,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish()
    }
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        file_service: FileService,
        hasher: PasswordHasher,
        encoder: JwtEncoder,
        gate: Arc<AccessGate>,
        audit: AuditService,
    ) -> Self {
        Self {
            user_repo,
            file_service,
            hasher,
            encoder,
            gate,
            audit,
        }
    }

    /// Register a new account with the regular user role.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        ip_address: Option<String>,
    ) -> Result<User, AppError> {
        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role: UserRole::User,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");

        self.audit
            .record(Some(user.id), AuditAction::Register, None, None, ip_address)
            .await;

        Ok(user)
    }

    /// Verify credentials and issue an access token.
    ///
    /// A missing user and a wrong password produce the same error so the
    /// response does not leak which usernames exist.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ip_address: Option<String>,
    ) -> Result<(User, IssuedToken), AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthenticated("Invalid username or password"));
        }

        let token = self.encoder.issue(user.id, user.role, &user.username)?;

        self.audit
            .record(Some(user.id), AuditAction::Login, None, None, ip_address)
            .await;

        Ok((user, token))
    }

    /// Record a logout. Access tokens are stateless, so this only audits.
    pub async fn logout(&self, ctx: &RequestContext) {
        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::Logout,
                None,
                None,
                ctx.ip_address.clone(),
            )
            .await;
    }

    /// Fetch a user's own profile.
    pub async fn profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// List all accounts (admin only).
    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<User>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("User administration requires admin role"));
        }
        self.user_repo.list().await
    }

    /// Delete an account and all files it owns (admin only, never self).
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        self.gate.require_account_admin(ctx.role, Action::Delete)?;
        if user_id == ctx.user_id {
            return Err(AppError::validation(
                "Cannot delete your own admin account",
            ));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let removed_files = self.file_service.delete_all_for_owner(user_id).await?;
        self.user_repo.delete(user_id).await?;

        info!(
            admin_id = %ctx.user_id,
            user_id = %user_id,
            username = %user.username,
            files_removed = removed_files,
            "User deleted"
        );

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::DeleteUser,
                None,
                Some(serde_json::json!({
                    "deleted_user": user_id,
                    "files_removed": removed_files,
                })),
                ctx.ip_address.clone(),
            )
            .await;

        Ok(())
    }

    /// Change an account's role (admin only, never self).
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<User, AppError> {
        self.gate.require_account_admin(ctx.role, Action::Update)?;
        if user_id == ctx.user_id {
            return Err(AppError::validation("Cannot change your own role"));
        }

        let user = self.user_repo.update_role(user_id, role).await?;

        self.audit
            .record(
                Some(ctx.user_id),
                AuditAction::ChangeRole,
                None,
                Some(serde_json::json!({
                    "user": user_id,
                    "role": role.as_str(),
                })),
                ctx.ip_address.clone(),
            )
            .await;

        Ok(user)
    }
}
