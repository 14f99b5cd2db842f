//! In-memory user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_entity::user::{CreateUser, User, UserRole};

use super::MemoryState;
use crate::repositories::UserRepository;

/// In-memory user repository handle.
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    state: Arc<MemoryState>,
}

impl MemoryUserRepository {
    pub(crate) fn new(state: Arc<MemoryState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let _guard = self.state.write_lock.lock().unwrap();

        if self.state.users.iter().any(|u| u.username == data.username) {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }
        if self.state.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict(format!(
                "Email '{}' is already registered",
                data.email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            role: data.role,
            created_at: Utc::now(),
        };
        self.state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .state
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.state.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        let mut user = self
            .state
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.state.users.remove(&id).is_some())
    }
}
