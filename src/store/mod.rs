use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// User record as stored. The password hash never leaves the process in
/// serialized form.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub given_name: String,
    pub family_name: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub given_name: String,
    pub family_name: String,
    pub hashed_password: String,
}

/// Group owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewGroup {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i64,
}

/// Persistence seam for users and groups. All operations touch a single row
/// by primary key or unique column, so implementations need no coordination
/// beyond per-row atomicity.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    async fn insert_user(&self, new: NewUser) -> anyhow::Result<User>;
    async fn update_user_password_hash(&self, id: i64, hashed_password: &str)
        -> anyhow::Result<()>;
    async fn list_users(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<User>>;
    async fn insert_group(&self, new: NewGroup) -> anyhow::Result<Group>;
    async fn list_groups(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<Group>>;
    async fn groups_for_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Group>>;
}
