use std::sync::Mutex;

use axum::async_trait;

use crate::store::{Group, NewGroup, NewUser, User, UserStore};

/// In-memory store for exercising the auth flow without Postgres.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    groups: Vec<Group>,
    next_user_id: i64,
    next_group_id: i64,
}

impl MemoryStore {
    /// Remove a user, simulating a subject that no longer resolves.
    pub fn delete_user(&self, id: i64) {
        let mut inner = self.inner.lock().unwrap();
        inner.users.retain(|u| u.id != id);
    }

    /// Flip the active flag on a stored user.
    pub fn set_active(&self, id: i64, active: bool) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.iter_mut().find(|u| u.id == id) {
            user.is_active = active;
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, new: NewUser) -> anyhow::Result<User> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|u| u.email == new.email) {
            anyhow::bail!("duplicate email");
        }
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            email: new.email,
            username: new.username,
            given_name: new.given_name,
            family_name: new.family_name,
            hashed_password: new.hashed_password,
            is_active: true,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_user_password_hash(
        &self,
        id: i64,
        hashed_password: &str,
    ) -> anyhow::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.hashed_password = hashed_password.to_string();
                Ok(())
            }
            None => anyhow::bail!("no user with id {id}"),
        }
    }

    async fn list_users(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert_group(&self, new: NewGroup) -> anyhow::Result<Group> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_group_id += 1;
        let group = Group {
            id: inner.next_group_id,
            name: new.name,
            description: new.description,
            owner_id: new.owner_id,
        };
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn list_groups(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<Group>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .groups
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn groups_for_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Group>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .groups
            .iter()
            .filter(|g| g.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
