use axum::async_trait;
use sqlx::PgPool;

use crate::store::{Group, NewGroup, NewUser, User, UserStore};

/// Postgres-backed store over a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, given_name, family_name, hashed_password, is_active
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, given_name, family_name, hashed_password, is_active
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, given_name, family_name, hashed_password, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, given_name, family_name, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, username, given_name, family_name, hashed_password, is_active
            "#,
        )
        .bind(&new.email)
        .bind(&new.username)
        .bind(&new.given_name)
        .bind(&new.family_name)
        .bind(&new.hashed_password)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update_user_password_hash(
        &self,
        id: i64,
        hashed_password: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET hashed_password = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hashed_password)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list_users(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, given_name, family_name, hashed_password, is_active
            FROM users
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn insert_group(&self, new: NewGroup) -> anyhow::Result<Group> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.owner_id)
        .fetch_one(&self.db)
        .await?;
        Ok(group)
    }

    async fn list_groups(&self, offset: i64, limit: i64) -> anyhow::Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, description, owner_id
            FROM groups
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(groups)
    }

    async fn groups_for_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, name, description, owner_id
            FROM groups
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;
        Ok(groups)
    }
}
