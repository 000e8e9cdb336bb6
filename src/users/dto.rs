use serde::{Deserialize, Serialize};

use crate::{
    groups::dto::GroupModel,
    store::{Group, User},
};

/// Registration body. The plaintext passwords never reach the store; only
/// the derived hash does.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub given_name: String,
    pub family_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Public view of a user: everything except the password hash, with owned
/// groups embedded.
#[derive(Debug, Serialize)]
pub struct UserModel {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub given_name: String,
    pub family_name: String,
    pub is_active: bool,
    pub groups: Vec<GroupModel>,
}

impl UserModel {
    pub fn from_parts(user: User, groups: Vec<Group>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            given_name: user.given_name,
            family_name: user.family_name,
            is_active: user.is_active,
            groups: groups.into_iter().map(GroupModel::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}
