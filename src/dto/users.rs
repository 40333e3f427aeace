use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::form::{optional, required},
    entity::Role,
    error::{AppError, AppResult},
    models::User,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserForm {
    pub username: Option<String>,
    pub password: Option<String>,
    #[schema(example = "mechanic")]
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl CreateUserForm {
    pub fn validate(self) -> AppResult<NewUser> {
        let username = required(self.username, "username")?;
        // Passwords are not trimmed.
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::validation("password is required"))?;
        let role = required(self.role, "role")?
            .parse::<Role>()
            .map_err(AppError::Validation)?;
        Ok(NewUser {
            username,
            password,
            role,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserListQuery {
    pub role: Option<String>,
}

impl UserListQuery {
    pub fn role(&self) -> AppResult<Option<Role>> {
        optional(self.role.clone())
            .map(|r| r.parse::<Role>().map_err(AppError::Validation))
            .transpose()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
    pub roles: Vec<Role>,
}
