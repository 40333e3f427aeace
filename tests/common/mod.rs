#![allow(dead_code)]

use chrono::Utc;
use repair_shop_api::{
    db::{create_orm_conn, run_migrations},
    entity::{
        Role,
        parts::{self, ActiveModel as PartActive},
        users::ActiveModel as UserActive,
    },
    middleware::auth::CurrentUser,
    services::auth_service::hash_password,
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};

pub const TEST_SECRET: &str = "test-secret";

/// Fresh in-memory database with the full schema.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, TEST_SECRET, 1))
}

pub async fn create_user(state: &AppState, username: &str, role: Role) -> anyhow::Result<CurrentUser> {
    create_user_with_password(state, username, "password", role).await
}

pub async fn create_user_with_password(
    state: &AppState,
    username: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<CurrentUser> {
    let user = UserActive {
        id: NotSet,
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(CurrentUser {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}

pub async fn create_part(
    state: &AppState,
    part_number: &str,
    quantity: i32,
) -> anyhow::Result<parts::Model> {
    let part = PartActive {
        id: NotSet,
        part_number: Set(part_number.to_string()),
        name: Set(format!("Part {part_number}")),
        description: Set(None),
        quantity: Set(quantity),
        unit_price: Set(1000),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(part)
}
