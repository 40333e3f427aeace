use chrono::Utc;
use repair_shop_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Role,
        parts::{ActiveModel as PartActive, Column as PartCol, Entity as Parts},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    services::auth_service::hash_password,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let manager_password =
        std::env::var("SEED_MANAGER_PASSWORD").unwrap_or_else(|_| "manager123".to_string());
    let manager_id = ensure_user(&orm, "manager", &manager_password, Role::Manager).await?;
    let mechanic_id = ensure_user(&orm, "mechanic", "mechanic123", Role::Mechanic).await?;
    let client_id = ensure_user(&orm, "client", "client123", Role::Client).await?;
    seed_parts(&orm).await?;

    println!(
        "Seed completed. Manager ID: {manager_id}, Mechanic ID: {mechanic_id}, Client ID: {client_id}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    username: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<i32> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Username.eq(username))
        .one(orm)
        .await?
    {
        println!("User {username} already exists (role={})", existing.role);
        return Ok(existing.id);
    }

    let password_hash = hash_password(password)?;
    let user = UserActive {
        id: NotSet,
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {username} (role={role})");
    Ok(user.id)
}

async fn seed_parts(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let parts = vec![
        ("BRK-001", "Brake pad set", "Front axle ceramic pads", 5, 4_500),
        ("OIL-5W30", "Engine oil 5W-30", "1 litre synthetic", 40, 1_200),
        ("FLT-OIL-01", "Oil filter", "Spin-on oil filter", 25, 850),
        ("SPK-IR-4", "Spark plug", "Iridium spark plug", 3, 1_100),
    ];

    for (part_number, name, description, quantity, unit_price) in parts {
        let exists = Parts::find()
            .filter(PartCol::PartNumber.eq(part_number))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }
        PartActive {
            id: NotSet,
            part_number: Set(part_number.to_string()),
            name: Set(name.to_string()),
            description: Set(Some(description.to_string())),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded parts");
    Ok(())
}
