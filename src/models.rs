use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{Role, WorkOrderStatus, cars, parts, users, work_order_parts, work_orders};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Car {
    pub id: i32,
    pub vin: Option<String>,
    pub make: String,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub owner_id: Option<i32>,
    pub owner_name: String,
    pub owner_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Part {
    pub id: i32,
    pub part_number: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkOrder {
    pub id: i32,
    pub car_id: i32,
    pub client_id: i32,
    pub mechanic_id: Option<i32>,
    pub status: WorkOrderStatus,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderPart {
    pub id: i32,
    pub work_order_id: i32,
    pub part_id: i32,
    pub quantity_used: i32,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: model.id,
            username: model.username,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<cars::Model> for Car {
    fn from(model: cars::Model) -> Self {
        Car {
            id: model.id,
            vin: model.vin,
            make: model.make,
            model: model.model,
            year: model.year,
            owner_id: model.owner_id,
            owner_name: model.owner_name,
            owner_phone: model.owner_phone,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<parts::Model> for Part {
    fn from(model: parts::Model) -> Self {
        Part {
            id: model.id,
            part_number: model.part_number,
            name: model.name,
            description: model.description,
            quantity: model.quantity,
            unit_price: model.unit_price,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<work_orders::Model> for WorkOrder {
    fn from(model: work_orders::Model) -> Self {
        WorkOrder {
            id: model.id,
            car_id: model.car_id,
            client_id: model.client_id,
            mechanic_id: model.mechanic_id,
            status: model.status,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<work_order_parts::Model> for WorkOrderPart {
    fn from(model: work_order_parts::Model) -> Self {
        WorkOrderPart {
            id: model.id,
            work_order_id: model.work_order_id,
            part_id: model.part_id,
            quantity_used: model.quantity_used,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
