use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entity::WorkOrderStatus,
    models::{Car, Part, WorkOrder},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: WorkOrderStatus,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Manager {
        orders_by_status: Vec<StatusCount>,
        unassigned_orders: u64,
        low_stock: Vec<Part>,
        mechanics: u64,
        clients: u64,
    },
    Mechanic {
        assigned: Vec<WorkOrder>,
        unassigned: Vec<WorkOrder>,
    },
    Client {
        cars: Vec<Car>,
        open_orders: Vec<WorkOrder>,
    },
}
