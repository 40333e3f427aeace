use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::form::{optional, optional_number},
    error::AppResult,
    models::{Car, User, WorkOrder},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterCarForm {
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
}

/// Car details as submitted; `make` is only required when no car with the
/// same VIN exists yet.
#[derive(Debug, Clone, Default)]
pub struct NewCar {
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub owner_id: Option<i32>,
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
}

impl RegisterCarForm {
    pub fn validate(self) -> AppResult<NewCar> {
        Ok(NewCar {
            vin: normalize_vin(self.vin),
            make: optional(self.make),
            model: optional(self.model),
            year: optional_number(self.year, "year")?,
            owner_id: optional_number(self.owner_id, "owner_id")?,
            owner_name: optional(self.owner_name),
            owner_phone: optional(self.owner_phone),
        })
    }
}

pub fn normalize_vin(vin: Option<String>) -> Option<String> {
    optional(vin).map(|v| v.to_ascii_uppercase())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CarList {
    pub items: Vec<Car>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CarDetail {
    pub car: Car,
    pub work_orders: Vec<WorkOrder>,
    pub mechanics: Vec<User>,
}
