use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::form::{optional, optional_number, price_in_cents, required, required_number},
    error::{AppError, AppResult},
    models::Part,
    routes::params::Pagination,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePartForm {
    pub part_number: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<String>,
    #[schema(example = "12.50")]
    pub unit_price: Option<String>,
}

#[derive(Debug)]
pub struct NewPart {
    pub part_number: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
}

impl CreatePartForm {
    pub fn validate(self) -> AppResult<NewPart> {
        let quantity = optional_number::<i32>(self.quantity, "quantity")?.unwrap_or(0);
        if quantity < 0 {
            return Err(AppError::validation("quantity cannot be negative"));
        }
        Ok(NewPart {
            part_number: required(self.part_number, "part_number")?,
            name: required(self.name, "name")?,
            description: optional(self.description),
            quantity,
            unit_price: price_in_cents(self.unit_price, "unit_price")?,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RestockForm {
    pub quantity: Option<String>,
}

impl RestockForm {
    pub fn validate(self) -> AppResult<i32> {
        let quantity = required_number::<i32>(self.quantity, "quantity")?;
        if quantity <= 0 {
            return Err(AppError::validation("quantity must be greater than 0"));
        }
        Ok(quantity)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LowStockQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub threshold: Option<i32>,
}

impl LowStockQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartList {
    pub items: Vec<Part>,
}
