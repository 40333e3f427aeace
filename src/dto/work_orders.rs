use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::{
        cars::{NewCar, normalize_vin},
        form::{optional, optional_number, required, required_number},
    },
    entity::WorkOrderStatus,
    error::{AppError, AppResult},
    models::{Car, Part, User, WorkOrder, WorkOrderPart},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWorkOrderForm {
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewWorkOrder {
    pub car: NewCar,
    pub description: Option<String>,
}

impl CreateWorkOrderForm {
    pub fn validate(self) -> AppResult<NewWorkOrder> {
        Ok(NewWorkOrder {
            car: NewCar {
                vin: normalize_vin(self.vin),
                make: optional(self.make),
                model: optional(self.model),
                year: optional_number(self.year, "year")?,
                ..NewCar::default()
            },
            description: optional(self.description),
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignMechanicForm {
    pub mechanic_id: Option<String>,
}

impl AssignMechanicForm {
    pub fn validate(self) -> AppResult<i32> {
        required_number(self.mechanic_id, "mechanic_id")
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusForm {
    #[schema(example = "on_hold")]
    pub status: Option<String>,
}

impl UpdateStatusForm {
    pub fn validate(self) -> AppResult<WorkOrderStatus> {
        let status = required(self.status, "status")?
            .parse::<WorkOrderStatus>()
            .map_err(AppError::Validation)?;
        if !status.is_manager_settable() {
            return Err(AppError::validation(
                "Work orders are completed by the mechanic completion flow",
            ));
        }
        Ok(status)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CompleteOrderForm {
    pub part_id: Option<String>,
    pub quantity_used: Option<String>,
}

/// Parts to take from stock when completing; `None` skips the ledger step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartUsage {
    pub part_id: i32,
    pub quantity: i32,
}

impl CompleteOrderForm {
    pub fn validate(self) -> AppResult<Option<PartUsage>> {
        let quantity = optional_number::<i32>(self.quantity_used, "quantity_used")?.unwrap_or(0);
        if quantity < 0 {
            return Err(AppError::validation("quantity_used cannot be negative"));
        }
        let part_id = optional_number::<i32>(self.part_id, "part_id")?;
        Ok(match part_id {
            Some(part_id) if quantity > 0 => Some(PartUsage { part_id, quantity }),
            _ => None,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkOrderList {
    pub items: Vec<WorkOrder>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsedPart {
    pub entry: WorkOrderPart,
    pub part: Part,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkOrderDetail {
    pub order: WorkOrder,
    pub car: Car,
    pub client: User,
    pub mechanic: Option<User>,
    pub parts_used: Vec<UsedPart>,
    pub mechanics: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompletedWorkOrder {
    pub order: WorkOrder,
    pub ledger_entry: Option<WorkOrderPart>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_must_be_known() {
        let form = UpdateStatusForm {
            status: Some("waiting for parts".into()),
        };
        assert!(matches!(form.validate(), Err(AppError::Validation(_))));

        let form = UpdateStatusForm {
            status: Some("On Hold".into()),
        };
        assert_eq!(form.validate().unwrap(), WorkOrderStatus::OnHold);
    }

    #[test]
    fn status_update_cannot_complete() {
        let form = UpdateStatusForm {
            status: Some("completed".into()),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn zero_quantity_skips_ledger() {
        let form = CompleteOrderForm {
            part_id: Some("3".into()),
            quantity_used: Some("0".into()),
        };
        assert_eq!(form.validate().unwrap(), None);

        let form = CompleteOrderForm {
            part_id: None,
            quantity_used: Some("4".into()),
        };
        assert_eq!(form.validate().unwrap(), None);
    }

    #[test]
    fn usage_is_parsed() {
        let form = CompleteOrderForm {
            part_id: Some("3".into()),
            quantity_used: Some("2".into()),
        };
        assert_eq!(
            form.validate().unwrap(),
            Some(PartUsage {
                part_id: 3,
                quantity: 2
            })
        );
    }

    #[test]
    fn negative_usage_is_rejected() {
        let form = CompleteOrderForm {
            part_id: Some("3".into()),
            quantity_used: Some("-1".into()),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn vin_is_normalized() {
        let order = CreateWorkOrderForm {
            vin: Some(" 1hgcm82633a004352 ".into()),
            make: Some("Honda".into()),
            model: None,
            year: Some("".into()),
            description: Some("Brakes squeal".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(order.car.vin.as_deref(), Some("1HGCM82633A004352"));
        assert_eq!(order.car.year, None);
    }
}
