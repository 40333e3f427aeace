//! Role capability table. Every mutating service call goes through
//! [`authorize`] before it touches the database.

use crate::{entity::Role, error::AppError, middleware::auth::CurrentUser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewCars,
    RegisterCar,
    ViewParts,
    ManageParts,
    CreateWorkOrder,
    ViewWorkOrders,
    AssignMechanic,
    UpdateStatus,
    CompleteOrder,
    ManageUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    All,
    Own,
    Denied,
}

/// What an allowed caller may see or touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    All,
    /// Restricted to records tied to this user id.
    Own(i32),
}

/// One row per action: manager, mechanic, client.
struct Row(Access, Access, Access);

const fn row(action: Action) -> Row {
    use Access::{All, Denied, Own};
    match action {
        Action::ViewCars => Row(All, All, Own),
        Action::RegisterCar => Row(All, All, Denied),
        Action::ViewParts => Row(All, All, All),
        Action::ManageParts => Row(All, Denied, Denied),
        Action::CreateWorkOrder => Row(Denied, Denied, Own),
        Action::ViewWorkOrders => Row(All, Own, Own),
        Action::AssignMechanic => Row(All, Denied, Denied),
        Action::UpdateStatus => Row(All, Denied, Denied),
        Action::CompleteOrder => Row(Denied, All, Denied),
        Action::ManageUsers => Row(All, Denied, Denied),
    }
}

impl Action {
    pub fn access_for(self, role: Role) -> Access {
        let Row(manager, mechanic, client) = row(self);
        match role {
            Role::Manager => manager,
            Role::Mechanic => mechanic,
            Role::Client => client,
        }
    }

    pub fn denial_message(self) -> &'static str {
        match self {
            Action::ViewCars => "You are not allowed to view this car.",
            Action::RegisterCar => "Only managers and mechanics can register cars.",
            Action::ViewParts => "You are not allowed to view the inventory.",
            Action::ManageParts => "Only managers can manage the inventory.",
            Action::CreateWorkOrder => "Only clients can create work orders.",
            Action::ViewWorkOrders => "You are not allowed to view this work order.",
            Action::AssignMechanic => "Only managers can assign mechanics.",
            Action::UpdateStatus => "Only managers can update the status.",
            Action::CompleteOrder => "Only mechanics can complete work orders.",
            Action::ManageUsers => "Only managers can manage users.",
        }
    }

    /// Safe view to send the user back to after a denial.
    pub fn fallback_path(self) -> &'static str {
        match self {
            Action::ViewCars | Action::RegisterCar => "/cars/",
            Action::ViewParts | Action::ManageParts => "/parts/",
            Action::CreateWorkOrder
            | Action::ViewWorkOrders
            | Action::AssignMechanic
            | Action::UpdateStatus
            | Action::CompleteOrder => "/work-orders/",
            Action::ManageUsers => "/",
        }
    }

    pub fn denied(self) -> AppError {
        AppError::Forbidden {
            message: self.denial_message().to_string(),
            redirect: self.fallback_path(),
        }
    }
}

pub fn authorize(user: &CurrentUser, action: Action) -> Result<Grant, AppError> {
    match action.access_for(user.role) {
        Access::All => Ok(Grant::All),
        Access::Own => Ok(Grant::Own(user.user_id)),
        Access::Denied => {
            tracing::debug!(user_id = user.user_id, role = %user.role, ?action, "action denied");
            Err(action.denied())
        }
    }
}
