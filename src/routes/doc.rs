use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginForm, LoginResponse},
        cars::{CarDetail, CarList, RegisterCarForm},
        dashboard::{Dashboard, StatusCount},
        parts::{CreatePartForm, PartList, RestockForm},
        users::{CreateUserForm, UserList},
        work_orders::{
            AssignMechanicForm, CompleteOrderForm, CompletedWorkOrder, CreateWorkOrderForm,
            UpdateStatusForm, UsedPart, WorkOrderDetail, WorkOrderList,
        },
    },
    entity::{Role, WorkOrderStatus},
    models::{Car, Part, User, WorkOrder, WorkOrderPart},
    response::{ApiResponse, Meta},
    routes::{auth, cars, dashboard, health, params, parts, users, work_orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        dashboard::dashboard,
        cars::list_cars,
        cars::register_car,
        cars::get_car,
        parts::list_parts,
        parts::add_part,
        parts::list_low_stock,
        parts::restock,
        users::list_users,
        users::create_user,
        work_orders::list_work_orders,
        work_orders::create_work_order,
        work_orders::assign_mechanic,
        work_orders::update_status,
        work_orders::complete_work_order,
        work_orders::get_work_order
    ),
    components(
        schemas(
            Role,
            WorkOrderStatus,
            User,
            Car,
            Part,
            WorkOrder,
            WorkOrderPart,
            LoginForm,
            LoginResponse,
            Dashboard,
            StatusCount,
            RegisterCarForm,
            CarList,
            CarDetail,
            CreatePartForm,
            RestockForm,
            PartList,
            CreateUserForm,
            UserList,
            CreateWorkOrderForm,
            AssignMechanicForm,
            UpdateStatusForm,
            CompleteOrderForm,
            WorkOrderList,
            WorkOrderDetail,
            CompletedWorkOrder,
            UsedPart,
            params::Pagination,
            params::ListQuery,
            params::WorkOrderListQuery,
            Meta,
            ApiResponse<WorkOrder>,
            ApiResponse<WorkOrderList>,
            ApiResponse<WorkOrderDetail>,
            ApiResponse<PartList>,
            ApiResponse<CarList>
        )
    ),
    security(
        ("session" = []),
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login session endpoints"),
        (name = "Dashboard", description = "Role specific landing view"),
        (name = "Cars", description = "Car endpoints"),
        (name = "Parts", description = "Inventory endpoints"),
        (name = "Users", description = "User management endpoints"),
        (name = "Work orders", description = "Work order lifecycle endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
