pub mod audit_logs;
pub mod cars;
pub mod parts;
pub mod users;
pub mod work_order_parts;
pub mod work_orders;

pub use audit_logs::Entity as AuditLogs;
pub use cars::Entity as Cars;
pub use parts::Entity as Parts;
pub use users::{Entity as Users, Role};
pub use work_order_parts::Entity as WorkOrderParts;
pub use work_orders::{Entity as WorkOrders, WorkOrderStatus};
