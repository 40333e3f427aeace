pub mod auth_service;
pub mod car_service;
pub mod dashboard_service;
pub mod part_service;
pub mod user_service;
pub mod work_order_service;
