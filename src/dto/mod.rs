pub mod auth;
pub mod cars;
pub mod dashboard;
pub mod form;
pub mod parts;
pub mod users;
pub mod work_orders;
