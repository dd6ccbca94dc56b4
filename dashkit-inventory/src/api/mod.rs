//! HTTP API handlers for dashkit-inventory

pub mod buildinfo;
pub mod dashboard;
pub mod health;
pub mod products;

pub use buildinfo::get_build_info;
pub use dashboard::dashboard_routes;
pub use health::health_routes;
pub use products::product_routes;
