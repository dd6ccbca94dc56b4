//! HTTP API handlers for dashkit-cleaner

pub mod buildinfo;
pub mod dataset;
pub mod health;
pub mod imputation;
pub mod ui;

pub use buildinfo::get_build_info;
pub use dataset::dataset_routes;
pub use health::health_routes;
pub use imputation::impute_routes;
pub use ui::ui_routes;
