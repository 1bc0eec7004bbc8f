//! Route tables. Each builder applies the shared state itself.

mod auth;
mod common;
mod farmer;
mod order;
mod product;

pub use auth::auth_routes;
pub use common::common_routes;
pub use farmer::farmer_routes;
pub use order::order_routes;
pub use product::product_routes;
