//! Home price prediction service (sibling demo service)

pub mod model;
pub mod rest;

pub use model::{PriceEstimator, PriceModel};
pub use rest::create_price_router;
