//! Holdings module - domain models, services, and traits.

mod holdings_model;
mod holdings_service;
mod holdings_traits;

pub use holdings_model::{Holding, HoldingSettingsUpdate, HoldingSnapshot, HoldingUpsert, NewHolding};
pub use holdings_service::HoldingService;
pub use holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
