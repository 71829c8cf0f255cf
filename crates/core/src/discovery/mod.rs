pub mod discovery_model;
pub mod discovery_service;
pub mod discovery_traits;

pub use discovery_model::DiscoveryOutcome;
pub use discovery_service::TickerDiscoveryService;
pub use discovery_traits::TickerDiscoveryServiceTrait;
