pub mod import_service;
pub mod import_traits;

pub use import_service::HoldingsImportService;
pub use import_traits::HoldingsImportServiceTrait;
