pub mod model;
pub mod repository;

pub use model::HoldingDB;
pub use repository::HoldingRepository;
