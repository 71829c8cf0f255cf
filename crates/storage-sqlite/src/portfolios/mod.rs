pub mod model;
pub mod repository;

pub use model::PortfolioDB;
pub use repository::PortfolioRepository;
