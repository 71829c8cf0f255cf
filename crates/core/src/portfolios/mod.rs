//! Portfolios module - domain models, services, and traits.

mod portfolios_model;
mod portfolios_service;
mod portfolios_traits;

pub use portfolios_model::{NewPortfolio, Portfolio};
pub use portfolios_service::PortfolioService;
pub use portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
