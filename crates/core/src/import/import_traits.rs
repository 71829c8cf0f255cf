use crate::errors::Result;
use async_trait::async_trait;

/// Trait for spreadsheet import operations
#[async_trait]
pub trait HoldingsImportServiceTrait: Send + Sync {
    /// Parses spreadsheet bytes and upserts the holdings they describe into
    /// the portfolio. Returns the number of holdings imported.
    async fn import_xlsx(&self, portfolio_id: &str, bytes: &[u8]) -> Result<usize>;
}
