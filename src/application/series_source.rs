// Source trait for sheet-backed time series
use crate::domain::sample::SamplePoint;
use async_trait::async_trait;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Sheet {sheet} request failed with status {status}")]
    Status { sheet: String, status: u16 },

    #[error("Sheet {sheet} request could not be sent: {source}")]
    Transport {
        sheet: String,
        #[source]
        source: BoxError,
    },

    #[error("Sheet {sheet} response could not be decoded: {source}")]
    Decode {
        sheet: String,
        #[source]
        source: BoxError,
    },
}

impl FetchError {
    pub fn sheet(&self) -> &str {
        match self {
            FetchError::Status { sheet, .. }
            | FetchError::Transport { sheet, .. }
            | FetchError::Decode { sheet, .. } => sheet,
        }
    }
}

#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Fetch at most `limit` of the most recent samples of one sheet
    async fn fetch_series(&self, sheet: &str, limit: usize) -> Result<Vec<SamplePoint>, FetchError>;
}
