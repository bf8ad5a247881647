// Sheet API client - reqwest implementation of SeriesSource
use crate::application::series_source::{FetchError, SeriesSource};
use crate::domain::sample::{decode_rows, RawSample, SamplePoint};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SheetClient {
    api_url: String,
    client: reqwest::Client,
}

impl SheetClient {
    pub fn new(api_url: String, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('?').to_string(),
            client: builder.build()?,
        })
    }

    fn build_url(&self, sheet: &str, limit: usize) -> String {
        format!(
            "{}?sheet={}&limit={}",
            self.api_url,
            urlencoding::encode(sheet),
            limit
        )
    }
}

#[async_trait]
impl SeriesSource for SheetClient {
    async fn fetch_series(&self, sheet: &str, limit: usize) -> Result<Vec<SamplePoint>, FetchError> {
        let url = self.build_url(sheet, limit);
        tracing::debug!(sheet, %url, "Requesting sheet");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                sheet: sheet.to_string(),
                source: Box::new(e),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                sheet: sheet.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            sheet: sheet.to_string(),
            source: Box::new(e),
        })?;

        let rows: Vec<RawSample> = serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
            sheet: sheet.to_string(),
            source: Box::new(e),
        })?;

        Ok(decode_rows(sheet, &rows))
    }
}
