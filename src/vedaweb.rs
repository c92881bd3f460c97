//! VedaWeb document retrieval.
//!
//! [`VerseSource`] is the seam between verse lookup and the network. The
//! production implementation, [`VedaWebClient`], issues exactly one
//! `GET {base_url}/document/id/{id}` per call with a bounded timeout and no
//! retries.
//!
//! | Upstream status | Result |
//! |-----------------|--------|
//! | 2xx | `Ok(document)` |
//! | 404 | [`ExplorerError::NotFound`] |
//! | other | [`ExplorerError::Upstream`] |
//! | no answer in time | [`ExplorerError::Timeout`] |
//! | unreachable, or 2xx with a non-JSON body | [`ExplorerError::BadResponse`] |

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::VedaWebConfig;
use crate::error::ExplorerError;

pub const SERVICE_NAME: &str = "VedaWeb";

/// Fetches raw verse documents by their 7-character id.
#[async_trait]
pub trait VerseSource: Send + Sync {
    async fn fetch_document(&self, document_id: &str) -> Result<Value, ExplorerError>;
}

pub struct VedaWebClient {
    http: reqwest::Client,
    base_url: String,
}

impl VedaWebClient {
    pub fn new(config: &VedaWebConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn document_url(&self, document_id: &str) -> String {
        format!("{}/document/id/{}", self.base_url, document_id)
    }
}

#[async_trait]
impl VerseSource for VedaWebClient {
    async fn fetch_document(&self, document_id: &str) -> Result<Value, ExplorerError> {
        let url = self.document_url(document_id);
        tracing::debug!(%url, "fetching verse document");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ExplorerError::from_transport(SERVICE_NAME, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ExplorerError::NotFound(format!(
                "no verse document with id {}",
                document_id
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExplorerError::Upstream {
                service: SERVICE_NAME,
                status: status.as_u16(),
                detail: body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ExplorerError::from_transport(SERVICE_NAME, e))
    }
}
