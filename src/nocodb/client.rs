//! REST client for the NocoDB v2 records API.
//!
//! Uses reqwest with the `xc-token` header. Requests target
//! `{base}/api/v2/tables/{table}/records?limit=..&offset=..[&viewId=..]`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;
use crate::nocodb::ConnectionSettings;
use crate::types::RawRecord;

/// One offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

/// Pagination metadata. Every field is optional and `is_last_page` is not
/// always trustworthy, so the pager treats it as a hint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default)]
    pub is_first_page: Option<bool>,
    #[serde(default)]
    pub is_last_page: Option<bool>,
}

/// Body of a records response: `{ list: [...], pageInfo?: {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub list: Vec<RawRecord>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl RecordPage {
    pub fn is_last_page(&self) -> bool {
        self.page_info
            .as_ref()
            .and_then(|info| info.is_last_page)
            .unwrap_or(false)
    }
}

/// A paginated source of raw lead rows.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<RecordPage, UpstreamError>;

    /// Short label for logs.
    fn describe(&self) -> String {
        "record source".to_string()
    }
}

pub struct NocoClient {
    client: reqwest::Client,
    settings: ConnectionSettings,
}

impl NocoClient {
    pub fn new(settings: ConnectionSettings) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    /// Full URL for one page request.
    pub fn page_url(&self, request: PageRequest) -> Result<url::Url, UpstreamError> {
        let mut url = self
            .settings
            .base_url
            .join(&format!("api/v2/tables/{}/records", self.settings.table_id))
            .map_err(|e| UpstreamError::Transport(format!("Invalid records URL: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(view_id) = &self.settings.view_id {
                query.append_pair("viewId", view_id);
            }
            query.append_pair("limit", &request.limit.to_string());
            query.append_pair("offset", &request.offset.to_string());
        }

        Ok(url)
    }

    /// URL with the table id masked, for logging.
    fn redacted(&self, url: &url::Url) -> String {
        url.as_str().replace(&self.settings.table_id, "***")
    }

    fn map_send_error(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout(self.settings.timeout.as_secs())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RecordSource for NocoClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<RecordPage, UpstreamError> {
        let url = self.page_url(request)?;
        log::debug!("NocoDB: GET {}", self.redacted(&url));

        let resp = self
            .client
            .get(url)
            .header("xc-token", self.settings.api_token.as_str())
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_page(&text)
    }

    fn describe(&self) -> String {
        match &self.settings.view_id {
            Some(view) => format!("NocoDB view {}", view),
            None => "NocoDB table ***".to_string(),
        }
    }
}

/// Decode a records response body.
pub fn parse_page(body: &str) -> Result<RecordPage, UpstreamError> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        UpstreamError::Decode(format!("{}: {}", e, preview))
    })
}
