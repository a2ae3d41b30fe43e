use crate::config::StoreConfig;
use crate::stations::error::StoreError;
use crate::types::raw_record::{RawRecord, RecordPage};
use log::{debug, info, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

/// Reads the station table page by page.
pub struct StoreClient {
    config: StoreConfig,
    http: Client,
}

impl StoreClient {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StoreError::ClientBuild)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Follows the continuation cursor until the store stops returning one.
    ///
    /// Pages are requested one after the other so cursors resolve in order.
    /// Any failure aborts the whole walk; records from earlier pages are dropped.
    /// A cursor the store already handed out is a failure too.
    pub async fn fetch_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut seen_offsets = HashSet::new();
        let mut page_number = 0usize;

        loop {
            page_number += 1;
            let page = self.fetch_page(offset.as_deref()).await?;
            let fetched = page.records.len();
            records.extend(page.records);
            info!(
                "Fetched page {} with {} records, total so far: {}",
                page_number,
                fetched,
                records.len()
            );

            match page.offset {
                Some(next) if !next.is_empty() => {
                    if !seen_offsets.insert(next.clone()) {
                        warn!("Offset {:?} repeated after page {}", next, page_number);
                        return Err(StoreError::RepeatedOffset {
                            url: self.config.list_url(),
                            offset: next,
                        });
                    }
                    offset = Some(next);
                }
                _ => break,
            }
        }

        Ok(records)
    }

    /// Requests a single page, starting at `offset` when given.
    pub async fn fetch_page(&self, offset: Option<&str>) -> Result<RecordPage, StoreError> {
        let url = self.config.list_url();
        let page_size = self.config.page_size.to_string();
        let mut query: Vec<(&str, &str)> =
            vec![("view", self.config.view.as_str()), ("pageSize", page_size.as_str())];
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }
        debug!("Requesting {} with offset {:?}", url, offset);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| StoreError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    StoreError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    StoreError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::ResponseBody(url.clone(), e))?;
        serde_json::from_slice::<RecordPage>(&body)
            .map_err(|source| StoreError::JsonParse { url, source })
    }
}
