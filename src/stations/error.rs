use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Failed to parse JSON page from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store at {url} returned offset {offset:?} a second time")]
    RepeatedOffset { url: String, offset: String },

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
