pub mod currency;
pub mod error;
pub mod market;
pub mod method;

pub use error::ApiError;

use bon::Builder;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tracing::debug;

/// Where the API lives and who we identify as.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as the `username` query parameter on every request.
    pub username: String,
}

/// Body shape shared by every resource: the expected array, or `{"error": "..."}`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum ApiResponse<T> {
    Items(Vec<T>),
    Failure { error: String },
}

impl<T> ApiResponse<T> {
    pub(crate) fn into_result(self) -> Result<Vec<T>, ApiError> {
        match self {
            ApiResponse::Items(items) => Ok(items),
            ApiResponse::Failure { error } => Err(ApiError::Api(error)),
        }
    }
}

pub struct BadamClient {
    base_url: String,
    username: String,
    reqwest: Client,
}

impl BadamClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let reqwest = ClientBuilder::new()
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username,
            reqwest,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "GET");

        let response = self
            .reqwest
            .get(&url)
            .query(&[("username", self.username.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse<T>>()
            .await?;

        response.into_result()
    }

    pub async fn call<M: method::Method>(&self) -> Result<Vec<M::Item>, ApiError> {
        self.get(M::PATH).await
    }
}
