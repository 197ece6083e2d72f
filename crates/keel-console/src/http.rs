//! Thin JSON transport over the directory API.
//!
//! Owns the reqwest client, the base URL, and the bearer token; maps non-2xx
//! responses into [`ConsoleError::Remote`] with the service's structured error
//! body when one is present.
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct WireError {
    code: String,
    message: String,
    #[serde(default)]
    fields: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub(crate) fn new(config: &ConsoleConfig) -> ConsoleResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    pub(crate) fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ConsoleResult<T> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        decode(response).await
    }

    pub(crate) async fn post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ConsoleResult<T> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> ConsoleResult<()> {
        let response = self.request(reqwest::Method::POST, path).send().await?;
        expect_success(response).await
    }

    pub(crate) async fn patch<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ConsoleResult<T> {
        let response = self
            .request(reqwest::Method::PATCH, path)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn put<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ConsoleResult<T> {
        let response = self
            .request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ConsoleResult<()> {
        let response = self.request(reqwest::Method::DELETE, path).send().await?;
        expect_success(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ConsoleResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    Err(remote_error(status, response).await)
}

async fn expect_success(response: reqwest::Response) -> ConsoleResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(remote_error(status, response).await)
}

async fn remote_error(status: reqwest::StatusCode, response: reqwest::Response) -> ConsoleError {
    // The service answers with a structured body; fall back to a generic
    // message when something upstream (proxy, panic handler) does not.
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<WireError>(&body) {
        Ok(wire) => ConsoleError::Remote {
            status: status.as_u16(),
            code: wire.code,
            message: wire.message,
            fields: wire.fields.unwrap_or_default(),
        },
        Err(_) => ConsoleError::Remote {
            status: status.as_u16(),
            code: "unknown".to_string(),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
            fields: BTreeMap::new(),
        },
    }
}
