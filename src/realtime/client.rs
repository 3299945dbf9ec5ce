//! Realtime database REST client.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::event::StreamEvent;
use super::path;
use super::sse::EventParser;
use crate::error::{AppError, Result};

/// Client for one database instance.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct RtdbClient {
    client: Client,
    stream_client: Client,
    base_url: Url,
    auth: Option<String>,
}

impl RtdbClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `database_url` - Database root (e.g., "https://demo-default-rtdb.firebaseio.com")
    /// * `timeout` - Limit for point reads and writes; streams only get a connect timeout
    pub fn new(database_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(database_url.trim_end_matches('/'))
            .map_err(|e| AppError::config(format!("Invalid database URL '{database_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!("Invalid database URL '{database_url}'")));
        }

        let client = Client::builder().timeout(timeout).build()?;
        let stream_client = Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            client,
            stream_client,
            base_url,
            auth: None,
        })
    }

    /// Set or clear the ID token sent with every request.
    pub fn set_auth(&mut self, id_token: Option<String>) {
        self.auth = id_token;
    }

    /// Return a copy carrying `id_token`.
    pub fn with_auth(mut self, id_token: impl Into<String>) -> Self {
        self.auth = Some(id_token.into());
        self
    }

    /// REST URL of `path`: each segment percent-encoded, `.json` appended.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        let segs = path::segments(path);
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|()| AppError::config("Database URL cannot carry a path"))?;
            parts.pop_if_empty();
            match segs.split_last() {
                Some((last, parents)) => {
                    parts.extend(parents);
                    parts.push(&format!("{last}.json"));
                }
                None => {
                    parts.push(".json");
                }
            }
        }
        Ok(url)
    }

    fn request(&self, client: &Client, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url_for(path)?;
        let mut builder = client.request(method, url);
        if let Some(token) = &self.auth {
            builder = builder.query(&[("auth", token.as_str())]);
        }
        Ok(builder)
    }

    /// Read the value at `path`. Missing data reads as `Value::Null`.
    pub async fn get(&self, path: &str) -> Result<Value> {
        let response = self.request(&self.client, Method::GET, path)?.send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Overwrite the value at `path`.
    pub async fn set<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> Result<()> {
        debug!("PUT {path}");
        let response = self
            .request(&self.client, Method::PUT, path)?
            .json(value)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Write several children below `path` at once.
    ///
    /// Keys may be multi-segment paths and null values delete; the whole
    /// update is applied atomically.
    pub async fn update(&self, path: &str, values: &Map<String, Value>) -> Result<()> {
        debug!("PATCH {path} ({} keys)", values.len());
        let response = self
            .request(&self.client, Method::PATCH, path)?
            .json(values)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Delete the value at `path`.
    pub async fn remove(&self, path: &str) -> Result<()> {
        debug!("DELETE {path}");
        let response = self.request(&self.client, Method::DELETE, path)?.send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// Stream changes at `path`, calling `on_event` for each event.
    ///
    /// Returns when the server ends the stream, after a `cancel` or
    /// `auth_revoked` event, or as soon as `on_event` returns `false`.
    pub async fn listen<F>(&self, path: &str, mut on_event: F) -> Result<()>
    where
        F: FnMut(StreamEvent) -> bool,
    {
        let response = self
            .request(&self.stream_client, Method::GET, path)?
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let mut response = check_status(response).await?;

        let mut parser = EventParser::new();
        while let Some(chunk) = response.chunk().await? {
            for raw in parser.feed(&chunk) {
                let event = match StreamEvent::from_sse(&raw) {
                    Ok(Some(event)) => event,
                    Ok(None) => {
                        debug!("Ignoring stream event '{}'", raw.event);
                        continue;
                    }
                    Err(e) => {
                        warn!("Dropping malformed event on {path}: {e}");
                        continue;
                    }
                };
                let terminal = matches!(event, StreamEvent::Cancel(_) | StreamEvent::AuthRevoked);
                if !on_event(event) || terminal {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Turn a non-success response into an error carrying the server's message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body.trim().to_string()
            }
        });

    match status.as_u16() {
        401 | 403 => Err(AppError::PermissionDenied(message)),
        code => Err(AppError::Database { status: code, message }),
    }
}
