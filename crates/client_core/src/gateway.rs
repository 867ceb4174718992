//! Remote Data Gateway: one typed REST call per resource operation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{ListQuery, Page},
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::ClientSettings,
    error::{GatewayError, SchemaError},
    resources::Resource,
    schema::Validate,
};

#[async_trait]
pub trait ResourceGateway<R: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, GatewayError>;
    async fn get(&self, id: R::Id) -> Result<R::Record, GatewayError>;
    async fn create(&self, draft: &R::Draft) -> Result<R::Record, GatewayError>;
    async fn update(&self, id: R::Id, draft: &R::Draft) -> Result<R::Record, GatewayError>;
    async fn delete(&self, id: R::Id) -> Result<(), GatewayError>;
}

/// HTTP gateway against the configured API base URL. Stateless apart from the
/// pooled client; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct RestGateway {
    http: Client,
    base_url: Url,
}

impl RestGateway {
    pub fn new(settings: &ClientSettings) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|source| GatewayError::Transport {
                path: settings.api_base_url.to_string(),
                source,
            })?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|source| GatewayError::Endpoint {
                path: path.to_string(),
                source,
            })
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                path: path.to_string(),
                source,
            })?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "response received");

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound {
                path: path.to_string(),
            });
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ApiError>(&text).ok();
        let message = body
            .as_ref()
            .map(|body| body.message.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        warn!(path, status = status.as_u16(), %message, "request rejected by server");
        Err(GatewayError::Status {
            path: path.to_string(),
            status: status.as_u16(),
            message,
            body,
        })
    }

    async fn decode<T>(response: Response, path: &str) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Validate,
    {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport {
                path: path.to_string(),
                source,
            })?;
        let value: T = serde_json::from_slice(&bytes).map_err(|source| GatewayError::Decode {
            path: path.to_string(),
            source,
        })?;
        value.validate().map_err(|source| GatewayError::Schema {
            path: path.to_string(),
            source,
        })?;
        Ok(value)
    }
}

fn record_path<R: Resource>(id: R::Id) -> String {
    format!("{}/{id}", R::PATH)
}

#[async_trait]
impl<R: Resource> ResourceGateway<R> for RestGateway {
    async fn list(&self, query: &ListQuery) -> Result<Page<R::Record>, GatewayError> {
        let path = R::PATH;
        debug!(path, page = query.page, page_size = query.page_size, "listing records");
        let request = self.http.get(self.endpoint(path)?).query(&query.to_pairs());
        let response = self.send(request, path).await?;
        let page: Page<R::Record> = Self::decode(response, path).await?;
        if page.items.len() > query.page_size as usize {
            return Err(GatewayError::Schema {
                path: path.to_string(),
                source: SchemaError::new(
                    "items",
                    format!(
                        "{} items returned for a page size of {}",
                        page.items.len(),
                        query.page_size
                    ),
                ),
            });
        }
        Ok(page)
    }

    async fn get(&self, id: R::Id) -> Result<R::Record, GatewayError> {
        let path = record_path::<R>(id);
        let request = self.http.get(self.endpoint(&path)?);
        let response = self.send(request, &path).await?;
        Self::decode(response, &path).await
    }

    async fn create(&self, draft: &R::Draft) -> Result<R::Record, GatewayError> {
        let path = R::PATH;
        debug!(path, "creating record");
        let request = self.http.post(self.endpoint(path)?).json(draft);
        let response = self.send(request, path).await?;
        Self::decode(response, path).await
    }

    async fn update(&self, id: R::Id, draft: &R::Draft) -> Result<R::Record, GatewayError> {
        let path = record_path::<R>(id);
        debug!(path = %path, "updating record");
        let request = self.http.put(self.endpoint(&path)?).json(draft);
        let response = self.send(request, &path).await?;
        Self::decode(response, &path).await
    }

    async fn delete(&self, id: R::Id) -> Result<(), GatewayError> {
        let path = record_path::<R>(id);
        debug!(path = %path, "deleting record");
        let request = self.http.delete(self.endpoint(&path)?);
        self.send(request, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
