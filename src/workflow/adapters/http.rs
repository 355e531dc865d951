//! Webhook delivery through `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method, Url};

use crate::{
    config::WebhookConfig,
    workflow::{
        domain::HttpMethod,
        ports::{WebhookClient, WebhookError, WebhookRequest, WebhookResponse, WebhookResult},
    },
};

/// Webhook client backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestWebhookClient {
    client: Client,
}

impl ReqwestWebhookClient {
    /// Builds a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn from_config(config: &WebhookConfig) -> WebhookResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(WebhookError::transport)?;
        Ok(Self { client })
    }
}

const fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl WebhookClient for ReqwestWebhookClient {
    async fn send(&self, request: &WebhookRequest) -> WebhookResult<WebhookResponse> {
        let url =
            Url::parse(&request.url).map_err(|_| WebhookError::InvalidUrl(request.url.clone()))?;
        let mut builder = self.client.request(to_reqwest(request.method), url);
        if request.method.has_body() {
            builder = builder.json(&request.body);
        }
        let response = builder.send().await.map_err(WebhookError::transport)?;
        Ok(WebhookResponse {
            status: response.status().as_u16(),
        })
    }
}
