//! Provider that forwards questions to a `POST /api/search` endpoint
//! (usually `psalter serve`), so the API key stays on the server.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::inference::{ProviderError, SearchAnswer, SearchProvider, SearchRequest};

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: String,
}

pub struct RemoteSearchProvider {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteSearchProvider {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SearchProvider for RemoteSearchProvider {
    fn name(&self) -> &str {
        "remote"
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchAnswer, ProviderError> {
        info!("Remote search: POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Remote search status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Remote search error: {} - {}", status, body);
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("Сервер повернув помилку: {}", status.as_u16()));
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<SearchAnswer>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}
