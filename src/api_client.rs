use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Thin JSON client for the `/api/*` surface. Attaches the bearer token of
/// the current session when one is present.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Network(String),
    Http { status: u16, body: String },
    Deserialize(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Deserialize(msg) => write!(f, "Deserialization error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Best human-readable message for a toast or inline error line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { body, .. } => {
                crate::problem::try_problem_detail(body).unwrap_or_else(|| self.to_string())
            }
            other => other.to_string(),
        }
    }

    /// True when the response body carries the given RFC7807 problem type.
    pub fn is_problem(&self, type_url: &str) -> bool {
        match self {
            ApiError::Http { body, .. } => crate::problem::is_problem_type(body, type_url),
            _ => false,
        }
    }
}

impl ApiClient {
    pub fn new(bearer: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: "".to_string(),
            bearer,
        }
    }

    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if self.base_url.is_empty() {
            // Allow relative URLs (recommended for same-origin /api/*)
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        }
    }

    fn authed(&self, rb: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => rb.header("Authorization", format!("Bearer {token}")),
            None => rb,
        }
    }

    async fn read_response<TRes: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<TRes, ApiError> {
        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();

        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            return Err(ApiError::Http { status, body: text });
        }

        // Handle void returns which might be an empty body
        if text.is_empty() {
            serde_json::from_str("null").map_err(|e| ApiError::Deserialize(e.to_string()))
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))
        }
    }

    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let rb = self.authed(self.client.get(self.url(path)));
        let resp = rb
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_response(resp).await
    }

    pub async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let body_bytes =
            serde_json::to_vec(body).map_err(|e| ApiError::Deserialize(e.to_string()))?;
        let rb = self
            .authed(self.client.post(self.url(path)))
            .body(body_bytes)
            .header("Content-Type", "application/json");
        let resp = rb
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_response(resp).await
    }

    pub async fn put_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        path: &str,
        body: &TReq,
    ) -> Result<TRes, ApiError> {
        let body_bytes =
            serde_json::to_vec(body).map_err(|e| ApiError::Deserialize(e.to_string()))?;
        let rb = self
            .authed(self.client.put(self.url(path)))
            .body(body_bytes)
            .header("Content-Type", "application/json");
        let resp = rb
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_response(resp).await
    }

    pub async fn delete_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        let rb = self.authed(self.client.delete(self.url(path)));
        let resp = rb
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::read_response(resp).await
    }
}
