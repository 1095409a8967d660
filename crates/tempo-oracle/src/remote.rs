//! Remote judgment service HTTP client.
//!
//! Speaks a typed JSON contract with an external decision-maker. The client
//! performs no retries of its own - transient failures are surfaced as
//! transient [`OracleError`] variants and the planner's invoker owns the
//! retry/backoff policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use tempo_models::{ClipForAssembly, StyleProfile};

use crate::error::{OracleError, OracleResult};
use crate::judge::ClipJudge;
use crate::types::{ClassificationResult, CutPointDecision, QualityVerdict};

/// Configuration for the remote judge.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of the judgment service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Optional bearer token.
    pub api_key: Option<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout: Duration::from_secs(60),
            api_key: None,
        }
    }
}

impl OracleConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ORACLE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ORACLE_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            api_key: std::env::var("ORACLE_API_KEY").ok(),
        }
    }
}

/// HTTP-backed implementation of [`ClipJudge`].
pub struct RemoteJudge {
    http: Client,
    config: OracleConfig,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    clip: &'a ClipForAssembly,
}

#[derive(Debug, Serialize)]
struct CutPointRequest<'a> {
    clip: &'a ClipForAssembly,
    target_duration_seconds: f64,
    is_dialogue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a StyleProfile>,
}

#[derive(Debug, Serialize)]
struct QualityRequest<'a> {
    clip: &'a ClipForAssembly,
    chunk_duration_seconds: f64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl RemoteJudge {
    /// Create a new remote judge.
    pub fn new(config: OracleConfig) -> OracleResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(OracleError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> OracleResult<Self> {
        Self::new(OracleConfig::from_env())
    }

    async fn post_json<Req, Resp>(&self, endpoint: &str, request: &Req) -> OracleResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);
        debug!("Sending judgment request to {}", url);

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OracleError::Timeout(self.config.timeout.as_secs())
            } else {
                OracleError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body: ErrorBody = response.json().await.unwrap_or(ErrorBody {
                message: String::new(),
            });
            return Err(OracleError::RateLimited(body.message));
        }
        if status.is_server_error() {
            return Err(OracleError::ServiceUnavailable(format!(
                "{} returned {}",
                endpoint, status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed(format!(
                "{} returned {}: {}",
                endpoint, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ClipJudge for RemoteJudge {
    async fn classify(&self, clip: &ClipForAssembly) -> OracleResult<ClassificationResult> {
        self.post_json("/classify", &ClassifyRequest { clip }).await
    }

    async fn choose_cut_points(
        &self,
        clip: &ClipForAssembly,
        target_duration_seconds: f64,
        is_dialogue: bool,
        style: Option<&StyleProfile>,
    ) -> OracleResult<CutPointDecision> {
        self.post_json(
            "/cut-points",
            &CutPointRequest {
                clip,
                target_duration_seconds,
                is_dialogue,
                style,
            },
        )
        .await
    }

    async fn evaluate_quality(
        &self,
        clip: &ClipForAssembly,
        chunk_duration_seconds: f64,
    ) -> OracleResult<QualityVerdict> {
        self.post_json(
            "/quality",
            &QualityRequest {
                clip,
                chunk_duration_seconds,
            },
        )
        .await
    }
}
