//! HTTP client for the planner server.
//!
//! Every endpoint is a form-encoded POST answered with JSON. Requests carry
//! a correlation id in the logs, share one circuit breaker, and the
//! geocode/course-check replies are cached.

use super::cache::{UpstreamCacheState, GEOCODE_KEY};
use super::error::UpstreamError;
use super::types::{
    CheckCourseResponse, CourseCheck, GeocodePayload, KeywordMatches, ScheduleResponse,
    TreeOutcome, TreeResponse,
};
use super::PlannerApi;
use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// Default address of the planner server (Flask's default port).
const PLANNER_BASE_URL: &str = "http://127.0.0.1:5000";

const TREE_PATH: &str = "/_get_tree/";
const KEYWORD_PATH: &str = "/_keyword_search/";
const CHECK_COURSE_PATH: &str = "/check_course/";
const CREATE_SCHEDULE_PATH: &str = "/create_schedule/";
const NEXT_SCHEDULE_PATH: &str = "/get_schedules/";
const GATHER_PATH: &str = "/gather";

/// Configuration for the planner server client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the planner server
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Overall per-request timeout
    pub request_timeout_secs: u64,
    /// How long geocode and course-check replies stay cached
    pub cache_ttl_secs: u64,
    /// Transient failures before the circuit breaker opens
    pub breaker_threshold: u32,
    pub breaker_recovery_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: PLANNER_BASE_URL.to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            cache_ttl_secs: 10 * 60,
            breaker_threshold: 5,
            breaker_recovery_secs: 30,
            user_agent: concat!("uw_planner/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Client for the planner server.
pub struct HttpPlanner {
    client: Client,
    base_url: Url,
    cache_state: Arc<UpstreamCacheState>,
}

impl HttpPlanner {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let cache_state = Arc::new(UpstreamCacheState::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.breaker_threshold,
            Duration::from_secs(config.breaker_recovery_secs),
        ));
        Self::with_cache_state(config, cache_state)
    }

    pub fn with_cache_state(
        config: &UpstreamConfig,
        cache_state: Arc<UpstreamCacheState>,
    ) -> Result<Self, UpstreamError> {
        // The server keeps one process-wide schedule iterator, not per-session state
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            cache_state,
        })
    }

    /// POSTs `form` to `path` and returns the raw response.
    async fn post(
        &self,
        path: &str,
        form: &[(&str, &str)],
        correlation_id: &str,
    ) -> Result<reqwest::Response, UpstreamError> {
        if self.cache_state.circuit_breaker.is_open() {
            warn!(
                correlation_id = %correlation_id,
                path = %path,
                "Circuit breaker is open, rejecting request"
            );
            return Err(UpstreamError::CircuitBreakerOpen);
        }

        let url = self.base_url.join(path)?;
        let start = Instant::now();
        debug!(correlation_id = %correlation_id, url = %url, "Sending planner request");

        let result = self.send_form(url, path, form).await;

        match &result {
            Ok(_) => {
                self.cache_state.circuit_breaker.record_success();
                info!(
                    correlation_id = %correlation_id,
                    path = %path,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Planner request completed"
                );
            }
            Err(e) => {
                if e.is_retryable() {
                    self.cache_state.circuit_breaker.record_failure();
                }
                error!(
                    correlation_id = %correlation_id,
                    path = %path,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Planner request failed"
                );
            }
        }

        result
    }

    async fn send_form(
        &self,
        url: Url,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = self.client.post(url).form(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(UpstreamError::UnexpectedResponse {
                message: format!("{} returned status {}: {}", path, status, error_text),
            });
        }

        Ok(response)
    }

    /// POSTs `form` to `path` and decodes the JSON body.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let correlation_id = generate_correlation_id();
        let response = self.post(path, form, &correlation_id).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(
                correlation_id = %correlation_id,
                path = %path,
                error = %e,
                "Planner response did not decode"
            );
            UpstreamError::from(e)
        })
    }
}

#[async_trait]
impl PlannerApi for HttpPlanner {
    async fn get_tree(&self, name: &str) -> Result<TreeOutcome, UpstreamError> {
        let response: TreeResponse = self.post_json(TREE_PATH, &[("name", name)]).await?;
        Ok(TreeOutcome::decode(&response.data))
    }

    async fn keyword_search(&self, keyword: &str) -> Result<KeywordMatches, UpstreamError> {
        self.post_json(KEYWORD_PATH, &[("keyword", keyword)]).await
    }

    async fn geocode(&self) -> Result<Arc<GeocodePayload>, UpstreamError> {
        if let Some(cached) = self.cache_state.geocode.get(&GEOCODE_KEY) {
            debug!("Returning cached geocode payload");
            return Ok(cached);
        }

        let _guard = self.cache_state.geocode_refresh.lock().await;

        // Double-check cache after acquiring lock
        if let Some(cached) = self.cache_state.geocode.get(&GEOCODE_KEY) {
            debug!("Returning cached geocode payload (post-lock)");
            return Ok(cached);
        }

        let payload: GeocodePayload = self.post_json(GEOCODE_KEY, &[]).await?;
        info!(
            buildings = payload.data.len(),
            departments = payload.courses.0.len(),
            "Fetched geocode payload"
        );

        let payload = Arc::new(payload);
        self.cache_state.geocode.insert(GEOCODE_KEY, payload.clone());
        Ok(payload)
    }

    async fn check_course(&self, course: &str) -> Result<CourseCheck, UpstreamError> {
        let key = course.trim().to_uppercase().replace(' ', "");
        if let Some(cached) = self.cache_state.course_checks.get(&key) {
            return Ok(CourseCheck {
                course: course.to_string(),
                ..cached
            });
        }

        let response: CheckCourseResponse =
            self.post_json(CHECK_COURSE_PATH, &[("course", course)]).await?;
        let check = CourseCheck {
            course: course.to_string(),
            offered: response.data,
            name: response.name,
        };
        self.cache_state.course_checks.insert(key, check.clone());
        Ok(check)
    }

    async fn create_schedule(&self, courses: &[String]) -> Result<ScheduleResponse, UpstreamError> {
        let joined = courses.join(",");
        self.post_json(CREATE_SCHEDULE_PATH, &[("course", joined.as_str())])
            .await
    }

    async fn next_schedule(&self) -> Result<ScheduleResponse, UpstreamError> {
        self.post_json(NEXT_SCHEDULE_PATH, &[]).await
    }

    async fn gather(&self) -> Result<(), UpstreamError> {
        let correlation_id = generate_correlation_id();
        self.post(GATHER_PATH, &[], &correlation_id).await?;

        // Gathering regenerates the files the cached replies came from
        self.cache_state.clear();
        info!(correlation_id = %correlation_id, "Gather finished, caches cleared");
        Ok(())
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
