//! Daily workflow runner
//!
//! Drives the three pipeline stages strictly in order, each as an HTTP call
//! to its own endpoint, with a fixed pause between stages.
//!
//! The policy is continue-on-failure: a stage failure is recorded and the
//! remaining stages still run, so one bad stage never starves the next
//! scheduled invocation of fresher work. Recovery is the next scheduled run;
//! there is no intra-run retry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use newsdesk_core::NewsdeskError;

/// Pause between stages
const STAGE_DELAY: Duration = Duration::from_millis(2000);

/// The three pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Scrape,
    Classify,
    Generate,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Scrape, Stage::Classify, Stage::Generate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Scrape => "scrape-news",
            Stage::Classify => "classify-articles",
            Stage::Generate => "generate-instagram",
        }
    }

    /// Endpoint path invoked for this stage
    pub fn endpoint(&self) -> &'static str {
        match self {
            Stage::Scrape => "/api/cron/scrape-news",
            Stage::Classify => "/api/cron/classify-articles",
            Stage::Generate => "/api/cron/generate-instagram",
        }
    }
}

/// Aggregated outcome of one workflow run.
///
/// Every stage slot is populated with the stage's raw response on success
/// and left `None` on failure; failures land in `errors`. Overall success
/// is defined as an empty error list.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResults {
    pub scrape_news: Option<Value>,
    pub classify_articles: Option<Value>,
    pub generate_instagram: Option<Value>,
    pub errors: Vec<String>,
}

impl WorkflowResults {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record_ok(&mut self, stage: Stage, body: Value) {
        match stage {
            Stage::Scrape => self.scrape_news = Some(body),
            Stage::Classify => self.classify_articles = Some(body),
            Stage::Generate => self.generate_instagram = Some(body),
        }
    }

    fn record_failure(&mut self, stage: Stage, message: String) {
        error!("Stage {} failed: {}", stage.as_str(), message);
        self.errors.push(format!("{} failed: {}", stage.as_str(), message));
    }
}

/// How a stage is invoked, separated out so the continue-on-failure policy
/// is testable without a server.
#[async_trait]
pub trait StageInvoker: Send + Sync {
    async fn invoke(&self, stage: Stage) -> Result<Value, NewsdeskError>;
}

/// Invokes stages over HTTP against the service's own base URL
pub struct HttpStageInvoker {
    client: reqwest::Client,
    base_url: String,
    cron_secret: Option<String>,
}

impl HttpStageInvoker {
    pub fn new(base_url: String, cron_secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cron_secret,
        }
    }
}

#[async_trait]
impl StageInvoker for HttpStageInvoker {
    async fn invoke(&self, stage: Stage) -> Result<Value, NewsdeskError> {
        let url = format!("{}{}", self.base_url, stage.endpoint());

        let mut request = self.client.get(&url);
        if let Some(secret) = &self.cron_secret {
            request = request.header("authorization", format!("Bearer {}", secret));
        }

        let response = request
            .send()
            .await
            .map_err(|e| NewsdeskError::network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NewsdeskError::api(format!("status {}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| NewsdeskError::parse(e.to_string()))
    }
}

/// Sequential three-stage workflow
pub struct WorkflowRunner<I: StageInvoker> {
    invoker: I,
    stage_delay: Duration,
}

impl<I: StageInvoker> WorkflowRunner<I> {
    pub fn new(invoker: I) -> Self {
        Self {
            invoker,
            stage_delay: STAGE_DELAY,
        }
    }

    pub fn with_stage_delay(mut self, stage_delay: Duration) -> Self {
        self.stage_delay = stage_delay;
        self
    }

    /// Run all three stages in order.
    ///
    /// Every stage is attempted exactly once per run regardless of earlier
    /// outcomes.
    pub async fn run(&self) -> WorkflowResults {
        info!("Starting daily workflow");
        let mut results = WorkflowResults::default();

        for (index, stage) in Stage::ALL.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.stage_delay).await;
            }

            info!("Running stage: {}", stage.as_str());
            match self.invoker.invoke(stage).await {
                Ok(body) => results.record_ok(stage, body),
                Err(e) => results.record_failure(stage, e.to_string()),
            }
        }

        info!(
            "Daily workflow completed ({} errors)",
            results.errors.len()
        );
        results
    }
}
