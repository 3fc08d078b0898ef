//! Platform client for the n8n public REST API
//!
//! One method per platform operation, grouped by resource:
//!
//! - `workflows` - CRUD, activation, execution and workflow tags
//! - `executions` - list/get/delete and status counts
//! - `tags` - tag CRUD with best-effort name de-duplication
//! - `credentials` - create/delete and type schemas
//!
//! Every call resolves its environment through the [`TransportFactory`] and
//! funnels non-success responses through [`classify`].

pub mod classify;
pub mod credentials;
pub mod executions;
pub mod tags;
pub mod transport;
pub mod types;
pub mod workflows;

pub use classify::{classify, classify_with, extract_message, ErrorRule, StatusMatch, DEFAULT_RULES};
pub use executions::ExecutionQuery;
pub use transport::{Transport, TransportFactory, API_KEY_HEADER};
pub use types::{Execution, ExecutionStats, Page, Tag, Workflow, WorkflowSummary};
pub use workflows::{ActivationOutcome, ExecutionOutcome, WorkflowQuery};

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::error::{N8nError, N8nResult};
use crate::wait::PollPolicy;

/// Upper bound on pages fetched when walking a cursor-paginated listing
const MAX_PAGES: usize = 50;

/// Query string pairs
pub(crate) type Query = Vec<(&'static str, String)>;

/// Entry point for all n8n REST operations
#[derive(Debug)]
pub struct N8nApi {
    transports: TransportFactory,
    poll_policy: PollPolicy,
}

impl N8nApi {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            transports: TransportFactory::new(config),
            poll_policy: PollPolicy::default(),
        }
    }

    /// Override how long `execute_workflow` waits for a run to settle
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn transports(&self) -> &TransportFactory {
        &self.transports
    }

    pub fn config(&self) -> Arc<Config> {
        self.transports.config()
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll_policy
    }

    /// Issue one request and return the decoded JSON body
    ///
    /// An empty success body becomes `Value::Null`.
    #[instrument(skip(self, query, body), fields(env = env.unwrap_or("<default>")))]
    pub(crate) async fn request(
        &self,
        env: Option<&str>,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
        context: &str,
    ) -> N8nResult<Value> {
        let transport = self.transports.transport(env)?;
        let url = transport.url(path);
        debug!("{} {}", method, url);

        let mut builder = transport.http().request(method, &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let transport_err = |source| N8nError::Transport {
            context: context.to_string(),
            source,
        };

        let response = builder.send().await.map_err(transport_err)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_err)?;

        if !status.is_success() {
            let message = extract_message(&text);
            error!("n8n returned {} for {}: {}", status.as_u16(), path, message);
            return Err(classify(context, status.as_u16(), &message));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| N8nError::Decode {
            context: context.to_string(),
            source,
        })
    }

    /// [`Self::request`] followed by typed decoding
    pub(crate) async fn request_as<T: DeserializeOwned>(
        &self,
        env: Option<&str>,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
        context: &str,
    ) -> N8nResult<T> {
        let value = self.request(env, method, path, query, body, context).await?;
        decode(value, context)
    }

    /// Walk `nextCursor` until exhausted (bounded by [`MAX_PAGES`])
    pub(crate) async fn collect_pages<T: DeserializeOwned>(
        &self,
        env: Option<&str>,
        path: &str,
        context: &str,
    ) -> N8nResult<Vec<T>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut query: Query = vec![("limit", "100".to_string())];
            if let Some(c) = cursor.take() {
                query.push(("cursor", c));
            }
            let page: Page<T> = self
                .request_as(env, Method::GET, path, &query, None, context)
                .await?;
            items.extend(page.data);
            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(items)
    }
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value, context: &str) -> N8nResult<T> {
    serde_json::from_value(value).map_err(|source| N8nError::Decode {
        context: context.to_string(),
        source,
    })
}

pub(crate) fn encode<T: serde::Serialize>(body: &T, context: &str) -> N8nResult<Value> {
    serde_json::to_value(body).map_err(|source| N8nError::Decode {
        context: context.to_string(),
        source,
    })
}

/// Reject blank path ids before they reach the URL
pub(crate) fn require_id<'a>(what: &str, id: &'a str) -> N8nResult<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(N8nError::validation(format!("{} id is required", what)));
    }
    Ok(id)
}
