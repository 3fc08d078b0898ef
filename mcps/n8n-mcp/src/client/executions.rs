//! Execution operations

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use super::types::{Execution, ExecutionStats, Page};
use super::{require_id, N8nApi, Query};
use crate::error::N8nResult;

/// Number of recent executions summarised by [`N8nApi::execution_stats`]
pub const STATS_WINDOW: u32 = 100;

/// Filters for `GET /executions`
#[derive(Debug, Clone, Default)]
pub struct ExecutionQuery {
    pub workflow_id: Option<String>,
    /// `success`, `error` or `waiting`
    pub status: Option<String>,
    pub include_data: Option<bool>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ExecutionQuery {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(id) = &self.workflow_id {
            query.push(("workflowId", id.clone()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(include) = self.include_data {
            query.push(("includeData", include.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            query.push(("cursor", cursor.clone()));
        }
        query
    }
}

impl N8nApi {
    #[instrument(skip(self))]
    pub async fn list_executions(
        &self,
        env: Option<&str>,
        filter: &ExecutionQuery,
    ) -> N8nResult<Page<Execution>> {
        self.request_as(
            env,
            Method::GET,
            "/executions",
            &filter.to_query(),
            None,
            "Failed to list executions",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_execution(
        &self,
        env: Option<&str>,
        id: &str,
        include_data: bool,
    ) -> N8nResult<Execution> {
        let id = require_id("execution", id)?;
        let context = format!("Failed to get execution {}", id);
        let query = vec![("includeData", include_data.to_string())];
        self.request_as(
            env,
            Method::GET,
            &format!("/executions/{}", id),
            &query,
            None,
            &context,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_execution(&self, env: Option<&str>, id: &str) -> N8nResult<Value> {
        let id = require_id("execution", id)?;
        let context = format!("Failed to delete execution {}", id);
        self.request(env, Method::DELETE, &format!("/executions/{}", id), &[], None, &context)
            .await
    }

    /// Status counts over the most recent [`STATS_WINDOW`] executions
    #[instrument(skip(self))]
    pub async fn execution_stats(&self, env: Option<&str>) -> N8nResult<ExecutionStats> {
        let filter = ExecutionQuery {
            limit: Some(STATS_WINDOW),
            ..Default::default()
        };
        let page = self.list_executions(env, &filter).await?;
        Ok(ExecutionStats::from_executions(&page.data))
    }
}
