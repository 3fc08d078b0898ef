//! Workflow operations

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use super::types::{Execution, Page, Tag, Workflow, WorkflowSummary};
use super::{decode, encode, require_id, N8nApi, Query};
use crate::error::{N8nError, N8nResult};
use crate::translate::{prepare_for_activation, translate, ActivationFixups, WorkflowInput};
use crate::wait::poll_until;

/// Filters for `GET /workflows`
#[derive(Debug, Clone, Default)]
pub struct WorkflowQuery {
    pub active: Option<bool>,
    /// Comma-separated tag names
    pub tags: Option<String>,
    pub name: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl WorkflowQuery {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(active) = self.active {
            query.push(("active", active.to_string()));
        }
        if let Some(tags) = &self.tags {
            query.push(("tags", tags.clone()));
        }
        if let Some(name) = &self.name {
            query.push(("name", name.clone()));
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

/// Result of activating a workflow
#[derive(Debug, Clone, Serialize)]
pub struct ActivationOutcome {
    pub workflow: Workflow,
    /// What had to change before the platform would accept activation
    pub fixups: ActivationFixups,
}

/// Result of triggering a workflow run
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    #[serde(rename = "executionId", skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    /// Raw response of the execute call
    pub response: Value,
    /// Settled execution, when waiting was requested and an id was returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<Execution>,
}

impl N8nApi {
    /// List workflows as summaries; nodes and connections are dropped
    #[instrument(skip(self))]
    pub async fn list_workflows(
        &self,
        env: Option<&str>,
        filter: &WorkflowQuery,
    ) -> N8nResult<Page<WorkflowSummary>> {
        let page: Page<Workflow> = self
            .request_as(
                env,
                Method::GET,
                "/workflows",
                &filter.to_query(),
                None,
                "Failed to list workflows",
            )
            .await?;

        Ok(Page {
            data: page.data.iter().map(Workflow::summary).collect(),
            next_cursor: page.next_cursor,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_workflow(&self, env: Option<&str>, id: &str) -> N8nResult<Workflow> {
        let id = require_id("workflow", id)?;
        let context = format!("Failed to get workflow {}", id);
        self.request_as(env, Method::GET, &format!("/workflows/{}", id), &[], None, &context)
            .await
    }

    /// Translate and create a workflow, then apply tags and activation
    #[instrument(skip(self, input), fields(name = ?input.name))]
    pub async fn create_workflow(
        &self,
        env: Option<&str>,
        input: &WorkflowInput,
    ) -> N8nResult<Workflow> {
        let spec = translate(input)?;
        let context = "Failed to create workflow";
        let created: Workflow = self
            .request_as(
                env,
                Method::POST,
                "/workflows",
                &[],
                Some(encode(&spec, context)?),
                context,
            )
            .await?;

        info!("Created workflow {} ({})", created.id, created.name);
        self.apply_follow_ups(env, created, input).await
    }

    /// Translate and fully replace an existing workflow
    #[instrument(skip(self, input))]
    pub async fn update_workflow(
        &self,
        env: Option<&str>,
        id: &str,
        input: &WorkflowInput,
    ) -> N8nResult<Workflow> {
        let id = require_id("workflow", id)?;
        let spec = translate(input)?;
        let context = format!("Failed to update workflow {}", id);
        let updated: Workflow = self
            .request_as(
                env,
                Method::PUT,
                &format!("/workflows/{}", id),
                &[],
                Some(encode(&spec, &context)?),
                &context,
            )
            .await?;

        self.apply_follow_ups(env, updated, input).await
    }

    /// Tags and `active` are not part of the workflow body; set them separately
    ///
    /// Failures here carry the saved workflow's id so the caller can retry
    /// the step instead of the save.
    async fn apply_follow_ups(
        &self,
        env: Option<&str>,
        mut workflow: Workflow,
        input: &WorkflowInput,
    ) -> N8nResult<Workflow> {
        let id = workflow.id.clone();
        let follow_up = |step: &'static str| {
            let workflow_id = id.clone();
            move |e: N8nError| {
                warn!("Workflow {} saved but {} failed: {}", workflow_id, step, e);
                N8nError::FollowUp {
                    workflow_id,
                    step,
                    source: Box::new(e),
                }
            }
        };

        if let Some(tags) = input.tags.as_deref() {
            let ids = tag_ids(tags).map_err(follow_up("tagging"))?;
            if !ids.is_empty() {
                workflow.tags = self
                    .update_workflow_tags(env, &id, &ids)
                    .await
                    .map_err(follow_up("tagging"))?;
            }
        }

        match input.active {
            Some(true) if !workflow.active => {
                let tags = std::mem::take(&mut workflow.tags);
                let mut activated = self
                    .activate_workflow(env, &id)
                    .await
                    .map_err(follow_up("activation"))?
                    .workflow;
                if activated.tags.is_empty() {
                    activated.tags = tags;
                }
                Ok(activated)
            }
            Some(false) if workflow.active => self
                .deactivate_workflow(env, &id)
                .await
                .map_err(follow_up("deactivation")),
            _ => Ok(workflow),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_workflow(&self, env: Option<&str>, id: &str) -> N8nResult<Value> {
        let id = require_id("workflow", id)?;
        let context = format!("Failed to delete workflow {}", id);
        self.request(env, Method::DELETE, &format!("/workflows/{}", id), &[], None, &context)
            .await
    }

    /// Activate a workflow, fixing it up first if the platform would refuse it
    ///
    /// Fetches the workflow, injects a schedule trigger when it has none and
    /// normalises Set nodes. If anything changed the full workflow is PUT
    /// back before the activate call.
    #[instrument(skip(self))]
    pub async fn activate_workflow(
        &self,
        env: Option<&str>,
        id: &str,
    ) -> N8nResult<ActivationOutcome> {
        let id = require_id("workflow", id)?;
        let mut spec = self.get_workflow(env, id).await?.into_spec();

        let fixups = prepare_for_activation(&mut spec, chrono::Utc::now().timestamp_millis());
        if fixups.changed() {
            info!(
                "Re-submitting workflow {} before activation (trigger added: {:?}, set nodes: {})",
                id,
                fixups.trigger_added,
                fixups.set_nodes_normalized.len()
            );
            let context = format!("Failed to update workflow {} before activation", id);
            self.request(
                env,
                Method::PUT,
                &format!("/workflows/{}", id),
                &[],
                Some(encode(&spec, &context)?),
                &context,
            )
            .await?;
        }

        let context = format!("Failed to activate workflow {}", id);
        let workflow = self
            .request_as(
                env,
                Method::POST,
                &format!("/workflows/{}/activate", id),
                &[],
                None,
                &context,
            )
            .await?;

        Ok(ActivationOutcome { workflow, fixups })
    }

    #[instrument(skip(self))]
    pub async fn deactivate_workflow(&self, env: Option<&str>, id: &str) -> N8nResult<Workflow> {
        let id = require_id("workflow", id)?;
        let context = format!("Failed to deactivate workflow {}", id);
        self.request_as(
            env,
            Method::POST,
            &format!("/workflows/{}/deactivate", id),
            &[],
            None,
            &context,
        )
        .await
    }

    /// Trigger a run; with `wait` set, poll the execution until it settles
    #[instrument(skip(self, data))]
    pub async fn execute_workflow(
        &self,
        env: Option<&str>,
        id: &str,
        data: Option<Value>,
        wait: bool,
    ) -> N8nResult<ExecutionOutcome> {
        let id = require_id("workflow", id)?;
        let context = format!("Failed to execute workflow {}", id);
        let body = data.map(|d| json!({ "data": d }));
        let response = self
            .request(
                env,
                Method::POST,
                &format!("/workflows/{}/execute", id),
                &[],
                body,
                &context,
            )
            .await?;

        let execution_id = execution_id_of(&response);
        let execution = match (&execution_id, wait) {
            (Some(exec_id), true) => {
                let what = format!("execution {}", exec_id);
                let settled = poll_until(
                    self.poll_policy(),
                    &what,
                    || self.get_execution(env, exec_id, true),
                    Execution::is_settled,
                )
                .await?;
                Some(settled)
            }
            _ => None,
        };

        Ok(ExecutionOutcome {
            execution_id,
            response,
            execution,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_workflow_tags(&self, env: Option<&str>, id: &str) -> N8nResult<Vec<Tag>> {
        let id = require_id("workflow", id)?;
        let context = format!("Failed to get tags of workflow {}", id);
        self.request_as(
            env,
            Method::GET,
            &format!("/workflows/{}/tags", id),
            &[],
            None,
            &context,
        )
        .await
    }

    /// Replace the tag set of a workflow
    #[instrument(skip(self))]
    pub async fn update_workflow_tags(
        &self,
        env: Option<&str>,
        id: &str,
        tag_ids: &[String],
    ) -> N8nResult<Vec<Tag>> {
        let id = require_id("workflow", id)?;
        let context = format!("Failed to update tags of workflow {}", id);
        let body: Vec<Value> = tag_ids.iter().map(|t| json!({ "id": t })).collect();
        let value = self
            .request(
                env,
                Method::PUT,
                &format!("/workflows/{}/tags", id),
                &[],
                Some(Value::Array(body)),
                &context,
            )
            .await?;
        decode(value, &context)
    }
}

/// Tag references may be plain ids or `{id, ...}` objects
fn tag_ids(tags: &[Value]) -> N8nResult<Vec<String>> {
    tags.iter()
        .map(|tag| match tag {
            Value::String(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Object(obj) => match obj.get("id") {
                Some(Value::String(id)) => Ok(id.clone()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                _ => Err(N8nError::validation("tag objects must carry an 'id'")),
            },
            other => Err(N8nError::validation(format!("invalid tag reference: {}", other))),
        })
        .collect()
}

/// The execute endpoint has answered with each of these shapes
fn execution_id_of(response: &Value) -> Option<String> {
    let candidates = [
        response.get("executionId"),
        response.get("id"),
        response.get("data").and_then(|d| d.get("executionId")),
    ];
    candidates.into_iter().flatten().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
