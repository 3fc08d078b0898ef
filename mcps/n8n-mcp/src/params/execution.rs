//! Execution-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListExecutionsParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Only executions of this workflow")]
    pub workflow_id: Option<String>,
    #[schemars(description = "Status filter (success, error, waiting)")]
    pub status: Option<String>,
    #[schemars(description = "Include full run data (large)")]
    pub include_data: Option<bool>,
    #[schemars(description = "Maximum number of executions to return")]
    pub limit: Option<u32>,
    #[schemars(description = "Pagination cursor from a previous nextCursor")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetExecutionParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Execution ID")]
    pub id: String,
    #[schemars(description = "Include full run data (default: false)")]
    pub include_data: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionIdParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Execution ID")]
    pub id: String,
}
