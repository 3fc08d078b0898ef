//! Tag-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListTagsParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Maximum number of tags to return")]
    pub limit: Option<u32>,
    #[schemars(description = "Pagination cursor from a previous nextCursor")]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TagIdParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Tag ID")]
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTagParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Tag name")]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTagParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Tag ID")]
    pub id: String,
    #[schemars(description = "New tag name; suffixed if another tag already uses it")]
    pub name: String,
}
