//! Prompt template parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FillPromptParams {
    #[schemars(description = "Template name (see prompts/list)")]
    pub name: String,
    #[schemars(description = "Template variables by name")]
    pub arguments: Option<Map<String, Value>>,
}
