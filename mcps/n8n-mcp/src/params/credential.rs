//! Credential-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateCredentialParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Credential name")]
    pub name: String,
    #[schemars(description = "Credential type, e.g. httpBasicAuth (see get_credential_schema)")]
    #[serde(rename = "type")]
    pub credential_type: String,
    #[schemars(description = "Credential data matching the type's schema")]
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CredentialIdParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Credential ID")]
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CredentialSchemaParams {
    #[schemars(description = "Environment name (defaults to the configured defaultEnv)")]
    pub instance: Option<String>,
    #[schemars(description = "Credential type name")]
    pub credential_type: String,
}
