//! Credential operations
//!
//! The platform never returns secret values, so responses are passed through
//! as-is.

use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::instrument;

use super::{require_id, N8nApi};
use crate::error::{N8nError, N8nResult};

impl N8nApi {
    #[instrument(skip(self, data))]
    pub async fn create_credential(
        &self,
        env: Option<&str>,
        name: &str,
        credential_type: &str,
        data: Map<String, Value>,
    ) -> N8nResult<Value> {
        if name.trim().is_empty() || credential_type.trim().is_empty() {
            return Err(N8nError::validation("credential name and type are required"));
        }
        self.request(
            env,
            Method::POST,
            "/credentials",
            &[],
            Some(json!({ "name": name.trim(), "type": credential_type.trim(), "data": data })),
            "Failed to create credential",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_credential(&self, env: Option<&str>, id: &str) -> N8nResult<Value> {
        let id = require_id("credential", id)?;
        let context = format!("Failed to delete credential {}", id);
        self.request(env, Method::DELETE, &format!("/credentials/{}", id), &[], None, &context)
            .await
    }

    /// JSON schema of the `data` object for a credential type
    #[instrument(skip(self))]
    pub async fn get_credential_schema(
        &self,
        env: Option<&str>,
        credential_type: &str,
    ) -> N8nResult<Value> {
        let credential_type = require_id("credential type", credential_type)?;
        let context = format!("Failed to get schema for credential type {}", credential_type);
        self.request(
            env,
            Method::GET,
            &format!("/credentials/schema/{}", credential_type),
            &[],
            None,
            &context,
        )
        .await
    }
}
