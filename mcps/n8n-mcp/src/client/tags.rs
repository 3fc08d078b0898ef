//! Tag operations
//!
//! Renames run a best-effort uniqueness check first: every tag is listed and,
//! if another tag already carries the requested name, a short random suffix
//! is appended. The check and the write are not atomic, so two concurrent
//! renames can still collide; the platform's own constraint is the backstop.

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{instrument, warn};

use super::types::{Page, Tag};
use super::{require_id, N8nApi, Query};
use crate::error::{N8nError, N8nResult};

impl N8nApi {
    #[instrument(skip(self))]
    pub async fn create_tag(&self, env: Option<&str>, name: &str) -> N8nResult<Tag> {
        let name = require_name(name)?;
        self.request_as(
            env,
            Method::POST,
            "/tags",
            &[],
            Some(json!({ "name": name })),
            "Failed to create tag",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_tags(
        &self,
        env: Option<&str>,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> N8nResult<Page<Tag>> {
        let mut query = Query::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }
        self.request_as(env, Method::GET, "/tags", &query, None, "Failed to list tags")
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_tag(&self, env: Option<&str>, id: &str) -> N8nResult<Tag> {
        let id = require_id("tag", id)?;
        let context = format!("Failed to get tag {}", id);
        self.request_as(env, Method::GET, &format!("/tags/{}", id), &[], None, &context)
            .await
    }

    /// Rename a tag, de-duplicating the name against existing tags
    #[instrument(skip(self))]
    pub async fn update_tag(&self, env: Option<&str>, id: &str, name: &str) -> N8nResult<Tag> {
        let id = require_id("tag", id)?;
        let requested = require_name(name)?;

        let name = match self.collect_pages::<Tag>(env, "/tags", "Failed to list tags").await {
            Ok(existing) => dedupe_name(&existing, id, requested),
            Err(e) => {
                warn!("Tag uniqueness check skipped: {}", e);
                requested.to_string()
            }
        };
        if name != requested {
            warn!("Tag name '{}' already in use, renaming to '{}'", requested, name);
        }

        let context = format!("Failed to update tag {}", id);
        self.request_as(
            env,
            Method::PUT,
            &format!("/tags/{}", id),
            &[],
            Some(json!({ "name": name })),
            &context,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_tag(&self, env: Option<&str>, id: &str) -> N8nResult<Value> {
        let id = require_id("tag", id)?;
        let context = format!("Failed to delete tag {}", id);
        self.request(env, Method::DELETE, &format!("/tags/{}", id), &[], None, &context)
            .await
    }
}

fn require_name(name: &str) -> N8nResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(N8nError::validation("tag name is required"));
    }
    Ok(name)
}

/// `requested` if no other tag uses it, otherwise `requested-<suffix>`
fn dedupe_name(existing: &[Tag], own_id: &str, requested: &str) -> String {
    let taken = existing.iter().any(|t| t.id != own_id && t.name == requested);
    if !taken {
        return requested.to_string();
    }
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", requested, &suffix[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: id.into(),
            name: name.into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_dedupe_keeps_free_name() {
        let existing = vec![tag("1", "ops")];
        assert_eq!(dedupe_name(&existing, "2", "prod"), "prod");
    }

    #[test]
    fn test_dedupe_ignores_own_tag() {
        let existing = vec![tag("1", "ops")];
        assert_eq!(dedupe_name(&existing, "1", "ops"), "ops");
    }

    #[test]
    fn test_dedupe_suffixes_collision() {
        let existing = vec![tag("1", "ops"), tag("2", "prod")];
        let name = dedupe_name(&existing, "2", "ops");
        assert!(name.starts_with("ops-"));
        assert_eq!(name.len(), "ops-".len() + 6);
    }

    #[test]
    fn test_require_name() {
        assert!(require_name("  ").is_err());
        assert_eq!(require_name(" ops ").unwrap(), "ops");
    }
}
