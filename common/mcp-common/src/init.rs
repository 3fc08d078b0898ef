//! Tracing initialisation for stdio MCP servers
//!
//! stdout carries the MCP protocol, so every log line goes to stderr.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for an MCP server
///
/// - Writes to stderr without ANSI colors
/// - `RUST_LOG` is honoured on top of the default directive
/// - Default directive is `<crate_name>=info`, or `<crate_name>=debug` when
///   `DEBUG` is set to `1`/`true`
/// - `LOG_FORMAT=json` switches to structured JSON output
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("n8n_mcp")?;
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let level = default_level(std::env::var("DEBUG").ok().as_deref());
    let directive = format!("{}={}", crate_name, level);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

/// Map the `DEBUG` environment variable to a level name
fn default_level(debug: Option<&str>) -> &'static str {
    match debug.map(str::trim) {
        Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => "debug",
        _ => "info",
    }
}
