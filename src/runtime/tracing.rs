//! # Observability & Tracing
//!
//! Every resolver emits `tracing` events, so the path an action takes through the chain
//! shows up in the logs without any extra wiring.
//!
//! ## What Gets Traced
//!
//! - **Resolution**: a span per `action_for` call, with the type key (and record id for
//!   resource actions), plus whether a custom or default handler was picked
//! - **Submission**: the URL and method of every request leaving the adapter
//! - **HTTP**: status and body size of each response received by [`HttpTransport`](crate::transport::HttpTransport)
//!
//! Errors are returned to the caller, never logged here.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Resolution decisions and URLs
//! RUST_LOG=model_actions=debug cargo run --example publish
//!
//! # Only the demo's own output
//! RUST_LOG=info cargo run --example publish
//! ```
//!
//! With `RUST_LOG=debug` a default resource action looks like:
//!
//! ```text
//! DEBUG action_for{action_name="publish" type_key="post" id=42}: Default resource handler
//! DEBUG action_for{action_name="publish" type_key="post" resource=true}: Default adapter handler
//! DEBUG Submitting action url="/posts/42/publish" method=POST
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
