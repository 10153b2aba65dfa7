//! Test utilities for AGCM
//!
//! Helpers shared by unit and integration tests:
//! - [`TestEnvironment`]: a temp home directory with two registered projects
//! - [`MarkdownFixture`]: agent, command, and skill sources with frontmatter
//! - [`init_test_logging`]: a test-writer `tracing` subscriber, installed once
//!
//! # Example
//!
//! ```rust,no_run
//! use agcm::test_utils::{MarkdownFixture, TestEnvironment};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let env = TestEnvironment::new()?;
//! let agent = MarkdownFixture::agent("reviewer").write_to(&env.source_dir)?;
//! let orchestrator = env.orchestrator().await?;
//! # let _ = (agent, orchestrator);
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::MarkdownFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=agcm=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
