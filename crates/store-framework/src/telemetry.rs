//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber used by binaries
//! built on this framework.
//!
//! ## Configuration
//!
//! Compact format without the crate/module prefix (`with_target(false)`); the
//! structured fields (`table`, `id`, `count`) carry the context instead. Levels
//! come from `RUST_LOG` and default to `info`.
//!
//! ## What Gets Traced
//!
//! - **Store**: startup, shutdown, every write with its table and id
//! - **Services**: each operation as a span carrying the table name
//! - **Hooks**: mount, reconfigure, disposal, snapshots and failed loads
//!
//! ```bash
//! RUST_LOG=info cargo run       # one line per write and lifecycle event
//! RUST_LOG=debug cargo run      # plus selects, change broadcasts and snapshots
//! RUST_LOG=store_framework=debug,site_sync=info cargo run
//! ```
//!
//! With `RUST_LOG=info` a create followed by a live snapshot reads:
//!
//! ```text
//! INFO create: Inserted table="projects" id="5f0c..." size=1
//! INFO create: Created id=5f0c...
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Later calls are no-ops.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
