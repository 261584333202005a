//! A registry of SpaceX Dragon rockets and the missions they fly.
//!
//! The entrypoint is [`registry::DragonRockets`], which runs against any [`db`] backend. The
//! [`db::memory`] backend keeps everything in process memory:
//!
//! ```
//! use dragon_rockets::{
//!     db::memory::{MissionStore, RocketStore},
//!     registry::DragonRockets,
//! };
//!
//! # async_std::task::block_on(async {
//! let registry = DragonRockets::new(RocketStore::create(), MissionStore::create());
//! registry.add_rocket("Dragon 1").await?;
//! registry.add_mission("Luna1").await?;
//! registry.assign_rocket_to_mission("Dragon 1", "Luna1").await?;
//! print!("{}", registry.summary().await?);
//! # Ok::<_, dragon_rockets::registry::Error>(())
//! # }).unwrap();
//! ```

use tracing_subscriber::EnvFilter;

pub mod db;
pub mod mission;
pub mod registry;
pub mod rocket;
pub mod script;
pub mod summary;

/// Install a global logger which writes to stderr.
///
/// The log level is controlled by `RUST_LOG` and defaults to `info`. Calling this more than once is
/// harmless; only the first call installs a logger.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
