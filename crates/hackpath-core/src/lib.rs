//! Hackpath-Core: firmware path resolution for 3DS custom firmware setup.
//!
//! Given a console's system firmware, model and whether its game
//! cartridge was ever updated, this crate works out the ordered steps
//! needed to install boot9strap, tracks progress through them, and
//! collects the files each step needs into a single download plan.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Version**: Firmware identity parsing and comparison
//! - **Ranges**: Static per-generation firmware range tables
//! - **Resolver**: Range and branch dispatch into step lists
//! - **Path**: Resolved path with its step cursor
//! - **Process**: Step to process lookup (catalog, mock)
//! - **Resource**: Download descriptors and aggregation
//! - **Worker**: Download worker contract
//! - **Events**: Observer pattern for UI decoupling
//! - **Session**: Caller-owned resolver context and TOML configuration
//!
//! # Example
//!
//! ```no_run
//! use hackpath_core::session::{PathSession, SessionConfig};
//!
//! let config = SessionConfig {
//!     firmware: Some("11.3.0-36U".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut session = PathSession::new(config);
//! session.resolve().expect("invalid firmware");
//! println!("{:?}", session.path().expect("no path").steps());
//! ```

pub mod events;
pub mod path;
pub mod process;
pub mod ranges;
pub mod resolver;
pub mod resource;
pub mod session;
pub mod step;
pub mod urls;
pub mod version;
pub mod worker;

// Re-exports for convenience
pub use events::{NullObserver, PathEvent, PathObserver, TracingObserver};
pub use path::HackingPath;
pub use process::{CatalogRegistry, HackingProcess, MockRegistry, ProcessRegistry};
pub use ranges::{Branch, RangeEntry, VersionRange};
pub use resolver::{Resolution, is_browser_usable, resolve};
pub use resource::{HackingResource, aggregate_resources};
pub use session::{PathSession, SessionConfig, SessionError};
pub use step::HackingStep;
pub use urls::{UrlKey, UrlTable};
pub use version::{
    ConsoleModel, ConsoleRegion, DeviceGeneration, FirmwareVersion, LATEST_HACKABLE, VersionError,
};
pub use worker::{ResourceWorker, WorkerError, WorkerFactory, plan_workers};
