//! Habitable-zone calculator core
//!
//! Computes habitable-zone distance bands for a fixed catalog of world types
//! from arrival-star scans, with optional body-name enrichment from EDSM.
//! Designed to be embedded in a game-companion host that owns lifecycle,
//! event dispatch, and the widget tree.
//!
//! ## Architecture
//!
//! ```text
//! HabZonePlugin  (host.rs)   ← HostEventSink: journal + commander callbacks
//!   └── HabZoneService  (service.rs)  ← system tracking, fetch channel
//!         ├── zones.rs    ← black-body distance bands
//!         ├── journal.rs  ← bounded tail scans (best-effort recovery)
//!         └── edsm.rs     ← worker-thread bodies lookup
//! ```
//!
//! `HabZonePlugin` translates host events into state changes and calls a
//! `ZoneObserver` the embedder implements; all display mutation happens on
//! the host's main context. The `habzone-monitor` binary (feature `harness`)
//! plays the host role for development by tailing the journal directory.

pub mod edsm;
pub mod format;
pub mod host;
pub mod journal;
pub mod protocol;
pub mod service;
pub mod settings;
pub mod types;
pub mod zones;

// Convenience re-exports
pub use edsm::{EnrichmentResult, FetchError, FetchOutcome, RowEnrichment};
pub use host::{HabZonePlugin, HostEventSink, ZoneObserver, STARTUP_RESCAN_DELAYS_MS};
pub use journal::JournalScanner;
pub use protocol::{CommanderStatus, JournalEvent};
pub use service::HabZoneService;
pub use settings::{DisplaySettings, SettingsStore, VisibilityMask};
pub use types::{StarObservation, WorldType, ZoneBand, ZoneResult, LS_METERS, WORLDS, WORLD_COUNT};
pub use zones::{far_distance_ls, habitable_zones, ZoneError};
