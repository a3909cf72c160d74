//! habzone-monitor binary
//!
//! Plays the host role for development: tails the newest journal file,
//! dispatches parsed entries into the plugin, schedules the staggered
//! startup rescans, and renders zone rows as text.
//!
//! ## Configuration (env / TOML via `config` crate)
//!
//! | Key                  | Default       | Description                         |
//! |----------------------|---------------|-------------------------------------|
//! | `HABZONE_JOURNALDIR` | *(platform)*  | Journal directory override          |
//! | `habzone`            | `0`           | Visibility + lookup bitmask         |
//! | `habzone_abbrev`     | `"0"`         | Abbreviate large distances (`"1"`)  |
//! | `HABZONE_POLL_MS`    | `1000`        | Journal tail poll interval          |

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use tracing::{debug, info};

use habzone::format::{exact_distance, format_distance};
use habzone::settings::{ABBREV_KEY, VISIBILITY_KEY};
use habzone::{
    DisplaySettings, EnrichmentResult, HabZonePlugin, HabZoneService, HostEventSink,
    JournalEvent, JournalScanner, SettingsStore, ZoneObserver, ZoneResult,
    STARTUP_RESCAN_DELAYS_MS, WORLDS, WORLD_COUNT,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "habzone-monitor", about = "Habitable-zone journal monitor", version)]
struct Args {
    /// Journal directory (defaults to the game's save location)
    #[arg(long, env = "HABZONE_JOURNALDIR")]
    journal_dir: Option<PathBuf>,

    /// Settings file (TOML), looked up as ./habzone.toml when omitted
    #[arg(long, env = "HABZONE_CONFIG")]
    config: Option<PathBuf>,

    /// Visibility bitmask override (one bit per world row)
    #[arg(long)]
    worlds: Option<u16>,

    /// Enable EDSM body lookups
    #[arg(long)]
    edsm: bool,

    /// Abbreviate large distances (k/M)
    #[arg(long)]
    abbrev: bool,

    /// Journal tail poll interval in milliseconds
    #[arg(long, env = "HABZONE_POLL_MS", default_value_t = 1000)]
    poll_ms: u64,
}

// ---------------------------------------------------------------------------
// Settings store (the host's key-value store, in memory here)
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryStore {
    ints: HashMap<String, i64>,
    strs: HashMap<String, String>,
}

impl SettingsStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.ints.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.ints.insert(key.to_owned(), value);
    }

    fn get_str(&self, key: &str) -> Option<String> {
        self.strs.get(key).cloned()
    }

    fn set_str(&mut self, key: &str, value: &str) {
        self.strs.insert(key.to_owned(), value.to_owned());
    }
}

// ---------------------------------------------------------------------------
// Terminal display
// ---------------------------------------------------------------------------

enum RowState {
    Empty,
    Error,
    Zones([ZoneResult; WORLD_COUNT]),
}

enum LookupState {
    None,
    Failed,
    Data(EnrichmentResult),
}

struct TermDisplay {
    settings: DisplaySettings,
    rows: RowState,
    lookup: LookupState,
}

impl TermDisplay {
    fn new() -> Self {
        Self {
            settings: DisplaySettings::default(),
            rows: RowState::Empty,
            lookup: LookupState::None,
        }
    }

    fn render(&self) {
        if let LookupState::Data(res) = &self.lookup {
            println!("── {} ──", res.system_name);
        } else {
            println!("──────────");
        }

        for world in self.settings.mask.visible_worlds() {
            let name = WORLDS[world].name;
            let distances = match &self.rows {
                RowState::Empty => String::new(),
                RowState::Error => "?".to_owned(),
                RowState::Zones(rows) => match rows[world].band {
                    None => "×".to_owned(),
                    Some(band) => {
                        let near = format_distance(band.near_ls, self.settings.abbreviate);
                        let far = format_distance(band.far_ls, self.settings.abbreviate);
                        if self.settings.abbreviate {
                            debug!(
                                "{name}: {} / {}",
                                exact_distance(band.near_ls),
                                exact_distance(band.far_ls)
                            );
                        }
                        format!("{near} - {far} ls")
                    }
                },
            };

            let bodies = match &self.lookup {
                LookupState::None => String::new(),
                LookupState::Failed => "  ?".to_owned(),
                LookupState::Data(res) => {
                    let row = res.row(&WORLDS[world]);
                    if row.text.is_empty() {
                        String::new()
                    } else {
                        format!("  {}  <{}>", row.text, row.url)
                    }
                }
            };

            println!("  {name:<14}{distances:>18}{bodies}");
        }
    }
}

impl ZoneObserver for TermDisplay {
    fn zone_results(&mut self, rows: &[ZoneResult; WORLD_COUNT]) {
        self.rows = RowState::Zones(*rows);
        self.render();
    }

    fn zone_error(&mut self) {
        self.rows = RowState::Error;
        self.render();
    }

    fn cleared(&mut self) {
        self.rows = RowState::Empty;
        self.lookup = LookupState::None;
    }

    fn enrichment_result(&mut self, result: &EnrichmentResult) {
        self.lookup = LookupState::Data(result.clone());
        self.render();
    }

    fn enrichment_failed(&mut self) {
        self.lookup = LookupState::Failed;
        self.render();
    }

    fn visibility_changed(&mut self, settings: &DisplaySettings) {
        self.settings = *settings;
    }
}

// ---------------------------------------------------------------------------
// Journal tailing
// ---------------------------------------------------------------------------

struct JournalTail {
    file: Option<PathBuf>,
    offset: u64,
}

impl JournalTail {
    /// Start at the end of the current journal — history is covered by the
    /// startup rescans, the tail only reports new entries.
    fn new(scanner: &JournalScanner) -> Self {
        let file = scanner.latest_journal();
        let offset = file
            .as_deref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);
        Self { file, offset }
    }

    fn poll(&mut self, scanner: &JournalScanner) -> Vec<String> {
        let latest = scanner.latest_journal();
        if latest != self.file {
            // Rotated to a new journal; consume it from the beginning.
            self.file = latest;
            self.offset = 0;
        }
        let Some(path) = self.file.as_deref() else {
            return Vec::new();
        };
        read_new_lines(path, &mut self.offset)
    }
}

/// Complete new lines past `offset`; a trailing partial line stays buffered
/// for the next poll.
fn read_new_lines(path: &Path, offset: &mut u64) -> Vec<String> {
    let Ok(mut file) = std::fs::File::open(path) else {
        return Vec::new();
    };
    let len = file.metadata().map(|m| m.len()).unwrap_or(0);
    if len < *offset {
        // Truncated underneath us; start over.
        *offset = 0;
    }
    if len == *offset || file.seek(SeekFrom::Start(*offset)).is_err() {
        return Vec::new();
    }

    let mut buf = Vec::new();
    if file.read_to_end(&mut buf).is_err() {
        return Vec::new();
    }
    let Some(last_newline) = buf.iter().rposition(|b| *b == b'\n') else {
        return Vec::new();
    };
    *offset += (last_newline + 1) as u64;

    String::from_utf8_lossy(&buf[..=last_newline])
        .lines()
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("habzone=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Layered settings: optional TOML file, then HABZONE_* env vars.
    let mut builder = config::Config::builder();
    builder = match &args.config {
        Some(path) => builder.add_source(config::File::from(path.clone()).required(false)),
        None => builder.add_source(config::File::with_name("habzone").required(false)),
    };
    builder = builder.add_source(config::Environment::with_prefix("HABZONE"));
    let layered = builder.build().context("settings sources unreadable")?;

    // Seed the host-style key-value store from the layered sources.
    let mut store = MemoryStore::default();
    if let Ok(raw) = layered.get_int(VISIBILITY_KEY) {
        store.set_int(VISIBILITY_KEY, raw);
    }
    if let Ok(flag) = layered.get_string(ABBREV_KEY) {
        store.set_str(ABBREV_KEY, &flag);
    }

    let mut settings = DisplaySettings::load(&store);
    if let Some(mask) = args.worlds {
        let (mask, _) = DisplaySettings::decode_visibility(mask);
        settings.mask = mask;
    }
    settings.edsm_enabled |= args.edsm;
    settings.abbreviate |= args.abbrev;

    let journal_dir = args
        .journal_dir
        .clone()
        .or_else(|| layered.get_string("journaldir").ok().map(PathBuf::from));
    let scanner = JournalScanner::new(journal_dir);
    let tail_scanner = scanner.clone();

    info!(
        "starting habzone-monitor (journal dir: {}, edsm: {}, mask: {:#06x})",
        scanner.dir().display(),
        settings.edsm_enabled,
        settings.mask.bits(),
    );

    let service = HabZoneService::new(scanner, settings);
    let plugin = Arc::new(Mutex::new(HabZonePlugin::new(service, TermDisplay::new())));

    // -----------------------------------------------------------------------
    // Staggered startup rescans (journal restore + optional EDSM refresh)
    // -----------------------------------------------------------------------

    for delay_ms in STARTUP_RESCAN_DELAYS_MS {
        let plugin = plugin.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            plugin.lock().rescan();
        });
    }

    // -----------------------------------------------------------------------
    // Tail loop
    // -----------------------------------------------------------------------

    let loop_plugin = plugin.clone();
    let poll_ms = args.poll_ms.max(100);
    let tail_handle = tokio::spawn(async move {
        let mut tail = JournalTail::new(&tail_scanner);
        let mut timer = tokio::time::interval(Duration::from_millis(poll_ms));
        loop {
            timer.tick().await;

            let lines = tail.poll(&tail_scanner);
            let mut plugin = loop_plugin.lock();
            for line in &lines {
                if let Some(event) = JournalEvent::parse_line(line) {
                    plugin.journal_event(&event);
                }
            }
            // Deliver any finished enrichment fetches on this same context.
            plugin.pump();
        }
    });

    // -----------------------------------------------------------------------
    // Wait for shutdown signal
    // -----------------------------------------------------------------------

    tokio::select! {
        _ = tail_handle => {
            tracing::error!("journal tail loop exited unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("habzone-monitor shutting down (SIGINT)");
        }
    }

    Ok(())
}
