//! HabZoneService – the state tracker: last known system, active display
//! settings, and the enrichment completion channel.
//!
//! The service is single-owner. The host-facing glue ([`crate::host`])
//! mutates it from the main context only; enrichment workers touch nothing
//! here — they talk back exclusively through the channel drained by
//! [`HabZoneService::poll_enrichment`].

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use log::debug;

use crate::edsm::{spawn_fetch, FetchOutcome};
use crate::journal::JournalScanner;
use crate::settings::DisplaySettings;
use crate::types::{StarObservation, ZoneResult, WORLD_COUNT};
use crate::zones::{habitable_zones, ZoneError};

pub struct HabZoneService {
    settings: DisplaySettings,
    last_system: String,
    scanner: JournalScanner,
    fetch_tx: Sender<FetchOutcome>,
    fetch_rx: Receiver<FetchOutcome>,
}

impl HabZoneService {
    pub fn new(scanner: JournalScanner, settings: DisplaySettings) -> Self {
        let (fetch_tx, fetch_rx) = channel();
        Self {
            settings,
            last_system: String::new(),
            scanner,
            fetch_tx,
            fetch_rx,
        }
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    /// Full rewrite from the host's configuration-changed callback.
    pub fn apply_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
    }

    // -----------------------------------------------------------------------
    // System-name tracking
    // -----------------------------------------------------------------------

    pub fn last_system(&self) -> &str {
        &self.last_system
    }

    /// Merge a system-name hint: non-empty overwrites, empty never clears a
    /// known name.
    pub fn note_system_name(&mut self, name: &str) {
        if !name.is_empty() {
            self.last_system = name.to_owned();
        }
    }

    /// The tracked name, falling back to a bounded journal scan when nothing
    /// has been tracked yet this process lifetime. Opportunistic: `None`
    /// leaves state untouched.
    pub fn system_name_best_effort(&mut self) -> Option<String> {
        if !self.last_system.is_empty() {
            return Some(self.last_system.clone());
        }
        let recovered = self.scanner.last_known_system()?;
        self.note_system_name(&recovered);
        Some(recovered)
    }

    // -----------------------------------------------------------------------
    // Zone computation
    // -----------------------------------------------------------------------

    /// Derive zone bands for one observation. Pure; the observation is not
    /// retained.
    pub fn observe_star(
        &self,
        obs: &StarObservation,
    ) -> Result<[ZoneResult; WORLD_COUNT], ZoneError> {
        habitable_zones(obs)
    }

    /// Best-effort arrival-star recovery from the journal tail, for use when
    /// no scan event has arrived yet this process lifetime.
    pub fn recover_observation(&self) -> Option<StarObservation> {
        self.scanner.last_arrival_star_scan()
    }

    // -----------------------------------------------------------------------
    // Enrichment
    // -----------------------------------------------------------------------

    /// Start one enrichment fetch for the tracked system, without waiting.
    ///
    /// No-op when EDSM lookups are disabled or no system is known. Nothing
    /// serialises overlapping triggers; the later completion wins at
    /// [`poll_enrichment`](Self::poll_enrichment) time.
    pub fn trigger_enrichment(&mut self) {
        if !self.settings.edsm_enabled {
            return;
        }
        if self.last_system.is_empty() {
            debug!("enrichment trigger skipped: no system known yet");
            return;
        }
        spawn_fetch(self.last_system.clone(), self.fetch_tx.clone());
    }

    /// Drain completed fetches, keeping only the most recent outcome
    /// (last completion wins).
    pub fn poll_enrichment(&mut self) -> Option<FetchOutcome> {
        let mut latest = None;
        loop {
            match self.fetch_rx.try_recv() {
                Ok(outcome) => latest = Some(outcome),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }

    /// Test seam: push an outcome into the completion channel as a finished
    /// worker would.
    #[doc(hidden)]
    pub fn inject_fetch_outcome(&self, outcome: FetchOutcome) {
        let _ = self.fetch_tx.send(outcome);
    }
}
