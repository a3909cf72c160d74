//! Host integration – wires host callbacks to the service and the display
//! observer.
//!
//! ## Role in the host
//!
//! The host owns lifecycle, event dispatch, and the widget tree. The plugin
//! implements [`HostEventSink`]; the host invokes it from its single main
//! context. The display side implements [`ZoneObserver`] and is only ever
//! called from that same context — fetch completions are drained by
//! [`HabZonePlugin::pump`], not delivered from worker threads.
//!
//! ## Event contract (inbound)
//!
//! | Callback            | Event        | Effect                                   |
//! |---------------------|--------------|------------------------------------------|
//! | `journal_event`     | `Scan`       | arrival star → recompute zone rows       |
//! | `journal_event`     | `FSDJump`    | clear rows, track system, maybe fetch    |
//! | `journal_event`     | `Location`   | track system, maybe fetch                |
//! | `commander_status`  | *(periodic)* | when undocked: track system, maybe fetch |
//!
//! ## Observer contract (outbound)
//!
//! | Call                  | Meaning                                        |
//! |-----------------------|------------------------------------------------|
//! | `zone_results`        | fresh bands, one row per catalog entry         |
//! | `zone_error`          | computation attempted and failed (all rows)    |
//! | `cleared`             | jump in progress, rows blanked                 |
//! | `enrichment_result`   | current-system body names grouped for display  |
//! | `enrichment_failed`   | lookup failed, rows show `?`                   |
//! | `visibility_changed`  | row visibility / formatting preferences moved  |

use log::{debug, warn};

use crate::edsm::EnrichmentResult;
use crate::protocol::{CommanderStatus, JournalEvent};
use crate::service::HabZoneService;
use crate::settings::{DisplaySettings, SettingsStore};
use crate::types::{ZoneResult, WORLD_COUNT};

/// Fixed delays for the staggered best-effort rescans after startup,
/// tolerating the host's own startup-ordering nondeterminism. Not a backoff
/// sequence.
pub const STARTUP_RESCAN_DELAYS_MS: [u64; 3] = [600, 2_000, 5_000];

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Display side of the plugin. Implementations own formatting and widget
/// visibility; everything here is invoked from the main context only.
pub trait ZoneObserver {
    fn zone_results(&mut self, rows: &[ZoneResult; WORLD_COUNT]);
    /// Computation was attempted and failed; distinct from "never computed".
    fn zone_error(&mut self);
    /// A jump started; previous rows no longer apply.
    fn cleared(&mut self);
    fn enrichment_result(&mut self, result: &EnrichmentResult);
    fn enrichment_failed(&mut self);
    fn visibility_changed(&mut self, settings: &DisplaySettings);
}

/// The host's dispatch surface. The host owns invocation; the plugin owns
/// the logic behind it.
pub trait HostEventSink {
    fn journal_event(&mut self, event: &JournalEvent);
    fn commander_status(&mut self, status: &CommanderStatus);
}

// ---------------------------------------------------------------------------
// Plugin glue
// ---------------------------------------------------------------------------

/// Owns the service and the observer; translates host events into state
/// changes and display calls.
pub struct HabZonePlugin<O: ZoneObserver> {
    service: HabZoneService,
    observer: O,
}

impl<O: ZoneObserver> HabZonePlugin<O> {
    pub fn new(service: HabZoneService, mut observer: O) -> Self {
        // Push the initial visibility state so the display starts correct.
        observer.visibility_changed(&service.settings());
        Self { service, observer }
    }

    pub fn service(&self) -> &HabZoneService {
        &self.service
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Preferences-applied callback: persist, adopt, re-toggle visibility.
    pub fn settings_changed(&mut self, settings: DisplaySettings, store: &mut dyn SettingsStore) {
        settings.store(store);
        self.service.apply_settings(settings);
        self.observer.visibility_changed(&settings);
    }

    /// Manual or startup rescan: restore zone rows from the journal tail,
    /// then refresh enrichment if enabled. Both halves are best-effort.
    pub fn rescan(&mut self) {
        if let Some(obs) = self.service.recover_observation() {
            match self.service.observe_star(&obs) {
                Ok(rows) => self.observer.zone_results(&rows),
                Err(e) => {
                    warn!("journal-restored observation rejected: {e}");
                    self.observer.zone_error();
                }
            }
        }

        if self.service.settings().edsm_enabled
            && self.service.system_name_best_effort().is_some()
        {
            self.service.trigger_enrichment();
        }
    }

    /// Drain fetch completions and hand the freshest one to the observer.
    ///
    /// A successful result keyed to a system other than the currently
    /// tracked one is stale — it is dropped, never displayed as current.
    pub fn pump(&mut self) {
        let Some(outcome) = self.service.poll_enrichment() else {
            return;
        };

        match outcome {
            Err(e) => {
                warn!("enrichment lookup failed: {e}");
                self.observer.enrichment_failed();
            }
            Ok(result) => {
                let current = self.service.last_system();
                if !current.is_empty() && !result.is_for(current) {
                    debug!(
                        "dropping stale enrichment for '{}' (currently in '{}')",
                        result.system_name, current
                    );
                    return;
                }
                self.service.note_system_name(&result.system_name);
                self.observer.enrichment_result(&result);
            }
        }
    }

    fn handle_arrival(&mut self, star_system: &str) {
        self.service.note_system_name(star_system);
        self.service.trigger_enrichment();
    }
}

impl<O: ZoneObserver> HostEventSink for HabZonePlugin<O> {
    fn journal_event(&mut self, event: &JournalEvent) {
        match event {
            JournalEvent::Scan(scan) => {
                if !scan.is_arrival_star() {
                    return;
                }
                match scan.observation() {
                    Some(obs) => match self.service.observe_star(&obs) {
                        Ok(rows) => self.observer.zone_results(&rows),
                        Err(e) => {
                            warn!("arrival scan rejected: {e}");
                            self.observer.zone_error();
                        }
                    },
                    // Scan without radius/temperature: attempted and failed.
                    None => self.observer.zone_error(),
                }
            }
            JournalEvent::FsdJump(ev) => {
                self.observer.cleared();
                self.handle_arrival(&ev.star_system);
            }
            JournalEvent::Location(ev) => {
                self.handle_arrival(&ev.star_system);
            }
            JournalEvent::Other => {}
        }
    }

    fn commander_status(&mut self, status: &CommanderStatus) {
        if !self.service.settings().edsm_enabled || status.docked {
            return;
        }
        self.service.note_system_name(&status.last_system);
        self.service.trigger_enrichment();
    }
}
