//! Host and EDSM boundary messages.
//!
//! This module owns **every message that crosses a process boundary**: the
//! journal events the host forwards (or that the tail scanner re-reads from
//! disk), the periodic commander status, and the EDSM bodies API.
//!
//! ## Boundary surfaces
//!
//! | Surface            | Direction       | Carried by                  |
//! |--------------------|-----------------|-----------------------------|
//! | journal events     | host → plugin   | per-entry callback / tail   |
//! | commander status   | host → plugin   | periodic callback           |
//! | `bodies` lookup    | plugin → EDSM   | HTTP GET (worker thread)    |
//! | deep links         | plugin → user   | URL strings for the display |
//!
//! ## Design rules
//!
//! 1. Every struct is `Serialize + Deserialize`; journal fields keep their
//!    on-disk PascalCase names via explicit renames.
//! 2. Unknown journal events deserialize to [`JournalEvent::Other`] instead
//!    of failing the line.
//! 3. Absent numeric fields stay `Option` — zone math decides what missing
//!    data means, not the decoder.

use serde::{Deserialize, Serialize};

use crate::types::StarObservation;

// ---------------------------------------------------------------------------
// Journal events  (host callback / journal tail)
// ---------------------------------------------------------------------------

/// One journal entry, discriminated by its `event` field.
///
/// Only the three events the plugin reacts to are modeled; everything else
/// lands in `Other` and is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum JournalEvent {
    Scan(ScanEvent),
    #[serde(rename = "FSDJump")]
    FsdJump(ArrivalEvent),
    Location(ArrivalEvent),
    #[serde(other)]
    Other,
}

impl JournalEvent {
    /// Decode a single journal line. Malformed lines yield `None`; the
    /// caller skips them (recovered locally, never an error).
    pub fn parse_line(line: &str) -> Option<JournalEvent> {
        serde_json::from_str(line.trim()).ok()
    }
}

/// A `Scan` event. Only the fields the zone math needs are decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    #[serde(rename = "BodyName", default)]
    pub body_name: String,
    /// Zero (or absent) means the scanned body is the arrival star itself.
    #[serde(rename = "DistanceFromArrivalLS", default)]
    pub distance_from_arrival_ls: f64,
    #[serde(rename = "Radius")]
    pub radius: Option<f64>,
    #[serde(rename = "SurfaceTemperature")]
    pub surface_temperature: Option<f64>,
}

impl ScanEvent {
    /// True when this scan describes the arrival star (distance zero).
    pub fn is_arrival_star(&self) -> bool {
        self.distance_from_arrival_ls == 0.0
    }

    /// The measurement, when both fields are present. Validity (positive,
    /// finite) is judged by the zone math, not here.
    pub fn observation(&self) -> Option<StarObservation> {
        match (self.radius, self.surface_temperature) {
            (Some(r), Some(t)) => Some(StarObservation::new(r, t)),
            _ => None,
        }
    }
}

/// An `FSDJump` or `Location` event: the system the commander arrived in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrivalEvent {
    #[serde(rename = "StarSystem", default)]
    pub star_system: String,
}

// ---------------------------------------------------------------------------
// Commander status  (host periodic callback)
// ---------------------------------------------------------------------------

/// Periodic command-state notification from the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommanderStatus {
    #[serde(default)]
    pub docked: bool,
    /// Last system name the host knows about; may be empty.
    #[serde(default)]
    pub last_system: String,
}

// ---------------------------------------------------------------------------
// EDSM bodies API  (worker-thread HTTP GET)
// ---------------------------------------------------------------------------

/// Base URL for both the API endpoint and the human-facing deep links.
pub const EDSM_BASE: &str = "https://www.edsm.net";

/// `terraformingState` value that overrides subtype bucketing.
pub const TERRAFORMING_CANDIDATE: &str = "Candidate for terraforming";

/// Response shape of `api-system-v1/bodies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodiesResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bodies: Vec<EdsmBody>,
}

/// One body from the EDSM response. Everything defaults so partial records
/// degrade instead of failing the whole parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdsmBody {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "subType", default)]
    pub sub_type: String,
    #[serde(rename = "terraformingState", default)]
    pub terraforming_state: Option<String>,
}

impl EdsmBody {
    pub fn is_terraforming_candidate(&self) -> bool {
        self.terraforming_state.as_deref() == Some(TERRAFORMING_CANDIDATE)
    }
}

// ---------------------------------------------------------------------------
// URL builders
// ---------------------------------------------------------------------------

/// Percent-escape a query value (RFC 3986 unreserved characters pass
/// through, everything else is `%XX`-encoded byte-wise).
fn escape_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// API endpoint for a system's body list.
pub fn bodies_endpoint(system_name: &str) -> String {
    format!(
        "{EDSM_BASE}/api-system-v1/bodies?systemName={}",
        escape_query(system_name)
    )
}

/// Deep link to the whole-system view.
pub fn system_link(system_name: &str) -> String {
    format!(
        "{EDSM_BASE}/show-system?systemName={}&bodyName=ALL",
        escape_query(system_name)
    )
}

/// Deep link to a single body.
pub fn body_link(system_name: &str, body_name: &str) -> String {
    format!(
        "{EDSM_BASE}/show-system?systemName={}&bodyName={}",
        escape_query(system_name),
        escape_query(body_name)
    )
}
