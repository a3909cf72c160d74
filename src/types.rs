//! Core habitable-zone types shared across all modules.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// One light-second in metres.
///
/// Deliberately the historical approximation rather than the exact physical
/// constant (299 792 458 m) — displayed distances must stay bit-for-bit
/// stable against prior releases.
pub const LS_METERS: f64 = 300_000_000.0;

// ---------------------------------------------------------------------------
// World catalog
// ---------------------------------------------------------------------------

/// A catalog entry describing one world class and its black-body temperature
/// band.
///
/// `high_k` is the inner-edge threshold; `None` means the inner edge is the
/// star itself (Metal-Rich). `low_k` is the outer-edge threshold.
/// `lookup_key` matches the EDSM `subType` field used for body grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldType {
    pub name: &'static str,
    pub high_k: Option<f64>,
    pub low_k: f64,
    pub lookup_key: &'static str,
}

/// Number of catalog entries; fixed for the process lifetime.
pub const WORLD_COUNT: usize = 5;

/// The fixed world catalog, in display order.
///
/// The index of an entry defines its visibility-mask bit (`1 << index`) and
/// its row position, so the order here must never change at runtime.
pub const WORLDS: [WorldType; WORLD_COUNT] = [
    WorldType {
        name: "Metal-Rich",
        high_k: None,
        low_k: 1103.0,
        lookup_key: "Metal-rich body",
    },
    WorldType {
        name: "Earth-Like",
        high_k: Some(278.0),
        low_k: 227.0,
        lookup_key: "Earth-like world",
    },
    WorldType {
        name: "Water",
        high_k: Some(307.0),
        low_k: 156.0,
        lookup_key: "Water world",
    },
    WorldType {
        name: "Ammonia",
        high_k: Some(193.0),
        low_k: 117.0,
        lookup_key: "Ammonia world",
    },
    WorldType {
        name: "Terraformable",
        high_k: Some(315.0),
        low_k: 223.0,
        lookup_key: "terraformable",
    },
];

// ---------------------------------------------------------------------------
// Star observation
// ---------------------------------------------------------------------------

/// A single arrival-star measurement, consumed immediately to derive zone
/// bands and never retained afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarObservation {
    /// Stellar radius in metres.
    pub radius_m: f64,
    /// Surface temperature in Kelvin.
    pub surface_temp_k: f64,
}

impl StarObservation {
    pub fn new(radius_m: f64, surface_temp_k: f64) -> Self {
        Self {
            radius_m,
            surface_temp_k,
        }
    }
}

// ---------------------------------------------------------------------------
// Zone results
// ---------------------------------------------------------------------------

/// A habitable band in whole light-seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBand {
    pub near_ls: u64,
    pub far_ls: u64,
}

/// The derived zone for one catalog entry.
///
/// `band == None` means the whole band lies inside the star (occluded);
/// display policy renders this as a dash glyph, not a pair of distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneResult {
    /// Index into [`WORLDS`].
    pub world: usize,
    pub band: Option<ZoneBand>,
}

impl ZoneResult {
    /// The catalog entry this result belongs to.
    pub fn world_type(&self) -> &'static WorldType {
        &WORLDS[self.world]
    }

    pub fn occluded(&self) -> bool {
        self.band.is_none()
    }
}

impl std::fmt::Display for ZoneResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.band {
            Some(band) => write!(
                f,
                "{}: {} - {} ls",
                self.world_type().name,
                band.near_ls,
                band.far_ls
            ),
            None => write!(f, "{}: ×", self.world_type().name),
        }
    }
}
