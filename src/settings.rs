//! Persisted display settings: visibility bitmask codec and the host
//! key-value store seam.
//!
//! Two keys are persisted. The visibility key packs one bit per catalog
//! entry (bit `1 << index`) plus the EDSM-lookup flag at [`SETTING_EDSM`];
//! the raw value `0` means "use the default" and [`SETTING_NONE`] means
//! "explicitly nothing selected". The abbreviation key stores the literal
//! strings `"1"` / `"0"`.

use crate::types::{WORLD_COUNT, WORLDS};
use serde::{Deserialize, Serialize};

/// Persisted key for the visibility + lookup bitmask.
pub const VISIBILITY_KEY: &str = "habzone";
/// Persisted key for the abbreviation preference.
pub const ABBREV_KEY: &str = "habzone_abbrev";

/// Default selection when nothing has been persisted yet: Earth-Like only.
pub const SETTING_DEFAULT: u16 = 0x0002;
/// EDSM-lookup flag bit, stored alongside the world bits.
pub const SETTING_EDSM: u16 = 0x1000;
/// Sentinel for "explicitly none" — a stored `0` must keep meaning "default".
pub const SETTING_NONE: u16 = 0xffff;

// ---------------------------------------------------------------------------
// Host store seam
// ---------------------------------------------------------------------------

/// The host's persisted key-value configuration store.
///
/// The host owns storage and schema; the plugin only reads and writes the two
/// keys above through this trait.
pub trait SettingsStore {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn set_int(&mut self, key: &str, value: i64);
    fn get_str(&self, key: &str) -> Option<String>;
    fn set_str(&mut self, key: &str, value: &str);
}

// ---------------------------------------------------------------------------
// Visibility mask
// ---------------------------------------------------------------------------

/// Which catalog rows are shown, one bit per [`WORLDS`] index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityMask(u16);

impl VisibilityMask {
    const WORLD_BITS: u16 = (1 << WORLD_COUNT) - 1;

    pub fn from_bits(bits: u16) -> Self {
        Self(bits & Self::WORLD_BITS)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn shows(&self, world: usize) -> bool {
        world < WORLD_COUNT && self.0 & (1 << world) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Indices of visible catalog entries, in display order.
    pub fn visible_worlds(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WORLDS.len()).filter(|i| self.shows(*i))
    }
}

impl Default for VisibilityMask {
    fn default() -> Self {
        Self::from_bits(SETTING_DEFAULT)
    }
}

// ---------------------------------------------------------------------------
// Display settings
// ---------------------------------------------------------------------------

/// The user-facing preferences: row visibility, EDSM lookups, abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub mask: VisibilityMask,
    pub edsm_enabled: bool,
    pub abbreviate: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            mask: VisibilityMask::default(),
            edsm_enabled: false,
            abbreviate: false,
        }
    }
}

impl DisplaySettings {
    /// Decode a raw persisted visibility value.
    ///
    /// `0` → default selection, [`SETTING_NONE`] → nothing selected, anything
    /// else is taken literally (world bits plus the EDSM flag).
    pub fn decode_visibility(raw: u16) -> (VisibilityMask, bool) {
        let effective = match raw {
            0 => SETTING_DEFAULT,
            SETTING_NONE => 0,
            other => other,
        };
        (
            VisibilityMask::from_bits(effective),
            effective & SETTING_EDSM != 0,
        )
    }

    /// Encode for persistence. An all-clear selection is stored as the
    /// [`SETTING_NONE`] sentinel so it survives the `0` → default rule.
    pub fn encode_visibility(&self) -> u16 {
        let raw = self.mask.bits() | if self.edsm_enabled { SETTING_EDSM } else { 0 };
        if raw == 0 {
            SETTING_NONE
        } else {
            raw
        }
    }

    /// Read both persisted keys, degrading to defaults on anything missing
    /// or unparseable.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let raw = store
            .get_int(VISIBILITY_KEY)
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(0);
        let (mask, edsm_enabled) = Self::decode_visibility(raw);

        let abbreviate = store
            .get_str(ABBREV_KEY)
            .map(|v| v.trim() == "1")
            .unwrap_or(false);

        Self {
            mask,
            edsm_enabled,
            abbreviate,
        }
    }

    /// Persist both keys.
    pub fn store(&self, store: &mut dyn SettingsStore) {
        store.set_int(VISIBILITY_KEY, i64::from(self.encode_visibility()));
        store.set_str(ABBREV_KEY, if self.abbreviate { "1" } else { "0" });
    }
}
