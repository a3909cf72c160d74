//! Zone derivation: black-body distance formula and per-world banding.

use crate::types::{StarObservation, ZoneBand, ZoneResult, LS_METERS, WORLDS, WORLD_COUNT};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Input rejection for the distance formula.
///
/// A non-positive or non-finite radius/temperature abandons the whole
/// computation; callers surface an error marker on every row rather than
/// showing zeros or stale bands.
#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("invalid stellar input: radius={radius_m} m, temperature={surface_temp_k} K")]
    InvalidInput { radius_m: f64, surface_temp_k: f64 },

    #[error("invalid target temperature: {target_k} K")]
    InvalidTarget { target_k: f64 },
}

fn positive_finite(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

// ---------------------------------------------------------------------------
// Distance formula
// ---------------------------------------------------------------------------

/// Distance (in light-seconds) at which a black body around a star of the
/// given radius and surface temperature settles at `target_k`.
///
/// Implements `sqrt(r² · t⁴ / (4 · target⁴)) / LS_METERS`. The target must be
/// strictly positive — a zero target is rejected, never computed as infinity.
pub fn far_distance_ls(radius_m: f64, surface_temp_k: f64, target_k: f64) -> Result<f64, ZoneError> {
    if !positive_finite(radius_m) || !positive_finite(surface_temp_k) {
        return Err(ZoneError::InvalidInput {
            radius_m,
            surface_temp_k,
        });
    }
    if !positive_finite(target_k) {
        return Err(ZoneError::InvalidTarget { target_k });
    }

    let r2 = radius_m * radius_m;
    let t4 = surface_temp_k.powi(4);
    let target4 = target_k.powi(4);
    Ok((r2 * t4 / (4.0 * target4)).sqrt() / LS_METERS)
}

/// Round-half-up to a whole light-second, matching the historical
/// `int(0.5 + x)` behavior for non-negative distances.
fn round_ls(value: f64) -> u64 {
    (value + 0.5).floor() as u64
}

// ---------------------------------------------------------------------------
// Per-world banding
// ---------------------------------------------------------------------------

/// Derive a [`ZoneResult`] for every catalog entry from one observation.
///
/// The near bound is the star's own radius for entries without a high
/// threshold, otherwise the high-threshold distance. A band whose far bound
/// does not clear the stellar radius is reported occluded (`band == None`).
///
/// Fails atomically: a bad radius or temperature yields `Err` and no partial
/// rows.
pub fn habitable_zones(obs: &StarObservation) -> Result<[ZoneResult; WORLD_COUNT], ZoneError> {
    if !positive_finite(obs.radius_m) || !positive_finite(obs.surface_temp_k) {
        return Err(ZoneError::InvalidInput {
            radius_m: obs.radius_m,
            surface_temp_k: obs.surface_temp_k,
        });
    }

    let radius_ls = round_ls(obs.radius_m / LS_METERS);

    let mut results = [ZoneResult {
        world: 0,
        band: None,
    }; WORLD_COUNT];

    for (i, world) in WORLDS.iter().enumerate() {
        let far_ls = round_ls(far_distance_ls(
            obs.radius_m,
            obs.surface_temp_k,
            world.low_k,
        )?);

        let band = if far_ls <= radius_ls {
            None
        } else {
            let near_ls = match world.high_k {
                Some(high) => round_ls(far_distance_ls(obs.radius_m, obs.surface_temp_k, high)?),
                // Inner edge is the star itself.
                None => radius_ls,
            };
            Some(ZoneBand { near_ls, far_ls })
        };

        results[i] = ZoneResult { world: i, band };
    }

    Ok(results)
}
