//! EDSM enrichment: one bounded HTTP lookup per trigger, executed on a
//! worker thread with the outcome delivered over a completion channel.
//!
//! The fetch never blocks the owning context. Any failure — connect error,
//! non-success status, timeout, malformed JSON — collapses to a single
//! [`FetchError`] with no partial data; the display layer renders it as `?`
//! markers. Results carry the system name they were fetched for so the owner
//! can reject late arrivals keyed to a system it already left.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use thiserror::Error;

use crate::protocol::{bodies_endpoint, body_link, system_link, BodiesResponse};
use crate::types::WorldType;

/// Hard cap on one lookup, connect and read included.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Group key for terraforming candidates, overriding their native subtype.
const TERRAFORMABLE_GROUP: &str = "terraformable";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an enrichment lookup produced no data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error("response read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("response body was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a completed fetch delivers back to the owner.
pub type FetchOutcome = Result<EnrichmentResult, FetchError>;

// ---------------------------------------------------------------------------
// Result grouping
// ---------------------------------------------------------------------------

/// Body names grouped for display, keyed by the system they belong to.
///
/// A newer result replaces an older one entirely; nothing is merged across
/// fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    /// System name as reported by EDSM (authoritative casing).
    pub system_name: String,
    /// Subtype key → body names in response order. Terraforming candidates
    /// land under `"terraformable"` only, regardless of their own subtype.
    pub bodies_by_subtype: HashMap<String, Vec<String>>,
}

/// One catalog row's projection of an [`EnrichmentResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEnrichment {
    /// Compacted body names, space-separated.
    pub text: String,
    /// Deep link: the body itself when the row has exactly one, otherwise
    /// the whole-system view.
    pub url: String,
}

impl EnrichmentResult {
    /// Group a bodies response by subtype, with the terraforming-candidate
    /// flag taking precedence over the native subtype.
    pub fn from_response(response: BodiesResponse) -> Self {
        let mut bodies_by_subtype: HashMap<String, Vec<String>> = HashMap::new();
        for body in response.bodies {
            let key = if body.is_terraforming_candidate() {
                TERRAFORMABLE_GROUP.to_owned()
            } else {
                body.sub_type
            };
            bodies_by_subtype.entry(key).or_default().push(body.name);
        }
        Self {
            system_name: response.name,
            bodies_by_subtype,
        }
    }

    /// Whether this result belongs to the given system (EDSM may canonicalise
    /// casing, so the comparison ignores ASCII case).
    pub fn is_for(&self, system_name: &str) -> bool {
        self.system_name.eq_ignore_ascii_case(system_name)
    }

    /// Project the row for one catalog entry.
    pub fn row(&self, world: &WorldType) -> RowEnrichment {
        let names: Vec<&String> = self
            .bodies_by_subtype
            .get(world.lookup_key)
            .map(|v| v.iter().filter(|n| !n.is_empty()).collect())
            .unwrap_or_default();

        let text = names
            .iter()
            .map(|n| compact_name(&self.system_name, n))
            .collect::<Vec<_>>()
            .join(" ");

        let url = if names.len() == 1 {
            body_link(&self.system_name, names[0])
        } else {
            system_link(&self.system_name)
        };

        RowEnrichment { text, url }
    }
}

/// Strip the system-name prefix and collapse the remainder's spaces, so
/// "Col 285 Sector AB-C 1 4 a" shows as "14a" under its own system.
fn compact_name(system_name: &str, body_name: &str) -> String {
    if !system_name.is_empty() && body_name.starts_with(system_name) {
        body_name[system_name.len()..].replace(' ', "")
    } else {
        body_name.to_owned()
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// One blocking GET against the bodies endpoint. Runs on the caller's
/// thread; use [`spawn_fetch`] from the owning context.
pub fn fetch_bodies(system_name: &str) -> Result<BodiesResponse, FetchError> {
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    let url = bodies_endpoint(system_name);
    debug!("edsm lookup: {url}");

    let body = agent
        .get(&url)
        .call()
        .map_err(Box::new)?
        .into_string()?;
    let response: BodiesResponse = serde_json::from_str(&body)?;
    Ok(response)
}

/// Fire-and-forget worker: fetch, group, and send the outcome down the
/// completion channel. A receiver that has gone away is ignored.
pub fn spawn_fetch(system_name: String, tx: Sender<FetchOutcome>) {
    let worker_tx = tx.clone();
    let spawned = thread::Builder::new()
        .name("edsm-fetch".into())
        .spawn(move || {
            let outcome = fetch_bodies(&system_name).map(EnrichmentResult::from_response);
            if let Err(e) = &outcome {
                debug!("edsm lookup for '{system_name}' failed: {e}");
            }
            let _ = worker_tx.send(outcome);
        });

    if let Err(e) = spawned {
        warn!("could not spawn edsm fetch worker: {e}");
        let _ = tx.send(Err(FetchError::Io(e)));
    }
}
