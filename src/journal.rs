//! Journal tail scanning: best-effort recovery of the last known system and
//! the last arrival-star measurement from the newest journal file.
//!
//! Everything in here is opportunistic. A missing directory, no journal
//! files, or malformed lines degrade to `None` — absence of data, never an
//! error the host sees. Scans are bounded by fixed trailing-line windows so
//! they cannot stall startup on a huge journal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;

use crate::protocol::JournalEvent;
use crate::types::StarObservation;

/// Trailing window for the system-name scan.
pub const SYSTEM_SCAN_WINDOW: usize = 5_000;
/// Trailing window for the arrival-star scan. Intentionally larger than
/// [`SYSTEM_SCAN_WINDOW`]; the two paths have always used different bounds.
pub const STAR_SCAN_WINDOW: usize = 20_000;

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Resolves the journal directory and runs the bounded tail scans.
#[derive(Clone)]
pub struct JournalScanner {
    override_dir: Option<PathBuf>,
}

impl JournalScanner {
    /// `override_dir` is the host-configured journal directory, if any; it is
    /// used only when it actually exists.
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// The directory to scan: the override when set and present, otherwise
    /// the documented default under the user's profile.
    pub fn dir(&self) -> PathBuf {
        if let Some(dir) = &self.override_dir {
            if dir.is_dir() {
                return dir.clone();
            }
        }
        default_journal_dir()
    }

    /// Most recently modified `Journal.*.log` in the journal directory.
    pub fn latest_journal(&self) -> Option<PathBuf> {
        let dir = self.dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("journal dir {} unreadable: {}", dir.display(), e);
                return None;
            }
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_journal_file(&path) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if newest.as_ref().map(|(t, _)| modified > *t).unwrap_or(true) {
                newest = Some((modified, path));
            }
        }
        newest.map(|(_, path)| path)
    }

    /// Newest-entry-first scan for the latest `Location`/`FSDJump` system
    /// name within the trailing [`SYSTEM_SCAN_WINDOW`].
    pub fn last_known_system(&self) -> Option<String> {
        let path = self.latest_journal()?;
        let tail = tail_lines(&path, SYSTEM_SCAN_WINDOW)?;

        for line in tail.iter().rev() {
            match JournalEvent::parse_line(line) {
                Some(JournalEvent::FsdJump(ev)) | Some(JournalEvent::Location(ev))
                    if !ev.star_system.is_empty() =>
                {
                    return Some(ev.star_system);
                }
                _ => continue,
            }
        }
        None
    }

    /// Newest-entry-first scan for the latest arrival-star `Scan` (distance
    /// from arrival zero) carrying both radius and surface temperature,
    /// within the trailing [`STAR_SCAN_WINDOW`].
    ///
    /// An arrival scan missing either field is skipped and the scan keeps
    /// walking backwards.
    pub fn last_arrival_star_scan(&self) -> Option<StarObservation> {
        let path = self.latest_journal()?;
        let tail = tail_lines(&path, STAR_SCAN_WINDOW)?;

        for line in tail.iter().rev() {
            if let Some(JournalEvent::Scan(scan)) = JournalEvent::parse_line(line) {
                if !scan.is_arrival_star() {
                    continue;
                }
                if let Some(obs) = scan.observation() {
                    return Some(obs);
                }
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_journal_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("Journal.") && n.ends_with(".log"))
            .unwrap_or(false)
}

/// Default journal location under the user's profile.
fn default_journal_dir() -> PathBuf {
    let home = std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
        .unwrap_or_default();
    home.join("Saved Games")
        .join("Frontier Developments")
        .join("Elite Dangerous")
}

/// Last `max` lines of a file, decoded lossily (journals occasionally carry
/// stray bytes; a bad line should not abort the scan).
fn tail_lines(path: &Path, max: usize) -> Option<Vec<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("journal {} unreadable: {}", path.display(), e);
            return None;
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text.lines().map(str::to_owned).collect();
    let start = lines.len().saturating_sub(max);
    Some(lines[start..].to_vec())
}
