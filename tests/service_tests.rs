//! HabZoneService and settings-codec unit tests

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    use habzone::edsm::EnrichmentResult;
    use habzone::journal::JournalScanner;
    use habzone::protocol::BodiesResponse;
    use habzone::service::HabZoneService;
    use habzone::settings::{
        DisplaySettings, SettingsStore, ABBREV_KEY, SETTING_EDSM, SETTING_NONE, VISIBILITY_KEY,
    };

    // -----------------------------------------------------------------------
    // Fixtures
    // -----------------------------------------------------------------------

    fn temp_journal_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("habzone-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("temp dir must be creatable");
        dir
    }

    fn make_service(dir: &PathBuf, settings: DisplaySettings) -> HabZoneService {
        HabZoneService::new(JournalScanner::new(Some(dir.clone())), settings)
    }

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

    // -----------------------------------------------------------------------
    // System-name merge policy
    // -----------------------------------------------------------------------

    #[test]
    fn empty_hints_never_clear_a_known_name() {
        let dir = temp_journal_dir("merge");
        let mut svc = make_service(&dir, DisplaySettings::default());

        assert_eq!(svc.last_system(), "");
        svc.note_system_name("Alpha");
        assert_eq!(svc.last_system(), "Alpha");

        svc.note_system_name("");
        assert_eq!(svc.last_system(), "Alpha");

        svc.note_system_name("Beta");
        assert_eq!(svc.last_system(), "Beta");
    }

    // -----------------------------------------------------------------------
    // Journal recovery
    // -----------------------------------------------------------------------

    #[test]
    fn best_effort_name_recovers_from_the_journal_tail() {
        let dir = temp_journal_dir("name-recovery");
        fs::write(
            dir.join("Journal.2026-08-07T010101.log"),
            concat!(
                r#"{"event":"FSDJump","StarSystem":"Old Place"}"#,
                "\n",
                "this line is not json\n",
                r#"{"event":"Location","StarSystem":"Shinrarta Dezhra"}"#,
                "\n",
                r#"{"event":"Music","MusicTrack":"NoTrack"}"#,
                "\n",
            ),
        )
        .unwrap();

        let mut svc = make_service(&dir, DisplaySettings::default());
        assert_eq!(
            svc.system_name_best_effort().as_deref(),
            Some("Shinrarta Dezhra")
        );
        // The recovered name is now tracked.
        assert_eq!(svc.last_system(), "Shinrarta Dezhra");
    }

    #[test]
    fn tracked_name_wins_over_the_journal() {
        let dir = temp_journal_dir("tracked-wins");
        fs::write(
            dir.join("Journal.2026-08-07T010101.log"),
            concat!(r#"{"event":"FSDJump","StarSystem":"Journal Place"}"#, "\n"),
        )
        .unwrap();

        let mut svc = make_service(&dir, DisplaySettings::default());
        svc.note_system_name("Tracked Place");
        assert_eq!(
            svc.system_name_best_effort().as_deref(),
            Some("Tracked Place")
        );
    }

    #[test]
    fn arrival_star_scan_skips_remote_bodies() {
        let dir = temp_journal_dir("arrival-scan");
        fs::write(
            dir.join("Journal.2026-08-07T010101.log"),
            concat!(
                r#"{"event":"Scan","BodyName":"Star","DistanceFromArrivalLS":0.0,"Radius":695700000.0,"SurfaceTemperature":5778.0}"#,
                "\n",
                r#"{"event":"Scan","BodyName":"Planet","DistanceFromArrivalLS":359.2,"Radius":6371000.0,"SurfaceTemperature":288.0}"#,
                "\n",
            ),
        )
        .unwrap();

        let svc = make_service(&dir, DisplaySettings::default());
        let obs = svc.recover_observation().expect("arrival scan present");
        assert_eq!(obs.radius_m, 695_700_000.0);
        assert_eq!(obs.surface_temp_k, 5778.0);
    }

    #[test]
    fn empty_journal_dir_recovers_nothing() {
        let dir = temp_journal_dir("empty");
        let mut svc = make_service(&dir, DisplaySettings::default());
        assert_eq!(svc.system_name_best_effort(), None);
        assert!(svc.recover_observation().is_none());
        assert_eq!(svc.last_system(), "");
    }

    #[test]
    fn newest_journal_file_wins() {
        let dir = temp_journal_dir("newest");
        fs::write(
            dir.join("Journal.2026-08-06T010101.log"),
            concat!(r#"{"event":"FSDJump","StarSystem":"Older"}"#, "\n"),
        )
        .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(25));
        fs::write(
            dir.join("Journal.2026-08-07T010101.log"),
            concat!(r#"{"event":"FSDJump","StarSystem":"Newer"}"#, "\n"),
        )
        .unwrap();

        let mut svc = make_service(&dir, DisplaySettings::default());
        assert_eq!(svc.system_name_best_effort().as_deref(), Some("Newer"));
    }

    // -----------------------------------------------------------------------
    // Settings codec
    // -----------------------------------------------------------------------

    #[test]
    fn zero_decodes_to_the_default_selection() {
        let (mask, edsm) = DisplaySettings::decode_visibility(0);
        assert!(mask.shows(1)); // Earth-Like
        assert!(!mask.shows(0));
        assert!(!edsm);
    }

    #[test]
    fn sentinel_decodes_to_nothing_selected() {
        let (mask, edsm) = DisplaySettings::decode_visibility(SETTING_NONE);
        assert!(mask.is_empty());
        assert!(!edsm);
    }

    #[test]
    fn literal_masks_pass_through_with_the_edsm_bit() {
        let (mask, edsm) = DisplaySettings::decode_visibility(0x1005);
        assert!(mask.shows(0));
        assert!(mask.shows(2));
        assert!(!mask.shows(1));
        assert!(edsm);
    }

    #[test]
    fn all_clear_selection_encodes_as_the_sentinel() {
        let (mask, _) = DisplaySettings::decode_visibility(SETTING_NONE);
        let settings = DisplaySettings {
            mask,
            edsm_enabled: false,
            abbreviate: false,
        };
        assert_eq!(settings.encode_visibility(), SETTING_NONE);
    }

    #[test]
    fn settings_round_trip_through_a_store() {
        let mut store = MemoryStore::default();
        let (mask, _) = DisplaySettings::decode_visibility(0x0007);
        let settings = DisplaySettings {
            mask,
            edsm_enabled: true,
            abbreviate: true,
        };
        settings.store(&mut store);

        assert_eq!(
            store.get_int(VISIBILITY_KEY),
            Some(i64::from(0x0007 | SETTING_EDSM))
        );
        assert_eq!(store.get_str(ABBREV_KEY).as_deref(), Some("1"));
        assert_eq!(DisplaySettings::load(&store), settings);
    }

    #[test]
    fn missing_keys_load_as_defaults() {
        let store = MemoryStore::default();
        let settings = DisplaySettings::load(&store);
        assert_eq!(settings, DisplaySettings::default());
        assert!(settings.mask.shows(1));
        assert!(!settings.abbreviate);
    }

    // -----------------------------------------------------------------------
    // Enrichment bookkeeping
    // -----------------------------------------------------------------------

    #[test]
    fn disabled_or_unkeyed_triggers_fetch_nothing() {
        let dir = temp_journal_dir("no-trigger");

        // EDSM disabled: trigger is a no-op even with a known system.
        let mut svc = make_service(&dir, DisplaySettings::default());
        svc.note_system_name("Alpha");
        svc.trigger_enrichment();
        assert!(svc.poll_enrichment().is_none());

        // EDSM enabled but no system known yet: also a no-op.
        let settings = DisplaySettings {
            edsm_enabled: true,
            ..DisplaySettings::default()
        };
        let mut svc = make_service(&dir, settings);
        svc.trigger_enrichment();
        assert!(svc.poll_enrichment().is_none());
    }

    #[test]
    fn poll_keeps_only_the_last_completion() {
        let dir = temp_journal_dir("last-wins");
        let mut svc = make_service(&dir, DisplaySettings::default());

        let first = EnrichmentResult::from_response(BodiesResponse {
            name: "First".to_owned(),
            bodies: Vec::new(),
        });
        let second = EnrichmentResult::from_response(BodiesResponse {
            name: "Second".to_owned(),
            bodies: Vec::new(),
        });
        svc.inject_fetch_outcome(Ok(first));
        svc.inject_fetch_outcome(Ok(second));

        let latest = svc.poll_enrichment().expect("one outcome must surface");
        assert_eq!(latest.unwrap().system_name, "Second");
        assert!(svc.poll_enrichment().is_none());
    }
}
