//! Zone derivation unit tests

#[cfg(test)]
mod tests {
    use habzone::types::{StarObservation, WORLDS, WORLD_COUNT};
    use habzone::zones::{far_distance_ls, habitable_zones, ZoneError};

    // Sun-like reference star.
    const SUN_RADIUS_M: f64 = 6.957e8;
    const SUN_TEMP_K: f64 = 5778.0;

    // -----------------------------------------------------------------------
    // Formula domain
    // -----------------------------------------------------------------------

    #[test]
    fn zero_target_is_rejected_not_infinite() {
        let err = far_distance_ls(SUN_RADIUS_M, SUN_TEMP_K, 0.0);
        assert!(matches!(err, Err(ZoneError::InvalidTarget { .. })));
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert!(far_distance_ls(0.0, SUN_TEMP_K, 278.0).is_err());
        assert!(far_distance_ls(-1.0, SUN_TEMP_K, 278.0).is_err());
        assert!(far_distance_ls(SUN_RADIUS_M, 0.0, 278.0).is_err());
        assert!(far_distance_ls(f64::NAN, SUN_TEMP_K, 278.0).is_err());
        assert!(far_distance_ls(SUN_RADIUS_M, f64::INFINITY, 278.0).is_err());
    }

    // -----------------------------------------------------------------------
    // Monotonicity
    // -----------------------------------------------------------------------

    #[test]
    fn distance_decreases_with_target_temperature() {
        let hot = far_distance_ls(SUN_RADIUS_M, SUN_TEMP_K, 300.0).unwrap();
        let cold = far_distance_ls(SUN_RADIUS_M, SUN_TEMP_K, 150.0).unwrap();
        assert!(cold > hot);
    }

    #[test]
    fn distance_increases_with_radius_and_temperature() {
        let base = far_distance_ls(SUN_RADIUS_M, SUN_TEMP_K, 278.0).unwrap();
        let bigger = far_distance_ls(SUN_RADIUS_M * 2.0, SUN_TEMP_K, 278.0).unwrap();
        let hotter = far_distance_ls(SUN_RADIUS_M, SUN_TEMP_K * 1.5, 278.0).unwrap();
        assert!(bigger > base);
        assert!(hotter > base);
    }

    // -----------------------------------------------------------------------
    // Purity
    // -----------------------------------------------------------------------

    #[test]
    fn identical_inputs_yield_identical_outputs() {
        let obs = StarObservation::new(SUN_RADIUS_M, SUN_TEMP_K);
        let first = habitable_zones(&obs).unwrap();
        let second = habitable_zones(&obs).unwrap();
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // Sun-like round trip
    // -----------------------------------------------------------------------

    #[test]
    fn sun_like_earth_band_is_plausible() {
        let obs = StarObservation::new(SUN_RADIUS_M, SUN_TEMP_K);
        let rows = habitable_zones(&obs).unwrap();

        // Earth-Like is catalog index 1 (278 K / 227 K).
        assert_eq!(WORLDS[1].name, "Earth-Like");
        let band = rows[1].band.expect("sun-like star must have an Earth band");

        assert!(band.near_ls < band.far_ls);
        assert!(
            (450..=550).contains(&band.near_ls),
            "near bound out of range: {}",
            band.near_ls
        );
        assert!(
            (700..=800).contains(&band.far_ls),
            "far bound out of range: {}",
            band.far_ls
        );
    }

    #[test]
    fn metal_rich_near_bound_is_the_star_itself() {
        let obs = StarObservation::new(SUN_RADIUS_M, SUN_TEMP_K);
        let rows = habitable_zones(&obs).unwrap();

        assert!(WORLDS[0].high_k.is_none());
        let band = rows[0].band.expect("sun-like star has a metal-rich band");
        // round(6.957e8 / 3e8) = 2
        assert_eq!(band.near_ls, 2);
    }

    // -----------------------------------------------------------------------
    // Occlusion
    // -----------------------------------------------------------------------

    #[test]
    fn cool_star_occludes_metal_rich_band() {
        // far/radius ratio depends only on temperature: the band clears the
        // star only when t > target·√2. 1000 K is well under Metal-Rich's
        // 1103 K threshold.
        let obs = StarObservation::new(1.0e9, 1000.0);
        let rows = habitable_zones(&obs).unwrap();

        assert!(rows[0].occluded());
        assert_eq!(rows[0].band, None);
        assert_eq!(format!("{}", rows[0]), "Metal-Rich: ×");

        // The cooler bands still clear the star.
        assert!(rows[1].band.is_some());
    }

    // -----------------------------------------------------------------------
    // Atomic failure
    // -----------------------------------------------------------------------

    #[test]
    fn bad_observation_abandons_every_row() {
        let obs = StarObservation::new(SUN_RADIUS_M, f64::NAN);
        let err = habitable_zones(&obs);
        assert!(matches!(err, Err(ZoneError::InvalidInput { .. })));
    }

    #[test]
    fn catalog_shape_is_stable() {
        assert_eq!(WORLDS.len(), WORLD_COUNT);
        let names: Vec<_> = WORLDS.iter().map(|w| w.name).collect();
        assert_eq!(
            names,
            ["Metal-Rich", "Earth-Like", "Water", "Ammonia", "Terraformable"]
        );
    }
}
