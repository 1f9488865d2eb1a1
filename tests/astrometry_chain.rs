use approx::assert_relative_eq;

use astrograph::astrometry::{parallactic_angle, Astrometry};
use astrograph::constants::{DPI, J2000_EPOCH, RADEG};
use astrograph::engine::{SkyConditions, StellarMotion};
use astrograph::observation::ObservationMetaData;
use astrograph::site::Site;

#[test]
fn corrected_coordinates_stay_close_to_the_catalog_position() {
    let astro = Astrometry::new();
    let obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);

    let ra = [25.0 * RADEG, 25.3 * RADEG];
    let dec = [-30.0 * RADEG, -29.8 * RADEG];
    let (ra_obs, dec_obs) = astro
        .correct_coordinates(
            &ra,
            &dec,
            None,
            &obs,
            J2000_EPOCH,
            &SkyConditions::default(),
            false,
        )
        .unwrap();

    // Precession over two decades plus aberration and refraction move a
    // position by arcminutes, never by a degree.
    let sep = astro
        .angular_separation(&ra, &dec, &ra_obs, &dec_obs)
        .unwrap();
    for s in sep {
        assert!(s > 1.0e-6, "separation {s} suspiciously small");
        assert!(s < 1.0 * RADEG, "separation {s} suspiciously large");
    }
}

#[test]
fn degree_output_matches_radian_output() {
    let astro = Astrometry::new();
    let obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);

    let ra = [25.1 * RADEG];
    let dec = [-29.9 * RADEG];
    let conditions = SkyConditions::default();
    let (ra_rad, dec_rad) = astro
        .correct_coordinates(&ra, &dec, None, &obs, J2000_EPOCH, &conditions, false)
        .unwrap();
    let (ra_deg, dec_deg) = astro
        .correct_coordinates(&ra, &dec, None, &obs, J2000_EPOCH, &conditions, true)
        .unwrap();

    assert_relative_eq!(ra_deg[0], ra_rad[0] / RADEG, epsilon = 1e-12);
    assert_relative_eq!(dec_deg[0], dec_rad[0] / RADEG, epsilon = 1e-12);
}

#[test]
fn correct_coordinates_requires_mjd() {
    let astro = Astrometry::new();
    let obs = ObservationMetaData {
        unrefracted_ra: Some(0.4),
        unrefracted_dec: Some(-0.5),
        rot_sky_pos: Some(0.0),
        mjd: None,
        site: Site::default(),
    };
    let err = astro
        .correct_coordinates(
            &[0.4],
            &[-0.5],
            None,
            &obs,
            J2000_EPOCH,
            &SkyConditions::default(),
            false,
        )
        .unwrap_err();
    assert!(err.to_string().contains("mjd"));
    assert!(err.to_string().contains("correct_coordinates"));
}

#[test]
fn proper_motion_shifts_the_corrected_position() {
    let astro = Astrometry::new();
    let obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);
    let conditions = SkyConditions::default();

    let ra = [25.0 * RADEG];
    let dec = [-30.0 * RADEG];
    // Barnard's-star-scale motion: ~10 arcsec/yr in declination.
    let pm_dec = [10.0 / 3600.0 * RADEG];
    let motion = StellarMotion {
        pm_ra: &[0.0],
        pm_dec: &pm_dec,
        parallax: &[0.5],
        v_rad: &[-100.0],
    };

    let (ra_still, dec_still) = astro
        .correct_coordinates(&ra, &dec, None, &obs, J2000_EPOCH, &conditions, false)
        .unwrap();
    let (ra_moving, dec_moving) = astro
        .correct_coordinates(&ra, &dec, Some(&motion), &obs, J2000_EPOCH, &conditions, false)
        .unwrap();

    let sep = astro
        .angular_separation(&ra_still, &dec_still, &ra_moving, &dec_moving)
        .unwrap();
    // 21.7 years of motion, within a generous bracket.
    let arcsec = sep[0] * 3600.0 / RADEG;
    assert!(
        (150.0..300.0).contains(&arcsec),
        "proper motion moved the star by {arcsec} arcsec"
    );
}

#[test]
fn galactic_center_is_in_sagittarius() {
    let astro = Astrometry::new();
    let (ra, dec) = astro.galactic_to_equatorial(&[0.0], &[0.0]).unwrap();
    assert_relative_eq!(ra[0] / RADEG, 266.405, epsilon = 0.1);
    assert_relative_eq!(dec[0] / RADEG, -28.936, epsilon = 0.1);

    let (l, b) = astro.equatorial_to_galactic(&ra, &dec).unwrap();
    // l may come back as a tiny angle on either side of zero.
    assert_relative_eq!(l[0].sin(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(b[0], 0.0, epsilon = 1e-9);
}

#[test]
fn star_on_the_meridian_culminates() {
    let astro = Astrometry::new();
    let site = Site::default();
    let mjd = 59580.2;

    // A star at the site latitude crossing the meridian sits at the zenith.
    let lst = astro.local_sidereal_time(mjd, site.longitude);
    let (alt, _) = astro
        .equatorial_to_horizontal(&[lst], &[site.latitude], mjd, &site)
        .unwrap();
    assert_relative_eq!(alt[0], std::f64::consts::FRAC_PI_2, epsilon = 1e-9);

    // A star crossing the meridian south of the zenith has azimuth due south
    // and zero parallactic angle.
    let dec = site.latitude - 10.0 * RADEG;
    let (_, az) = astro
        .equatorial_to_horizontal(&[lst], &[dec], mjd, &site)
        .unwrap();
    assert_relative_eq!(az[0], std::f64::consts::PI, epsilon = 1e-9);
    assert_relative_eq!(parallactic_angle(az[0], dec, site.latitude), 0.0, epsilon = 1e-6);
}

#[test]
fn precession_scales_with_the_epoch_gap() {
    let astro = Astrometry::new();
    let ra = [1.1, 2.2];
    let dec = [-0.3, 0.9];

    // At the catalog epoch itself only the nutation leg remains, a rotation
    // of at most ~20 arcsec.
    let t2000 = astrograph::constants::T2000;
    let (ra_n, dec_n) = astro.apply_precession(&ra, &dec, J2000_EPOCH, t2000).unwrap();
    let sep = astro.angular_separation(&ra, &dec, &ra_n, &dec_n).unwrap();
    for s in &sep {
        assert!(*s < 25.0 / 3600.0 * RADEG, "nutation-only shift is {s}");
    }

    // Two decades later the displacement is dominated by precession, on the
    // order of arcminutes but well under a degree.
    let (ra_p, dec_p) = astro
        .apply_precession(&ra, &dec, J2000_EPOCH, 60000.0)
        .unwrap();
    let sep = astro.angular_separation(&ra, &dec, &ra_p, &dec_p).unwrap();
    for s in &sep {
        assert!(*s > 30.0 / 3600.0 * RADEG, "precession shift is only {s}");
        assert!(*s < 1.0 * RADEG, "precession shift is {s}");
    }
}

#[test]
fn refraction_toggle_changes_the_observed_place() {
    let astro = Astrometry::new();
    let site = Site::default();
    let mjd = 59580.2;

    let lst = astro.local_sidereal_time(mjd, site.longitude);
    let ra = [(lst + 0.3).rem_euclid(DPI)];
    let dec = [-50.0 * RADEG];

    let refracted = astro
        .mean_observed_place(&ra, &dec, mjd, &site, &SkyConditions::default())
        .unwrap();
    let unrefracted = astro
        .mean_observed_place(
            &ra,
            &dec,
            mjd,
            &site,
            &SkyConditions {
                include_refraction: false,
                wavelength: 5000.0,
            },
        )
        .unwrap();

    assert!(refracted.alt[0] > unrefracted.alt[0]);
    // Azimuth is unaffected by refraction.
    assert_relative_eq!(refracted.az[0], unrefracted.az[0], epsilon = 1e-9);
}
