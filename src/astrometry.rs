//! # Catalog astrometry API
//!
//! [`Astrometry`] is the host-facing surface of the crate: array-oriented
//! routines that take catalog RA/Dec (plus optional proper motion, parallax
//! and radial velocity) and run them through the standard correction chain.
//! Each routine validates its input shapes and then delegates the actual
//! positional astronomy to an [`AstrometryEngine`].

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::astrograph_errors::{check_same_length, AstrographError};
use crate::constants::{Angstrom, Radian, DPI, MOTION_TOLERANCE, RADEG, MJD};
use crate::engine::{AstrometryEngine, CatalogStar, ObservedPlace, SkyConditions, StellarMotion};
use crate::erfa::ErfaEngine;
use crate::observation::ObservationMetaData;
use crate::site::Site;

/// Transform spherical coordinates to a Cartesian unit vector.
pub fn spherical_to_cartesian(longitude: Radian, latitude: Radian) -> Vector3<f64> {
    let cos_lat = latitude.cos();
    Vector3::new(
        longitude.cos() * cos_lat,
        longitude.sin() * cos_lat,
        latitude.sin(),
    )
}

/// Transform a Cartesian vector back to spherical coordinates.
///
/// Return
/// ------
/// * `(longitude, latitude)` in radians, longitude normalized to [0, 2π).
///   The zero vector maps to `(0, 0)`.
pub fn cartesian_to_spherical(xyz: &Vector3<f64>) -> (Radian, Radian) {
    let norm = xyz.norm();
    if norm == 0.0 {
        return (0.0, 0.0);
    }
    let latitude = (xyz.z / norm).asin();
    let longitude = xyz.y.atan2(xyz.x);
    let longitude = if longitude < 0.0 {
        longitude + DPI
    } else {
        longitude
    };
    (longitude, latitude)
}

/// Rotation matrix carrying the unit vector `v1` onto `v2` (axis-angle).
///
/// Returns `None` when the two directions are exactly opposite and the axis
/// is undefined.
pub fn rotation_matrix_from_vectors(v1: &Vector3<f64>, v2: &Vector3<f64>) -> Option<Matrix3<f64>> {
    Rotation3::rotation_between(v1, v2).map(|r| r.into())
}

/// Refracted zenith distance from the quick two-coefficient model.
///
/// Arguments
/// ---------
/// * `zenith`: unrefracted zenith distance [rad]
/// * `refa`, `refb`: the tan z and tan³ z coefficients from
///   [`Astrometry::refraction_coefficients`]
///
/// The model is good for zenith distances below about 76 degrees.
pub fn apply_refraction(zenith: Radian, refa: f64, refb: f64) -> Radian {
    let t = zenith.tan();
    zenith - (refa * t + refb * t.powi(3))
}

/// Parallactic angle between the zenith and the visible celestial pole.
///
/// Positive in the east, negative in the west, for azimuth measured from
/// north through east.
pub fn parallactic_angle(az: Radian, dec: Radian, latitude: Radian) -> Radian {
    (az.sin() * latitude.cos() / dec.cos()).asin()
}

/// The astrometric correction chain, generic over the positional-astronomy
/// backend. `Astrometry::new()` uses the liberfa engine.
#[derive(Debug, Clone, Default)]
pub struct Astrometry<E = ErfaEngine> {
    engine: E,
}

impl Astrometry<ErfaEngine> {
    pub fn new() -> Self {
        Astrometry {
            engine: ErfaEngine::new(),
        }
    }
}

impl<E: AstrometryEngine> Astrometry<E> {
    pub fn with_engine(engine: E) -> Self {
        Astrometry { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Apply precession and nutation between two epochs.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: mean positions at `epoch` [rad]
    /// * `epoch`: catalog epoch in Julian years (e.g. 2000.0)
    /// * `mjd`: target date
    ///
    /// Return
    /// ------
    /// * positions referred to the true equator and equinox of `mjd`, using
    ///   the IAU 2006/2000A precession-nutation model.
    pub fn apply_precession(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        check_same_length("ra", ra, "dec", dec)?;

        let rot = self.engine.precession_nutation(epoch, mjd);
        let mut ra_out = Vec::with_capacity(ra.len());
        let mut dec_out = Vec::with_capacity(ra.len());
        for (&r, &d) in ra.iter().zip(dec.iter()) {
            let xyz = rot * spherical_to_cartesian(r, d);
            let (r_out, d_out) = cartesian_to_spherical(&xyz);
            ra_out.push(r_out);
            dec_out.push(d_out);
        }
        Ok((ra_out, dec_out))
    }

    /// Apply proper motion, parallax and radial velocity between two epochs.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: catalog positions at `epoch` [rad]
    /// * `pm_ra`: proper motion in RA as sky velocity, cos(dec)·dRA/dt [rad/yr]
    /// * `pm_dec`: proper motion in Dec [rad/yr]
    /// * `parallax`: annual parallax [arcsec]; values below the minimum the
    ///   library accepts are clamped
    /// * `v_rad`: radial velocity, positive if receding [km/s]
    /// * `epoch`: catalog epoch in Julian years
    /// * `mjd`: target date
    ///
    /// Stars whose proper motion is negligible in both components pass
    /// through unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_proper_motion(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        pm_ra: &[f64],
        pm_dec: &[f64],
        parallax: &[f64],
        v_rad: &[f64],
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        check_same_length("ra", ra, "dec", dec)?;
        check_same_length("ra", ra, "pm_ra", pm_ra)?;
        check_same_length("ra", ra, "pm_dec", pm_dec)?;
        check_same_length("ra", ra, "parallax", parallax)?;
        check_same_length("ra", ra, "v_rad", v_rad)?;

        let mut ra_out = Vec::with_capacity(ra.len());
        let mut dec_out = Vec::with_capacity(ra.len());
        for i in 0..ra.len() {
            if pm_ra[i].abs() <= MOTION_TOLERANCE && pm_dec[i].abs() <= MOTION_TOLERANCE {
                ra_out.push(ra[i]);
                dec_out.push(dec[i]);
                continue;
            }
            let star = CatalogStar {
                ra: ra[i],
                dec: dec[i],
                pm_ra: pm_ra[i],
                pm_dec: pm_dec[i],
                parallax: parallax[i],
                v_rad: v_rad[i],
            };
            let (r_out, d_out) = self.engine.space_motion(&star, epoch, mjd)?;
            ra_out.push(r_out);
            dec_out.push(d_out);
        }
        Ok((ra_out, dec_out))
    }

    /// Mean (catalog) place to geocentric apparent place.
    ///
    /// Corrects for space motion, parallax, annual aberration and
    /// precession-nutation. `motion` may be omitted for objects without
    /// measured proper motion (e.g. galaxies).
    pub fn mean_apparent_place(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        motion: Option<&StellarMotion<'_>>,
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        check_same_length("ra", ra, "dec", dec)?;
        if let Some(m) = motion {
            check_same_length("ra", ra, "pm_ra", m.pm_ra)?;
            check_same_length("ra", ra, "pm_dec", m.pm_dec)?;
            check_same_length("ra", ra, "parallax", m.parallax)?;
            check_same_length("ra", ra, "v_rad", m.v_rad)?;
        }
        self.engine.mean_to_apparent(ra, dec, motion, epoch, mjd)
    }

    /// Apparent place to observed place: diurnal aberration and atmospheric
    /// refraction at the given site. Altitude and azimuth are returned
    /// alongside the refracted RA/Dec.
    pub fn mean_observed_place(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        mjd: MJD,
        site: &Site,
        conditions: &SkyConditions,
    ) -> Result<ObservedPlace, AstrographError> {
        check_same_length("ra", ra, "dec", dec)?;
        self.engine
            .apparent_to_observed(ra, dec, mjd, site, conditions)
    }

    /// Correct coordinates for all supported effects: precession-nutation,
    /// aberration, proper motion, parallax, radial velocity, diurnal
    /// aberration and (optionally) refraction.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: catalog positions [rad]
    /// * `motion`: optional per-star motion arrays
    /// * `obs`: observation metadata; `mjd` is required
    /// * `epoch`: catalog epoch in Julian years
    /// * `conditions`: refraction toggle and observing wavelength
    /// * `in_degrees`: convert the output to degrees
    #[allow(clippy::too_many_arguments)]
    pub fn correct_coordinates(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        motion: Option<&StellarMotion<'_>>,
        obs: &ObservationMetaData,
        epoch: f64,
        conditions: &SkyConditions,
        in_degrees: bool,
    ) -> Result<(Vec<f64>, Vec<f64>), AstrographError> {
        let mjd = obs.mjd_for("correct_coordinates")?;

        let (ra_app, dec_app) = self.mean_apparent_place(ra, dec, motion, epoch, mjd)?;
        let observed =
            self.mean_observed_place(&ra_app, &dec_app, mjd, &obs.site, conditions)?;

        if in_degrees {
            Ok((
                observed.ra.iter().map(|r| r / RADEG).collect(),
                observed.dec.iter().map(|d| d / RADEG).collect(),
            ))
        } else {
            Ok((observed.ra, observed.dec))
        }
    }

    /// Refraction coefficients for the quick tan z / tan³ z model, to be fed
    /// to [`apply_refraction`].
    pub fn refraction_coefficients(&self, site: &Site, wavelength: Angstrom) -> (f64, f64) {
        self.engine.refraction_constants(site, wavelength)
    }

    /// Convert ICRS equatorial positions to galactic coordinates.
    pub fn equatorial_to_galactic(
        &self,
        ra: &[Radian],
        dec: &[Radian],
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        check_same_length("ra", ra, "dec", dec)?;
        let (mut l_out, mut b_out) = (Vec::with_capacity(ra.len()), Vec::with_capacity(ra.len()));
        for (&r, &d) in ra.iter().zip(dec.iter()) {
            let (l, b) = self.engine.equatorial_to_galactic(r, d);
            l_out.push(l);
            b_out.push(b);
        }
        Ok((l_out, b_out))
    }

    /// Convert galactic coordinates to ICRS equatorial positions.
    pub fn galactic_to_equatorial(
        &self,
        l: &[Radian],
        b: &[Radian],
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        check_same_length("gLon", l, "gLat", b)?;
        let (mut ra_out, mut dec_out) =
            (Vec::with_capacity(l.len()), Vec::with_capacity(l.len()));
        for (&gl, &gb) in l.iter().zip(b.iter()) {
            let (r, d) = self.engine.galactic_to_equatorial(gl, gb);
            ra_out.push(r);
            dec_out.push(d);
        }
        Ok((ra_out, dec_out))
    }

    /// Local mean sidereal time: GMST plus the site longitude, normalized to
    /// [0, 2π).
    pub fn local_sidereal_time(&self, mjd: MJD, longitude: Radian) -> Radian {
        (self.engine.greenwich_mean_sidereal_time(mjd) + longitude).rem_euclid(DPI)
    }

    /// Convert equatorial positions to horizon coordinates at the given date.
    ///
    /// Return
    /// ------
    /// * `(altitude, azimuth)` arrays in radians.
    pub fn equatorial_to_horizontal(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        mjd: MJD,
        site: &Site,
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        check_same_length("ra", ra, "dec", dec)?;
        let lst = self.local_sidereal_time(mjd, site.longitude);
        let (mut alt_out, mut az_out) =
            (Vec::with_capacity(ra.len()), Vec::with_capacity(ra.len()));
        for (&r, &d) in ra.iter().zip(dec.iter()) {
            let (alt, az) = self.engine.horizon_from_hour_angle(lst - r, d, site.latitude);
            alt_out.push(alt);
            az_out.push(az);
        }
        Ok((alt_out, az_out))
    }

    /// Angular separation between two sets of spherical positions.
    pub fn angular_separation(
        &self,
        ra1: &[Radian],
        dec1: &[Radian],
        ra2: &[Radian],
        dec2: &[Radian],
    ) -> Result<Vec<Radian>, AstrographError> {
        check_same_length("ra1", ra1, "dec1", dec1)?;
        check_same_length("ra1", ra1, "ra2", ra2)?;
        check_same_length("ra2", ra2, "dec2", dec2)?;
        Ok(ra1
            .iter()
            .zip(dec1.iter())
            .zip(ra2.iter().zip(dec2.iter()))
            .map(|((&a1, &d1), (&a2, &d2))| self.engine.angular_separation(a1, d1, a2, d2))
            .collect())
    }
}
