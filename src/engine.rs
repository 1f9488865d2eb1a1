//! # Positional-astronomy capability interface
//!
//! The astrometric correction chain never reimplements precession models,
//! nutation series or refraction integration: every transform is delegated to
//! a positional-astronomy library through the [`AstrometryEngine`] trait
//! defined here. The trait names one capability per correction ("precession
//! and nutation", "space motion", "mean to apparent place", ...), so that the
//! public API in [`crate::astrometry`] depends on the capabilities and not on
//! the shape of any particular library.
//!
//! The default implementation is [`ErfaEngine`](crate::erfa::ErfaEngine),
//! backed by liberfa through the `erfa-sys` bindings.

use nalgebra::Matrix3;

use crate::astrograph_errors::AstrographError;
use crate::constants::{Angstrom, ArcSec, KmPerSec, Radian, MJD};
use crate::site::Site;

/// Catalog data for a single star, as fed to the space-motion correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStar {
    /// Right ascension [rad]
    pub ra: Radian,
    /// Declination [rad]
    pub dec: Radian,
    /// Proper motion in RA as sky velocity, cos(dec)·dRA/dt [rad/Julian year]
    pub pm_ra: f64,
    /// Proper motion in Dec [rad/Julian year]
    pub pm_dec: f64,
    /// Annual parallax [arcsec]
    pub parallax: ArcSec,
    /// Radial velocity, positive if receding [km/s]
    pub v_rad: KmPerSec,
}

/// Borrowed per-star motion arrays accompanying a catalog of positions.
///
/// All four slices must be as long as the RA/Dec arrays they accompany;
/// the callers in [`crate::astrometry`] validate this before any transform.
#[derive(Debug, Clone, Copy)]
pub struct StellarMotion<'a> {
    /// Proper motion in RA as sky velocity, cos(dec)·dRA/dt [rad/Julian year]
    pub pm_ra: &'a [f64],
    /// Proper motion in Dec [rad/Julian year]
    pub pm_dec: &'a [f64],
    /// Annual parallax [arcsec]
    pub parallax: &'a [ArcSec],
    /// Radial velocity, positive if receding [km/s]
    pub v_rad: &'a [KmPerSec],
}

/// Atmospheric conditions of the apparent-to-observed transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyConditions {
    /// Correct for atmospheric refraction. Disabling it zeroes the pressure
    /// and humidity fed to the library, which suppresses the refraction terms.
    pub include_refraction: bool,
    /// Observing wavelength [Å]
    pub wavelength: Angstrom,
}

impl Default for SkyConditions {
    fn default() -> Self {
        SkyConditions {
            include_refraction: true,
            wavelength: crate::constants::DEFAULT_WAVELENGTH,
        }
    }
}

/// Observed sky positions returned by the apparent-to-observed transform.
///
/// Altitude and azimuth come for free from the library call, so they are
/// always populated alongside the refracted RA/Dec.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedPlace {
    /// Observed right ascension [rad]
    pub ra: Vec<Radian>,
    /// Observed declination [rad]
    pub dec: Vec<Radian>,
    /// Altitude above the horizon [rad]
    pub alt: Vec<Radian>,
    /// Azimuth, north through east [rad]
    pub az: Vec<Radian>,
}

/// One capability per astrometric correction, implemented by a binding to a
/// SOFA-equivalent positional-astronomy library.
pub trait AstrometryEngine {
    /// Julian epoch corresponding to an MJD (pal `epj` analog).
    fn julian_epoch(&self, mjd: MJD) -> f64;

    /// Precession-nutation rotation matrix from the mean equinox of `epoch`
    /// (Julian years) to the true equinox of date `mjd` (IAU 2006/2000A).
    fn precession_nutation(&self, epoch: f64, mjd: MJD) -> Matrix3<f64>;

    /// Update a catalog position for proper motion, parallax and radial
    /// velocity between `epoch` (Julian years) and `mjd`.
    fn space_motion(
        &self,
        star: &CatalogStar,
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Radian, Radian), AstrographError>;

    /// Mean (catalog) place to geocentric apparent place: space motion,
    /// parallax, annual aberration and precession-nutation. Star-independent
    /// parameters are computed once for the whole array; stars whose motion
    /// terms are all negligible go through the motion-free fast path.
    fn mean_to_apparent(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        motion: Option<&StellarMotion<'_>>,
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError>;

    /// Apparent place to observed place: diurnal aberration and atmospheric
    /// refraction for the given site and conditions.
    fn apparent_to_observed(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        mjd: MJD,
        site: &Site,
        conditions: &SkyConditions,
    ) -> Result<ObservedPlace, AstrographError>;

    /// Refraction coefficients (A, B) of the quick ΔZ = A·tan z + B·tan³ z
    /// model, both in radians.
    fn refraction_constants(&self, site: &Site, wavelength: Angstrom) -> (f64, f64);

    /// ICRS equatorial to IAU 1958 galactic coordinates.
    fn equatorial_to_galactic(&self, ra: Radian, dec: Radian) -> (Radian, Radian);

    /// IAU 1958 galactic to ICRS equatorial coordinates.
    fn galactic_to_equatorial(&self, l: Radian, b: Radian) -> (Radian, Radian);

    /// Gnomonic projection of `(ra, dec)` onto the tangent plane at
    /// `(ra0, dec0)`, returning (ξ, η) in radians. Errors when the point is
    /// on the far side of the sphere.
    fn project_to_tangent_plane(
        &self,
        ra: Radian,
        dec: Radian,
        ra0: Radian,
        dec0: Radian,
    ) -> Result<(f64, f64), AstrographError>;

    /// Greenwich mean sidereal time [rad], normalized to [0, 2π).
    fn greenwich_mean_sidereal_time(&self, mjd: MJD) -> Radian;

    /// Horizon coordinates (altitude, azimuth) from hour angle, declination
    /// and site latitude.
    fn horizon_from_hour_angle(&self, ha: Radian, dec: Radian, lat: Radian) -> (Radian, Radian);

    /// Angular separation between two spherical positions [rad].
    fn angular_separation(
        &self,
        ra1: Radian,
        dec1: Radian,
        ra2: Radian,
        dec2: Radian,
    ) -> Radian;
}
