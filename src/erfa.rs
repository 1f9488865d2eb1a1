//! # ERFA backend
//!
//! [`ErfaEngine`] implements [`AstrometryEngine`] on top of liberfa through
//! the `erfa-sys` bindings. Every method is a thin marshaling layer around
//! one or two ERFA routines; all `unsafe` in the crate lives in this module.
//!
//! Routine mapping (PAL heritage → ERFA):
//! - `prenut` → `eraPnm06a` / `eraPmat06`
//! - `pm`     → `eraStarpm`
//! - `mappa` / `mapqk(z)` → `eraApci13` / `eraAtciq(z)`
//! - `aoppa` / `aopqk`    → `eraApio13` / `eraAtioq`
//! - `refco`  → `eraRefco`
//! - `ds2tp`  → `eraTpxes`
//! - `eqgal` / `galeq` → `eraIcrs2g` / `eraG2icrs`
//! - `de2h`   → `eraHd2ae`
//! - `gmsta`  → `eraGmst82`

use itertools::izip;
use log::warn;
use nalgebra::Matrix3;

use crate::astrograph_errors::AstrographError;
use crate::astrometry::{cartesian_to_spherical, spherical_to_cartesian};
use crate::constants::{
    Angstrom, Radian, DUT1, J2000_EPOCH, JDTOMJD, MIN_PARALLAX, MJD, MOTION_TOLERANCE,
};
use crate::engine::{AstrometryEngine, CatalogStar, ObservedPlace, SkyConditions, StellarMotion};
use crate::site::Site;

/// Wavelength in Ångström → micrometers, the unit ERFA expects.
fn wavelength_um(wavelength: Angstrom) -> f64 {
    wavelength * 1.0e-4
}

/// Convert a row-major C 3×3 matrix into a nalgebra [`Matrix3`].
fn matrix_from_c(m: &[[f64; 3]; 3]) -> Matrix3<f64> {
    Matrix3::new(
        m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
    )
}

/// Two-part Julian date of a Julian epoch (e.g. 2000.0), via `eraEpj2jd`.
fn julian_epoch_to_jd(epoch: f64) -> (f64, f64) {
    let mut djm0 = 0.0;
    let mut djm = 0.0;
    unsafe { erfa_sys::eraEpj2jd(epoch, &mut djm0, &mut djm) };
    (djm0, djm)
}

/// Bias-precession matrix GCRS → mean equinox of `epoch` (IAU 2006).
fn bias_precession(epoch: f64) -> Matrix3<f64> {
    let (djm0, djm) = julian_epoch_to_jd(epoch);
    let mut rbp = [[0.0f64; 3]; 3];
    unsafe { erfa_sys::eraPmat06(djm0, djm, rbp.as_mut_ptr() as *mut _) };
    matrix_from_c(&rbp)
}

/// The liberfa-backed astrometry engine.
///
/// Stateless: every method recomputes what it needs from its arguments, so a
/// single instance can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErfaEngine;

impl ErfaEngine {
    pub fn new() -> Self {
        ErfaEngine
    }

    /// Star-independent parameters of the apparent-to-observed transform
    /// (pal `aoppa` analog). Disabling refraction zeroes the pressure and
    /// humidity so the refraction constants vanish.
    fn observed_params(
        &self,
        mjd: MJD,
        site: &Site,
        conditions: &SkyConditions,
    ) -> Result<erfa_sys::eraASTROM, AstrographError> {
        let (pressure, humidity) = if conditions.include_refraction {
            (site.mean_pressure, site.mean_humidity)
        } else {
            (0.0, 0.0)
        };

        // TODO: source dut1 from IERS Bulletin A instead of a fixed offset.
        let mut astrom: erfa_sys::eraASTROM = unsafe { std::mem::zeroed() };
        let status = unsafe {
            erfa_sys::eraApio13(
                JDTOMJD,
                mjd,
                DUT1,
                site.longitude,
                site.latitude,
                site.height,
                site.x_polar,
                site.y_polar,
                pressure,
                site.temperature_celsius(),
                humidity,
                wavelength_um(conditions.wavelength),
                &mut astrom as *mut _,
            )
        };
        if status < 0 {
            return Err(AstrographError::ErfaStatus {
                routine: "eraApio13",
                status,
            });
        }
        if status > 0 {
            warn!("eraApio13 flagged a dubious date (mjd = {mjd}, status = {status})");
        }
        Ok(astrom)
    }
}

impl AstrometryEngine for ErfaEngine {
    fn julian_epoch(&self, mjd: MJD) -> f64 {
        unsafe { erfa_sys::eraEpj(JDTOMJD, mjd) }
    }

    fn precession_nutation(&self, epoch: f64, mjd: MJD) -> Matrix3<f64> {
        let mut rbpn = [[0.0f64; 3]; 3];
        unsafe { erfa_sys::eraPnm06a(JDTOMJD, mjd, rbpn.as_mut_ptr() as *mut _) };
        let to_true_of_date = matrix_from_c(&rbpn);

        // Undo the bias-precession leg so the matrix starts from the mean
        // equinox of the requested catalog epoch rather than the GCRS.
        to_true_of_date * bias_precession(epoch).transpose()
    }

    fn space_motion(
        &self,
        star: &CatalogStar,
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Radian, Radian), AstrographError> {
        // The catalog convention is sky velocity (cos δ · dRA/dt); ERFA wants
        // dRA/dt. At the poles the RA component is meaningless, drop it.
        let cos_dec = star.dec.cos();
        let pmr = if cos_dec.abs() > 1.0e-12 {
            star.pm_ra / cos_dec
        } else {
            0.0
        };
        let px = star.parallax.max(MIN_PARALLAX);

        let (ep1a, ep1b) = julian_epoch_to_jd(epoch);
        let mut ra2 = 0.0;
        let mut dec2 = 0.0;
        let mut pmr2 = 0.0;
        let mut pmd2 = 0.0;
        let mut px2 = 0.0;
        let mut rv2 = 0.0;
        let status = unsafe {
            erfa_sys::eraStarpm(
                star.ra, star.dec, pmr, star.pm_dec, px, star.v_rad, ep1a, ep1b, JDTOMJD, mjd,
                &mut ra2, &mut dec2, &mut pmr2, &mut pmd2, &mut px2, &mut rv2,
            )
        };
        if status < 0 || status & 4 != 0 {
            return Err(AstrographError::ErfaStatus {
                routine: "eraStarpm",
                status,
            });
        }
        if status != 0 {
            warn!("eraStarpm adjusted its solution (status = {status})");
        }
        Ok((ra2, dec2))
    }

    fn mean_to_apparent(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        motion: Option<&StellarMotion<'_>>,
        epoch: f64,
        mjd: MJD,
    ) -> Result<(Vec<Radian>, Vec<Radian>), AstrographError> {
        // Star-independent parameters, computed once per array (pal `mappa`).
        let mut astrom: erfa_sys::eraASTROM = unsafe { std::mem::zeroed() };
        let mut eo = 0.0;
        unsafe { erfa_sys::eraApci13(JDTOMJD, mjd, &mut astrom as *mut _, &mut eo) };

        // Catalogs referred to a mean equinox other than J2000 are rotated
        // back to the ICRS before the per-star transform.
        let rotate_to_icrs = if (epoch - J2000_EPOCH).abs() > 1.0e-7 {
            Some(bias_precession(epoch).transpose())
        } else {
            None
        };

        let mut ra_out = Vec::with_capacity(ra.len());
        let mut dec_out = Vec::with_capacity(ra.len());

        for (i, (&r, &d)) in ra.iter().zip(dec.iter()).enumerate() {
            let (rc, dc) = match &rotate_to_icrs {
                Some(rot) => {
                    let xyz = rot * spherical_to_cartesian(r, d);
                    cartesian_to_spherical(&xyz)
                }
                None => (r, d),
            };

            let (pm_ra, pm_dec, px, rv) = match motion {
                Some(m) => (m.pm_ra[i], m.pm_dec[i], m.parallax[i], m.v_rad[i]),
                None => (0.0, 0.0, 0.0, 0.0),
            };

            let mut ri = 0.0;
            let mut di = 0.0;
            let moving = pm_ra.abs() > MOTION_TOLERANCE
                || pm_dec.abs() > MOTION_TOLERANCE
                || px.abs() > MOTION_TOLERANCE
                || rv.abs() > MOTION_TOLERANCE;
            if moving {
                let cos_dec = dc.cos();
                let pr = if cos_dec.abs() > 1.0e-12 {
                    pm_ra / cos_dec
                } else {
                    0.0
                };
                unsafe {
                    erfa_sys::eraAtciq(
                        rc, dc, pr, pm_dec, px, rv, &mut astrom as *mut _, &mut ri, &mut di,
                    )
                };
            } else {
                unsafe { erfa_sys::eraAtciqz(rc, dc, &mut astrom as *mut _, &mut ri, &mut di) };
            }
            ra_out.push(ri);
            dec_out.push(di);
        }

        Ok((ra_out, dec_out))
    }

    fn apparent_to_observed(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        mjd: MJD,
        site: &Site,
        conditions: &SkyConditions,
    ) -> Result<ObservedPlace, AstrographError> {
        let mut astrom = self.observed_params(mjd, site, conditions)?;

        let mut out = ObservedPlace {
            ra: Vec::with_capacity(ra.len()),
            dec: Vec::with_capacity(ra.len()),
            alt: Vec::with_capacity(ra.len()),
            az: Vec::with_capacity(ra.len()),
        };

        for (&ri, &di) in izip!(ra, dec) {
            let mut aob = 0.0;
            let mut zob = 0.0;
            let mut hob = 0.0;
            let mut dob = 0.0;
            let mut rob = 0.0;
            unsafe {
                erfa_sys::eraAtioq(
                    ri, di, &mut astrom as *mut _, &mut aob, &mut zob, &mut hob, &mut dob,
                    &mut rob,
                )
            };
            out.ra.push(rob);
            out.dec.push(dob);
            out.alt.push(std::f64::consts::FRAC_PI_2 - zob);
            out.az.push(aob);
        }

        Ok(out)
    }

    fn refraction_constants(&self, site: &Site, wavelength: Angstrom) -> (f64, f64) {
        let mut refa = 0.0;
        let mut refb = 0.0;
        unsafe {
            erfa_sys::eraRefco(
                site.mean_pressure,
                site.temperature_celsius(),
                site.mean_humidity,
                wavelength_um(wavelength),
                &mut refa,
                &mut refb,
            )
        };
        (refa, refb)
    }

    fn equatorial_to_galactic(&self, ra: Radian, dec: Radian) -> (Radian, Radian) {
        let mut l = 0.0;
        let mut b = 0.0;
        unsafe { erfa_sys::eraIcrs2g(ra, dec, &mut l, &mut b) };
        (l, b)
    }

    fn galactic_to_equatorial(&self, l: Radian, b: Radian) -> (Radian, Radian) {
        let mut ra = 0.0;
        let mut dec = 0.0;
        unsafe { erfa_sys::eraG2icrs(l, b, &mut ra, &mut dec) };
        (ra, dec)
    }

    fn project_to_tangent_plane(
        &self,
        ra: Radian,
        dec: Radian,
        ra0: Radian,
        dec0: Radian,
    ) -> Result<(f64, f64), AstrographError> {
        let mut xi = 0.0;
        let mut eta = 0.0;
        let status = unsafe { erfa_sys::eraTpxes(ra, dec, ra0, dec0, &mut xi, &mut eta) };
        if status != 0 {
            return Err(AstrographError::ErfaStatus {
                routine: "eraTpxes",
                status,
            });
        }
        Ok((xi, eta))
    }

    fn greenwich_mean_sidereal_time(&self, mjd: MJD) -> Radian {
        unsafe { erfa_sys::eraAnp(erfa_sys::eraGmst82(JDTOMJD, mjd)) }
    }

    fn horizon_from_hour_angle(&self, ha: Radian, dec: Radian, lat: Radian) -> (Radian, Radian) {
        let mut az = 0.0;
        let mut el = 0.0;
        unsafe { erfa_sys::eraHd2ae(ha, dec, lat, &mut az, &mut el) };
        (el, az)
    }

    fn angular_separation(&self, ra1: Radian, dec1: Radian, ra2: Radian, dec2: Radian) -> Radian {
        unsafe { erfa_sys::eraSeps(ra1, dec1, ra2, dec2) }
    }
}
