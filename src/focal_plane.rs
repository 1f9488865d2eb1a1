//! # Sky to focal-plane mapping
//!
//! Gnomonic projection of observed sky positions onto the camera focal
//! plane. The tangent point is the observed place of the boresight, so the
//! full correction chain (apparent place, diurnal aberration, refraction)
//! runs on the pointing before any star is projected.

use log::debug;

use crate::astrograph_errors::{check_same_length, AstrographError};
use crate::astrometry::Astrometry;
use crate::constants::Radian;
use crate::engine::{AstrometryEngine, SkyConditions, StellarMotion};
use crate::observation::ObservationMetaData;

impl<E: AstrometryEngine> Astrometry<E> {
    /// Project observed sky positions onto the focal plane.
    ///
    /// Arguments
    /// ---------
    /// * `ra_observed`, `dec_observed`: observed positions, i.e. the output of
    ///   [`Astrometry::correct_coordinates`] in radians
    /// * `obs`: pointing metadata; the boresight, `mjd` and `rotSkyPos` are
    ///   all required
    /// * `epoch`: catalog epoch of the boresight coordinates in Julian years
    ///
    /// Return
    /// ------
    /// * `(x, y)` focal-plane coordinates in radians of tangent-plane arc,
    ///   rotated by `rotSkyPos` so that y points along the camera columns.
    ///   A position on the far side of the sphere from the tangent point is
    ///   reported as [`AstrographError::TangentPointTooFar`] with its index.
    pub fn sky_to_focal_plane(
        &self,
        ra_observed: &[Radian],
        dec_observed: &[Radian],
        obs: &ObservationMetaData,
        epoch: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), AstrographError> {
        check_same_length("raObserved", ra_observed, "decObserved", dec_observed)?;

        let theta = obs.rot_sky_pos_for("sky_to_focal_plane")?;
        let mjd = obs.mjd_for("sky_to_focal_plane")?;
        let (bore_ra, bore_dec) = obs.boresight_for("sky_to_focal_plane")?;

        // Observed place of the boresight is the tangent point.
        let (ra_app, dec_app) =
            self.engine()
                .mean_to_apparent(&[bore_ra], &[bore_dec], None, epoch, mjd)?;
        let pointing = self.engine().apparent_to_observed(
            &ra_app,
            &dec_app,
            mjd,
            &obs.site,
            &SkyConditions::default(),
        )?;
        let (true_ra, true_dec) = (pointing.ra[0], pointing.dec[0]);
        debug!(
            "tangent point ({true_ra}, {true_dec}) for boresight ({bore_ra}, {bore_dec}) at mjd {mjd}"
        );

        let (sin_t, cos_t) = theta.sin_cos();
        let mut x_out = Vec::with_capacity(ra_observed.len());
        let mut y_out = Vec::with_capacity(ra_observed.len());
        for (index, (&r, &d)) in ra_observed.iter().zip(dec_observed.iter()).enumerate() {
            let (xi, eta) = self
                .engine()
                .project_to_tangent_plane(r, d, true_ra, true_dec)
                .map_err(|_| AstrographError::TangentPointTooFar { index })?;
            x_out.push(xi * cos_t - eta * sin_t);
            y_out.push(xi * sin_t + eta * cos_t);
        }
        Ok((x_out, y_out))
    }

    /// Catalog positions straight to focal-plane coordinates: runs the full
    /// correction chain on the inputs and then projects.
    pub fn catalog_to_focal_plane(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        motion: Option<&StellarMotion<'_>>,
        obs: &ObservationMetaData,
        epoch: f64,
    ) -> Result<(Vec<f64>, Vec<f64>), AstrographError> {
        let (ra_obs, dec_obs) = self.correct_coordinates(
            ra,
            dec,
            motion,
            obs,
            epoch,
            &SkyConditions::default(),
            false,
        )?;
        self.sky_to_focal_plane(&ra_obs, &dec_obs, obs, epoch)
    }
}

#[cfg(test)]
mod focal_plane_test {
    use super::*;
    use crate::constants::{J2000_EPOCH, RADEG};
    use approx::assert_relative_eq;

    fn pointing() -> ObservationMetaData {
        ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0)
    }

    #[test]
    fn test_boresight_projects_near_origin() {
        let astro = Astrometry::new();
        let obs = pointing();
        let (ra_obs, dec_obs) = astro
            .correct_coordinates(
                &[25.0 * RADEG],
                &[-30.0 * RADEG],
                None,
                &obs,
                J2000_EPOCH,
                &SkyConditions::default(),
                false,
            )
            .unwrap();
        let (x, y) = astro
            .sky_to_focal_plane(&ra_obs, &dec_obs, &obs, J2000_EPOCH)
            .unwrap();
        assert_relative_eq!(x[0], 0.0, epsilon = 1e-8);
        assert_relative_eq!(y[0], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_rotation_swaps_axes() {
        let astro = Astrometry::new();
        let mut obs = pointing();

        // A star half a degree north of the boresight.
        let (ra_obs, dec_obs) = astro
            .correct_coordinates(
                &[25.0 * RADEG],
                &[-29.5 * RADEG],
                None,
                &obs,
                J2000_EPOCH,
                &SkyConditions::default(),
                false,
            )
            .unwrap();

        let (x0, y0) = astro
            .sky_to_focal_plane(&ra_obs, &dec_obs, &obs, J2000_EPOCH)
            .unwrap();
        obs.rot_sky_pos = Some(std::f64::consts::FRAC_PI_2);
        let (x90, y90) = astro
            .sky_to_focal_plane(&ra_obs, &dec_obs, &obs, J2000_EPOCH)
            .unwrap();

        assert_relative_eq!(x90[0], -y0[0], epsilon = 1e-10);
        assert_relative_eq!(y90[0], x0[0], epsilon = 1e-10);
    }

    #[test]
    fn test_missing_rot_sky_pos() {
        let astro = Astrometry::new();
        let mut obs = pointing();
        obs.rot_sky_pos = None;
        let err = astro
            .sky_to_focal_plane(&[0.4], &[-0.5], &obs, J2000_EPOCH)
            .unwrap_err();
        assert!(err.to_string().contains("rotSkyPos"));
        assert!(err.to_string().contains("sky_to_focal_plane"));
    }

    #[test]
    fn test_antipodal_star_names_its_index() {
        let astro = Astrometry::new();
        let obs = pointing();
        // First star is fine, second is on the far side of the sphere.
        let err = astro
            .sky_to_focal_plane(
                &[25.0 * RADEG, 205.0 * RADEG],
                &[-30.0 * RADEG, 30.0 * RADEG],
                &obs,
                J2000_EPOCH,
            )
            .unwrap_err();
        assert_eq!(err, AstrographError::TangentPointTooFar { index: 1 });
    }

    #[test]
    fn test_length_mismatch_names_observed_arrays() {
        let astro = Astrometry::new();
        let err = astro
            .sky_to_focal_plane(&[0.4, 0.5], &[-0.5], &pointing(), J2000_EPOCH)
            .unwrap_err();
        assert!(err.to_string().contains("raObserved"));
        assert!(err.to_string().contains("decObserved"));
    }
}
