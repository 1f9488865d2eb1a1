//! # Camera geometry and chip lookup
//!
//! A [`Camera`] is a set of named rectangular detectors laid out in
//! focal-plane coordinates. Lookup routines map pupil coordinates, or
//! catalog RA/Dec run through the full correction chain, to the name of the
//! detector that would record them.

use serde::{Deserialize, Serialize};

use crate::astrograph_errors::{check_same_length, AstrographError};
use crate::astrometry::Astrometry;
use crate::constants::Radian;
use crate::engine::{AstrometryEngine, SkyConditions, StellarMotion};
use crate::observation::ObservationMetaData;

/// One detector: a named axis-aligned rectangle on the focal plane.
///
/// Center and size are in the same units as the focal-plane coordinates
/// produced by [`Astrometry::sky_to_focal_plane`] (radians of tangent-plane
/// arc).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub name: String,
    pub x_center: f64,
    pub y_center: f64,
    pub x_size: f64,
    pub y_size: f64,
}

impl Detector {
    pub fn new(name: impl Into<String>, x_center: f64, y_center: f64, x_size: f64, y_size: f64) -> Self {
        Detector {
            name: name.into(),
            x_center,
            y_center,
            x_size,
            y_size,
        }
    }

    /// Whether a focal-plane point falls on this detector. Edges count as on.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x_center).abs() <= self.x_size / 2.0
            && (y - self.y_center).abs() <= self.y_size / 2.0
    }
}

/// A camera: an ordered collection of detectors. When detectors overlap, the
/// first match in insertion order wins.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub name: String,
    detectors: Vec<Detector>,
}

impl Camera {
    pub fn new(name: impl Into<String>, detectors: Vec<Detector>) -> Self {
        Camera {
            name: name.into(),
            detectors,
        }
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    /// Name of the detector containing the focal-plane point, if any.
    pub fn chip_name(&self, x: f64, y: f64) -> Option<&str> {
        self.detectors
            .iter()
            .find(|d| d.contains(x, y))
            .map(|d| d.name.as_str())
    }
}

/// Map pupil (focal-plane) coordinates to detector names.
///
/// Arguments
/// ---------
/// * `x_pupils`, `y_pupils`: focal-plane coordinates
/// * `camera`: camera geometry; an error is raised when absent
///
/// Return
/// ------
/// * one entry per input point, `None` where the point falls on no detector.
pub fn find_chip_name_from_pupil_coords(
    x_pupils: &[f64],
    y_pupils: &[f64],
    camera: Option<&Camera>,
) -> Result<Vec<Option<String>>, AstrographError> {
    let camera = camera.ok_or(AstrographError::MissingCamera {
        operation: "find_chip_name_from_pupil_coords",
    })?;
    check_same_length("xPupils", x_pupils, "yPupils", y_pupils)?;

    Ok(x_pupils
        .iter()
        .zip(y_pupils.iter())
        .map(|(&x, &y)| camera.chip_name(x, y).map(str::to_owned))
        .collect())
}

impl<E: AstrometryEngine> Astrometry<E> {
    /// Map catalog RA/Dec to detector names: runs the full correction chain,
    /// projects onto the focal plane and looks each point up in the camera.
    ///
    /// Arguments
    /// ---------
    /// * `ra`, `dec`: catalog positions [rad]
    /// * `motion`: optional per-star motion arrays
    /// * `epoch`: catalog epoch in Julian years; required
    /// * `obs`: pointing metadata; required, with `mjd`, `rotSkyPos` and the
    ///   boresight all present
    /// * `camera`: camera geometry; required
    #[allow(clippy::too_many_arguments)]
    pub fn find_chip_name_from_ra_dec(
        &self,
        ra: &[Radian],
        dec: &[Radian],
        motion: Option<&StellarMotion<'_>>,
        epoch: Option<f64>,
        obs: Option<&ObservationMetaData>,
        camera: Option<&Camera>,
    ) -> Result<Vec<Option<String>>, AstrographError> {
        const OPERATION: &str = "find_chip_name_from_ra_dec";

        if camera.is_none() {
            return Err(AstrographError::MissingCamera {
                operation: OPERATION,
            });
        }
        check_same_length("RAs", ra, "Decs", dec)?;
        let epoch = epoch.ok_or(AstrographError::MissingEpoch {
            operation: OPERATION,
        })?;
        let obs = obs.ok_or(AstrographError::MissingObservationMetaData {
            operation: OPERATION,
        })?;
        obs.mjd_for(OPERATION)?;
        obs.rot_sky_pos_for(OPERATION)?;
        obs.boresight_for(OPERATION)?;

        let (ra_obs, dec_obs) = self.correct_coordinates(
            ra,
            dec,
            motion,
            obs,
            epoch,
            &SkyConditions::default(),
            false,
        )?;
        let (x, y) = self.sky_to_focal_plane(&ra_obs, &dec_obs, obs, epoch)?;
        find_chip_name_from_pupil_coords(&x, &y, camera)
    }
}

#[cfg(test)]
mod camera_test {
    use super::*;
    use crate::constants::{J2000_EPOCH, RADEG};

    fn test_camera() -> Camera {
        // A 2x1 mosaic centered on the boresight, chips 0.4 degrees across.
        let half = 0.4 * RADEG;
        Camera::new(
            "testCamera",
            vec![
                Detector::new("R:0,0 S:0,0", -half / 2.0, 0.0, half, half),
                Detector::new("R:0,0 S:1,0", half / 2.0, 0.0, half, half),
            ],
        )
    }

    #[test]
    fn test_detector_contains_edges() {
        let det = Detector::new("chip", 0.0, 0.0, 2.0, 2.0);
        assert!(det.contains(1.0, 1.0));
        assert!(det.contains(-1.0, 0.0));
        assert!(!det.contains(1.0001, 0.0));
    }

    #[test]
    fn test_chip_name_first_match_wins() {
        let camera = Camera::new(
            "overlap",
            vec![
                Detector::new("a", 0.0, 0.0, 2.0, 2.0),
                Detector::new("b", 0.5, 0.0, 2.0, 2.0),
            ],
        );
        assert_eq!(camera.chip_name(0.4, 0.0), Some("a"));
        assert_eq!(camera.chip_name(1.2, 0.0), Some("b"));
        assert_eq!(camera.chip_name(5.0, 0.0), None);
    }

    #[test]
    fn test_pupil_lookup_requires_camera() {
        let err = find_chip_name_from_pupil_coords(&[0.0], &[0.0], None).unwrap_err();
        assert_eq!(
            err,
            AstrographError::MissingCamera {
                operation: "find_chip_name_from_pupil_coords"
            }
        );
    }

    #[test]
    fn test_pupil_lookup_names_mismatched_arrays() {
        let camera = test_camera();
        let err =
            find_chip_name_from_pupil_coords(&[0.0, 0.1], &[0.0], Some(&camera)).unwrap_err();
        assert!(err.to_string().contains("xPupils"));
        assert!(err.to_string().contains("yPupils"));
    }

    #[test]
    fn test_pupil_lookup_off_chip_is_none() {
        let camera = test_camera();
        let names =
            find_chip_name_from_pupil_coords(&[0.0, 10.0 * RADEG], &[0.0, 0.0], Some(&camera))
                .unwrap();
        assert_eq!(names[0].as_deref(), Some("R:0,0 S:0,0"));
        assert_eq!(names[1], None);
    }

    #[test]
    fn test_ra_dec_lookup_validation_order() {
        let astro = Astrometry::new();
        let camera = test_camera();
        let obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);

        let err = astro
            .find_chip_name_from_ra_dec(&[0.4], &[-0.5], None, Some(J2000_EPOCH), Some(&obs), None)
            .unwrap_err();
        assert_eq!(
            err,
            AstrographError::MissingCamera {
                operation: "find_chip_name_from_ra_dec"
            }
        );

        let err = astro
            .find_chip_name_from_ra_dec(
                &[0.4, 0.5],
                &[-0.5],
                None,
                Some(J2000_EPOCH),
                Some(&obs),
                Some(&camera),
            )
            .unwrap_err();
        assert!(err.to_string().contains("RAs"));
        assert!(err.to_string().contains("Decs"));

        let err = astro
            .find_chip_name_from_ra_dec(&[0.4], &[-0.5], None, None, Some(&obs), Some(&camera))
            .unwrap_err();
        assert_eq!(
            err,
            AstrographError::MissingEpoch {
                operation: "find_chip_name_from_ra_dec"
            }
        );

        let err = astro
            .find_chip_name_from_ra_dec(
                &[0.4],
                &[-0.5],
                None,
                Some(J2000_EPOCH),
                None,
                Some(&camera),
            )
            .unwrap_err();
        assert_eq!(
            err,
            AstrographError::MissingObservationMetaData {
                operation: "find_chip_name_from_ra_dec"
            }
        );
    }

    #[test]
    fn test_ra_dec_lookup_requires_mjd_and_rotation() {
        let astro = Astrometry::new();
        let camera = test_camera();

        let mut obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);
        obs.mjd = None;
        let err = astro
            .find_chip_name_from_ra_dec(
                &[0.4],
                &[-0.5],
                None,
                Some(J2000_EPOCH),
                Some(&obs),
                Some(&camera),
            )
            .unwrap_err();
        assert!(err.to_string().contains("mjd"));

        let mut obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);
        obs.rot_sky_pos = None;
        let err = astro
            .find_chip_name_from_ra_dec(
                &[0.4],
                &[-0.5],
                None,
                Some(J2000_EPOCH),
                Some(&obs),
                Some(&camera),
            )
            .unwrap_err();
        assert!(err.to_string().contains("rotSkyPos"));
    }

    #[test]
    fn test_boresight_lands_on_a_chip() {
        let astro = Astrometry::new();
        let camera = test_camera();
        let obs = ObservationMetaData::new(25.0 * RADEG, -30.0 * RADEG, 0.0, 59580.0);

        let names = astro
            .find_chip_name_from_ra_dec(
                &[25.0 * RADEG],
                &[-30.0 * RADEG],
                None,
                Some(J2000_EPOCH),
                Some(&obs),
                Some(&camera),
            )
            .unwrap();
        // The boresight maps to the focal-plane origin, on the seam between
        // the two chips; the first detector wins.
        assert_eq!(names[0].as_deref(), Some("R:0,0 S:0,0"));
    }
}
