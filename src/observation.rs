use serde::{Deserialize, Serialize};

use crate::astrograph_errors::AstrographError;
use crate::constants::{Radian, MJD};
use crate::site::Site;
use crate::time::utc_to_mjd;

/// Metadata describing one observation: the telescope pointing, the rotation
/// of the focal plane on the sky, the observation date and the observing site.
///
/// Every field that a downstream operation may require is an explicit
/// `Option`; the typed accessors return a descriptive error naming the missing
/// field and the operation that needed it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationMetaData {
    /// Boresight right ascension before refraction [rad]
    pub unrefracted_ra: Option<Radian>,
    /// Boresight declination before refraction [rad]
    pub unrefracted_dec: Option<Radian>,
    /// Angle of the sky relative to camera coordinates [rad]
    pub rot_sky_pos: Option<Radian>,
    /// Observation date (UTC)
    pub mjd: Option<MJD>,
    /// Observing site parameters
    pub site: Site,
}

impl ObservationMetaData {
    /// Build metadata for a pointing at `(ra, dec)` with a given focal-plane
    /// rotation and observation date, at the default site.
    pub fn new(ra: Radian, dec: Radian, rot_sky_pos: Radian, mjd: MJD) -> Self {
        ObservationMetaData {
            unrefracted_ra: Some(ra),
            unrefracted_dec: Some(dec),
            rot_sky_pos: Some(rot_sky_pos),
            mjd: Some(mjd),
            site: Site::default(),
        }
    }

    /// Same as [`ObservationMetaData::new`] but taking the observation date as
    /// a UTC timestamp string (YYYY-MM-ddTHH:mm:ss).
    pub fn from_utc(
        ra: Radian,
        dec: Radian,
        rot_sky_pos: Radian,
        date: &str,
    ) -> Result<Self, AstrographError> {
        Ok(Self::new(ra, dec, rot_sky_pos, utc_to_mjd(date)?))
    }

    /// Observation date, or an error naming `operation` when absent.
    pub fn mjd_for(&self, operation: &'static str) -> Result<MJD, AstrographError> {
        self.mjd.ok_or(AstrographError::MissingMetadata {
            operation,
            field: "mjd",
        })
    }

    /// Focal-plane rotation angle, or an error naming `operation` when absent.
    pub fn rot_sky_pos_for(&self, operation: &'static str) -> Result<Radian, AstrographError> {
        self.rot_sky_pos.ok_or(AstrographError::MissingMetadata {
            operation,
            field: "rotSkyPos",
        })
    }

    /// Boresight RA/Dec, or an error naming `operation` when either is absent.
    pub fn boresight_for(
        &self,
        operation: &'static str,
    ) -> Result<(Radian, Radian), AstrographError> {
        let ra = self.unrefracted_ra.ok_or(AstrographError::MissingMetadata {
            operation,
            field: "unrefractedRA",
        })?;
        let dec = self
            .unrefracted_dec
            .ok_or(AstrographError::MissingMetadata {
                operation,
                field: "unrefractedDec",
            })?;
        Ok((ra, dec))
    }
}
