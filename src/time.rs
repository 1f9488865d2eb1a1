use hifitime::Epoch;
use std::str::FromStr;

use crate::astrograph_errors::AstrographError;
use crate::constants::{JDTOMJD, MJD};

/// Transformation from a date in the format YYYY-MM-ddTHH:mm:ss (UTC) to
/// modified julian date (MJD).
///
/// Argument
/// --------
/// * `date`: a date string in the format YYYY-MM-ddTHH:mm:ss
///
/// Return
/// ------
/// * the input date as an MJD (UTC), or [`AstrographError::InvalidDate`] if the
///   string cannot be parsed.
pub fn utc_to_mjd(date: &str) -> Result<MJD, AstrographError> {
    Epoch::from_str(date)
        .map(|epoch| epoch.to_mjd_utc_days())
        .map_err(|e| AstrographError::InvalidDate(format!("{date}: {e}")))
}

/// Transformation from modified julian date (MJD) to julian date (JD)
pub fn mjd_to_jd(mjd: MJD) -> f64 {
    mjd + JDTOMJD
}

/// Transformation from julian date (JD) to modified julian date (MJD)
pub fn jd_to_mjd(jd: f64) -> MJD {
    jd - JDTOMJD
}
