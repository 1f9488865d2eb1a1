//! # Constants and type definitions for astrograph
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `astrograph` library.
//!
//! ## Overview
//!
//! - Astronomical constants and unit conversions (degrees ↔ radians, arcseconds ↔ radians)
//! - Core type aliases used across the crate
//! - Conventional values used by the astrometric correction chain (default observing
//!   wavelength, minimum parallax, UT1−UTC offset)
//!
//! These definitions are used by all main modules, including the astrometry API,
//! the ERFA engine, and the focal-plane mapping.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Kelvin offset of 0 °C (ERFA expects ambient temperature in Celsius)
pub const ZERO_CELSIUS: f64 = 273.15;

// -------------------------------------------------------------------------------------------------
// Conventions of the astrometric correction chain
// -------------------------------------------------------------------------------------------------

/// Default observing wavelength in Ångström (V band)
pub const DEFAULT_WAVELENGTH: Angstrom = 5000.0;

/// Smallest parallax accepted by the space-motion routine, in arcseconds.
/// Smaller values are clamped so the epoch update stays numerically meaningful.
pub const MIN_PARALLAX: ArcSec = 0.00045;

/// Fixed UT1−UTC offset in seconds, in lieu of an IERS table lookup
pub const DUT1: f64 = 0.3;

/// Proper motion, parallax or radial velocity below this threshold is treated as zero
/// and routed through the motion-free fast path of the mean-to-apparent transform.
pub const MOTION_TOLERANCE: f64 = 1.0e-9;

/// Reference Julian epoch of catalog coordinates
pub const J2000_EPOCH: f64 = 2000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Wavelength in Ångström
pub type Angstrom = f64;
/// Distance in meters
pub type Meter = f64;
/// Velocity in kilometers per second
pub type KmPerSec = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
