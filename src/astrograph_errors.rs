use thiserror::Error;

/// Errors raised by the astrometric correction chain.
///
/// All failures are local, immediate and fatal to the call: malformed input
/// (length mismatch, missing configuration) is reported synchronously with a
/// message identifying the offending parameter. There is no retry policy and
/// no partial-result semantics.
#[derive(Error, Debug)]
pub enum AstrographError {
    #[error("array length mismatch: {left_name} has {left_len} elements, {right_name} has {right_len}")]
    LengthMismatch {
        left_name: &'static str,
        left_len: usize,
        right_name: &'static str,
        right_len: usize,
    },

    #[error("cannot call {operation}: ObservationMetaData has no {field}")]
    MissingMetadata {
        operation: &'static str,
        field: &'static str,
    },

    #[error("cannot call {operation}: no ObservationMetaData provided")]
    MissingObservationMetaData { operation: &'static str },

    #[error("cannot call {operation}: no epoch provided")]
    MissingEpoch { operation: &'static str },

    #[error("no camera defined for {operation}")]
    MissingCamera { operation: &'static str },

    #[error("ERFA routine {routine} returned status {status}")]
    ErfaStatus { routine: &'static str, status: i32 },

    #[error("star {index} is too far from the tangent point for gnomonic projection")]
    TangentPointTooFar { index: usize },

    #[error("invalid date string: {0}")]
    InvalidDate(String),
}

impl PartialEq for AstrographError {
    fn eq(&self, other: &Self) -> bool {
        use AstrographError::*;
        match (self, other) {
            (
                LengthMismatch {
                    left_name: a,
                    left_len: b,
                    right_name: c,
                    right_len: d,
                },
                LengthMismatch {
                    left_name: e,
                    left_len: f,
                    right_name: g,
                    right_len: h,
                },
            ) => a == e && b == f && c == g && d == h,
            (
                MissingMetadata {
                    operation: a,
                    field: b,
                },
                MissingMetadata {
                    operation: c,
                    field: d,
                },
            ) => a == c && b == d,
            (
                MissingObservationMetaData { operation: a },
                MissingObservationMetaData { operation: b },
            ) => a == b,
            (MissingEpoch { operation: a }, MissingEpoch { operation: b }) => a == b,
            (MissingCamera { operation: a }, MissingCamera { operation: b }) => a == b,
            (
                ErfaStatus {
                    routine: a,
                    status: b,
                },
                ErfaStatus {
                    routine: c,
                    status: d,
                },
            ) => a == c && b == d,
            (TangentPointTooFar { index: a }, TangentPointTooFar { index: b }) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            _ => false,
        }
    }
}

/// Check that two parallel input arrays have the same length.
///
/// Arguments
/// ---------
/// * `left_name`, `left`: name and slice of the first parameter
/// * `right_name`, `right`: name and slice of the second parameter
///
/// Return
/// ------
/// * `Ok(())` when the lengths agree, otherwise a [`AstrographError::LengthMismatch`]
///   naming both parameters.
pub(crate) fn check_same_length(
    left_name: &'static str,
    left: &[f64],
    right_name: &'static str,
    right: &[f64],
) -> Result<(), AstrographError> {
    if left.len() != right.len() {
        return Err(AstrographError::LengthMismatch {
            left_name,
            left_len: left.len(),
            right_name,
            right_len: right.len(),
        });
    }
    Ok(())
}
