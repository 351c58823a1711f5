//! Decode errors.

use grib::{GribError, ParseError};
use thiserror::Error;

/// Errors raised while decoding an uploaded GRIB2 buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("not a GRIB file: no 'GRIB' indicator found")]
    NotGrib,

    #[error("expected GRIB edition 2, got {edition}")]
    UnsupportedEdition { edition: u8 },

    #[error("submessage {index}: invalid reference time {value}")]
    InvalidReferenceTime { index: usize, value: String },

    #[error("GRIB decode failed: {0}")]
    Grib(String),

    #[error("submessage {index}: grid of {ni}x{nj} does not match {points} decoded points")]
    GridMismatch {
        index: usize,
        ni: usize,
        nj: usize,
        points: usize,
    },
}

impl From<GribError> for DecodeError {
    fn from(e: GribError) -> Self {
        match e {
            GribError::ParseError(ParseError::NotGRIB) => DecodeError::NotGrib,
            GribError::ParseError(ParseError::GRIBVersionMismatch(edition)) => {
                DecodeError::UnsupportedEdition { edition }
            }
            other => DecodeError::Grib(other.to_string()),
        }
    }
}
