//! Conversion errors
//!
//! Errors are returned immediately to the caller and never retried: they
//! describe bad data or bad requests, not transient faults.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const CATEGORY_MISMATCH: &str = "CATEGORY_MISMATCH";
    pub const MISSING_DATA: &str = "MISSING_DATA";
    pub const ZERO_NOT_ALLOWED: &str = "ZERO_NOT_ALLOWED";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors raised while building converters or converting values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Name not present in the registry
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// Reserved for category-level checks; the linear path reports
    /// `IncompatibleUnits` instead.
    #[error("units are not in the same category: {from} and {to}")]
    CategoryMismatch { from: String, to: String },

    /// A required construction field was empty
    #[error("missing data: {0}")]
    MissingData(&'static str),

    #[error("zero not allowed: conversion factor must be non-zero")]
    ZeroNotAllowed,

    /// Base unit or category differ between source and target
    #[error("incompatible units: {from} and {to}")]
    IncompatibleUnits { from: String, to: String },
}

impl ConvertError {
    pub fn unknown_unit(name: impl Into<String>) -> Self {
        Self::UnknownUnit(name.into())
    }

    pub fn incompatible(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IncompatibleUnits {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            Self::CategoryMismatch { .. } => codes::CATEGORY_MISMATCH,
            Self::MissingData(_) => codes::MISSING_DATA,
            Self::ZeroNotAllowed => codes::ZERO_NOT_ALLOWED,
            Self::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
        }
    }
}
