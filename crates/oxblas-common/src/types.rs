//! Layout and mode enums shared by every routine.
//!
//! The char conversions exist for the test harness, which stores these as
//! single characters in its flat argument record.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matrix operation applied to an input operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transpose {
    None,
    Transpose,
}

impl Transpose {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'N' => Ok(Transpose::None),
            'T' | 'C' => Ok(Transpose::Transpose),
            _ => Err(Error::InvalidValue { arg: "trans" }),
        }
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transpose::None => write!(f, "N"),
            Transpose::Transpose => write!(f, "T"),
        }
    }
}

/// Which triangle of a symmetric or triangular matrix is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fill {
    Upper,
    Lower,
}

impl Fill {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'U' => Ok(Fill::Upper),
            'L' => Ok(Fill::Lower),
            _ => Err(Error::InvalidValue { arg: "uplo" }),
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fill::Upper => write!(f, "U"),
            Fill::Lower => write!(f, "L"),
        }
    }
}

/// Side of a matrix product the triangular operand appears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'L' => Ok(Side::Left),
            'R' => Ok(Side::Right),
            _ => Err(Error::InvalidValue { arg: "side" }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "L"),
            Side::Right => write!(f, "R"),
        }
    }
}

/// Whether a triangular matrix has an implicit unit diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Diag {
    NonUnit,
    Unit,
}

impl Diag {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'N' => Ok(Diag::NonUnit),
            'U' => Ok(Diag::Unit),
            _ => Err(Error::InvalidValue { arg: "diag" }),
        }
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diag::NonUnit => write!(f, "N"),
            Diag::Unit => write!(f, "U"),
        }
    }
}

/// Where scalar arguments (alpha, beta, reduction results) live.
///
/// The handle carries one of these; routines reject scalar arguments passed
/// in the other mode. The harness runs every routine in both modes and
/// requires identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerMode {
    Host,
    Device,
}

impl fmt::Display for PointerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerMode::Host => write!(f, "host"),
            PointerMode::Device => write!(f, "device"),
        }
    }
}
