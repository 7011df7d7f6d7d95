//! Runtime datatype tags.
//!
//! The dispatch layer of the test harness matches on tuples of these tags to
//! select a monomorphized driver; the [`crate::scalar::Scalar`] trait ties
//! each tag back to its concrete Rust type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Datatype {
    F16,
    Bf16,
    F32,
    F64,
    I8,
    I32,
}

impl Datatype {
    /// Size of one element in bytes.
    pub fn size_of(self) -> usize {
        match self {
            Datatype::F16 | Datatype::Bf16 => 2,
            Datatype::F32 | Datatype::I32 => 4,
            Datatype::F64 => 8,
            Datatype::I8 => 1,
        }
    }

    /// True for the floating-point tags.
    pub fn is_float(self) -> bool {
        matches!(self, Datatype::F16 | Datatype::Bf16 | Datatype::F32 | Datatype::F64)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Datatype::F16 => "f16",
            Datatype::Bf16 => "bf16",
            Datatype::F32 => "f32",
            Datatype::F64 => "f64",
            Datatype::I8 => "i8",
            Datatype::I32 => "i32",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Datatype {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f16" | "h" => Ok(Datatype::F16),
            "bf16" => Ok(Datatype::Bf16),
            "f32" | "s" => Ok(Datatype::F32),
            "f64" | "d" => Ok(Datatype::F64),
            "i8" => Ok(Datatype::I8),
            "i32" => Ok(Datatype::I32),
            _ => Err(crate::Error::InvalidValue { arg: "datatype" }),
        }
    }
}
