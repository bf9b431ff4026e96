//! Error-handling plumbing shared across the crate.
//!
//! Geometric primitives never raise; they return `Option`/`bool` per the
//! propagation policy. This module only covers the result sum for map/parse
//! failures and the `eyre` wiring used at the I/O boundary (PFMAP/PFSCENE
//! loading).

#[macro_export]
macro_rules! eyre_imports {
    () => {
        use color_eyre::eyre::{
            self,    // for eyre::Result
            eyre,    // for eyre! macro
            WrapErr, // for wrap_err* methods
        };
    };
}

use std::fmt;

/// The error sum described in SPEC_FULL.md §7.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A coordinate or descriptor falls outside the map's bounds.
    OutOfMap,
    /// A material index in a PFMAP token exceeds the material list length.
    MaterialIndexOutOfRange { index: u32, num_materials: u32 },
    /// A PFMAP header declared more materials than this build supports.
    TooManyMaterials { requested: u32, max: u32 },
    /// A PFMAP/PFSCENE line failed to parse.
    ParseFailed { line: usize, reason: String },
    /// Failed to obtain render handle memory, or to grow the chunk list.
    Unallocable,
    /// The navigation façade was called before a navigation handle was built.
    NavUnavailable,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::OutOfMap => write!(f, "coordinate or descriptor is out of map bounds"),
            CoreError::MaterialIndexOutOfRange { index, num_materials } => write!(
                f,
                "material index {index} out of range (map has {num_materials} materials)"
            ),
            CoreError::TooManyMaterials { requested, max } => {
                write!(f, "map requests {requested} materials, this build supports at most {max}")
            }
            CoreError::ParseFailed { line, reason } => {
                write!(f, "parse failed at line {line}: {reason}")
            }
            CoreError::Unallocable => write!(f, "failed to allocate render/chunk storage"),
            CoreError::NavUnavailable => {
                write!(f, "navigation façade used before a navigation handle was built")
            }
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
