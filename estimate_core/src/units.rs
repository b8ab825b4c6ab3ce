//! # Unit Types
//!
//! Newtype wrappers for the handful of units a quantity takeoff moves between.
//! They serialize as bare numbers so result JSON stays flat.
//!
//! - Length: feet (ft)
//! - Area: square feet (sqft), square metres (the tile "cmt" pricing unit)
//! - Volume: cubic feet (cft)
//! - Mass: kilograms (kg), metric tons (t)
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::units::{Kilograms, SqFt, SqM, Tons};
//!
//! let floor = SqFt(107.639);
//! let tiles: SqM = floor.into();
//! assert!((tiles.0 - 10.0).abs() < 1e-9);
//!
//! let steel: Tons = Kilograms(2500.0).into();
//! assert_eq!(steel.0, 2.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Square feet per square metre
pub const SQFT_PER_SQM: f64 = 10.7639;

// ============================================================================
// Length / Area / Volume
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqFt(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cft(pub f64);

impl From<SqFt> for SqM {
    fn from(sqft: SqFt) -> Self {
        SqM(sqft.0 / SQFT_PER_SQM)
    }
}

impl Mul<Feet> for Feet {
    type Output = SqFt;
    fn mul(self, rhs: Feet) -> SqFt {
        SqFt(self.0 * rhs.0)
    }
}

impl Mul<Feet> for SqFt {
    type Output = Cft;
    fn mul(self, rhs: Feet) -> Cft {
        Cft(self.0 * rhs.0)
    }
}

// ============================================================================
// Mass
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Mass in metric tons (1 t = 1000 kg)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tons(pub f64);

impl From<Kilograms> for Tons {
    fn from(kg: Kilograms) -> Self {
        Tons(kg.0 / 1000.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Feet);
impl_arithmetic!(SqFt);
impl_arithmetic!(SqM);
impl_arithmetic!(Cft);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Tons);

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
