//! # Unit Types
//!
//! Type-safe wrappers for the SI units used by NZS 3604 / NZS 1170. These are
//! plain f64 newtypes: JSON stays clean (just numbers) and the conversions the
//! codes rely on live in one place.
//!
//! ## Units
//!
//! - Length: metres (m)
//! - Area: square metres (m²)
//! - Pressure / area load: pascals (Pa), kilopascals (kPa = kN/m²)
//! - Force: kilonewtons (kN)
//! - Bracing capacity: bracing units (BU, 1 kN = 20 BU)
//! - Angle: degrees
//!
//! ## Example
//!
//! ```rust
//! use brace_core::units::{BracingUnits, Kilonewtons, Kpa, Pascals};
//!
//! let q: Kpa = Pascals(821.4).into();
//! assert!((q.0 - 0.8214).abs() < 1e-12);
//!
//! let demand: BracingUnits = Kilonewtons(6.25).into();
//! assert_eq!(demand.0, 125.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Bracing units per kilonewton of storey shear (NZS 3604 §5.1)
pub const BU_PER_KN: f64 = 20.0;

// ============================================================================
// Length / Area Units
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMetres(pub f64);

impl Mul for Metres {
    type Output = SqMetres;
    fn mul(self, rhs: Metres) -> SqMetres {
        SqMetres(self.0 * rhs.0)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in pascals (N/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Pressure in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kpa(pub f64);

impl From<Pascals> for Kpa {
    fn from(pa: Pascals) -> Self {
        Kpa(pa.0 / 1000.0)
    }
}

impl From<Kpa> for Pascals {
    fn from(kpa: Kpa) -> Self {
        Pascals(kpa.0 * 1000.0)
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

/// Bracing capacity or demand in bracing units (BU)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BracingUnits(pub f64);

impl From<Kilonewtons> for BracingUnits {
    fn from(kn: Kilonewtons) -> Self {
        BracingUnits(kn.0 * BU_PER_KN)
    }
}

impl From<BracingUnits> for Kilonewtons {
    fn from(bu: BracingUnits) -> Self {
        Kilonewtons(bu.0 / BU_PER_KN)
    }
}

impl BracingUnits {
    /// Round to the nearest whole bracing unit (demand values are whole BUs)
    pub fn rounded(self) -> Self {
        BracingUnits(self.0.round())
    }
}

impl Mul<SqMetres> for Kpa {
    type Output = Kilonewtons;
    fn mul(self, rhs: SqMetres) -> Kilonewtons {
        Kilonewtons(self.0 * rhs.0)
    }
}

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    /// Angle in radians
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    pub fn cos(self) -> f64 {
        self.to_radians().cos()
    }

    pub fn sin(self) -> f64 {
        self.to_radians().sin()
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

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Metres);
impl_arithmetic!(SqMetres);
impl_arithmetic!(Pascals);
impl_arithmetic!(Kpa);
impl_arithmetic!(Kilonewtons);
impl_arithmetic!(BracingUnits);
impl_arithmetic!(Degrees);
