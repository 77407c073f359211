//! Scalar abstraction shared by every geometry routine.
//!
//! Purpose
//! - Let the same code run in `f32` and `f64` without dynamic dispatch.
//! - Centralize the comparison tolerance used by the sweeps and the clipper.
//!
//! Tolerances
//! - `EPS` is a fixed per-type table (`f32 → 3e-7`, `f64 → 6e-15`). It is used
//!   for sign tests on cross products and signed distances, and to bias edge
//!   slopes so that a horizontal edge pointing to −x reads as −π instead of π.

use nalgebra::RealField;

/// Floating-point scalar accepted by the geometry routines.
pub trait Real: RealField + Copy {
    /// Sign-test tolerance.
    const EPS: Self;

    /// Lift an `f64` literal into `Self`.
    #[inline]
    fn lit(v: f64) -> Self {
        nalgebra::convert(v)
    }

    /// Lossy view as `f64` (for logging and I/O).
    #[inline]
    fn as_f64(self) -> f64 {
        nalgebra::try_convert::<Self, f64>(self).unwrap_or(f64::NAN)
    }
}

impl Real for f32 {
    const EPS: f32 = 3e-7;
}

impl Real for f64 {
    const EPS: f64 = 6e-15;
}
