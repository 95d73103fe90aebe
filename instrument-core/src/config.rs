//! Tunable numeric tolerances used across the instrument geometry core,
//! gathered in one place rather than scattered through the modules that use
//! them.

/// Tolerance used by round-trip tests (rotate then inverse-rotate) when
/// comparing a recovered position or rotation against its original value.
pub const ROUND_TRIP_TOLERANCE: f64 = 1e-12;

/// Below this half-height, a `ParabolicGuide` is treated as having
/// degenerated to a flat segment of length `2 * a` rather than evaluated
/// through the `asinh` term, which is singular at `h == 0`.
pub const PARABOLIC_GUIDE_DEGENERATE_H: f64 = 1e-15;
