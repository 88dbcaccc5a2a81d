/// Pure data-selection utilities for the air monitoring service.
///
/// Nothing in this module performs I/O; callers supply already-fetched
/// data and get deterministic answers back, which keeps these helpers
/// trivially testable in isolation.
///
/// Submodules:
/// - `nearest` — selects the monitoring post closest to a coordinate.

pub mod nearest;
