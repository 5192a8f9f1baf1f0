/// Air-quality categorization for the monitoring viewer.
///
/// Submodules:
/// - `bands` — the per-pollutant threshold band registry and category colors.
/// - `classify` — the pure classifier and worst-case severity resolver.

pub mod bands;
pub mod classify;

pub use bands::{Category, CategoryBand, UNKNOWN_COLOR, UNKNOWN_LABEL};
pub use classify::{classify, resolve_overall, OverallAqi};
