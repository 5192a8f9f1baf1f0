//! Air quality monitoring viewer core.
//!
//! Provides everything a map view layer needs to display geographic air
//! quality data, without doing any rendering itself:
//!
//! - [`aqi`] — per-pollutant threshold bands, the concentration
//!   classifier, and the worst-case severity resolver.
//! - [`session`] — the query session state machine driving the
//!   click / search / programmatic lookup lifecycle.
//! - [`grid`] — marker colorization for the background grid dataset.
//! - [`ingest`] — blocking HTTP clients for the prediction backend and
//!   the geocoder.
//! - [`config`] / [`logging`] — startup configuration and structured
//!   logging.

pub mod aqi;
pub mod config;
pub mod grid;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod session;
