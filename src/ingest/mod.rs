/// HTTP clients for the external services the viewer consumes.
///
/// Submodules:
/// - `backend` — the pollutant prediction / health advice backend.
/// - `geocode` — free-text location lookup against a Nominatim-style API.

pub mod backend;
pub mod geocode;
