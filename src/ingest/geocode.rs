/// Geocoding client for free-text location search.
///
/// Queries a Nominatim-style search API (OpenStreetMap's public instance
/// by default) and returns the best match. The service is rate-limited
/// and read-only; one request per search submission is all the viewer
/// issues.
///
/// API documentation: https://nominatim.org/release-docs/latest/api/Search/

use std::time::Duration;

use serde::Deserialize;

use crate::model::{ApiError, Coordinates, GeocodeMatch};
use crate::session::Geocoder;

/// Nominatim asks API consumers to identify themselves.
const USER_AGENT: &str = concat!("aqmon_service/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Wire Structures
// ============================================================================

/// One search result. Nominatim reports coordinates as strings.
#[derive(Debug, Deserialize)]
struct PlaceResult {
    lat: String,
    lon: String,
    display_name: String,
}

// ============================================================================
// Client
// ============================================================================

pub struct GeocodeClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(GeocodeClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for GeocodeClient {
    fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ApiError> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(ApiError::Http(status, None));
        }

        let results: Vec<PlaceResult> = response
            .json()
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let Some(best) = results.into_iter().next() else {
            return Ok(None);
        };

        let latitude: f64 = best
            .lat
            .parse()
            .map_err(|_| ApiError::Parse(format!("bad latitude: {}", best.lat)))?;
        let longitude: f64 = best
            .lon
            .parse()
            .map_err(|_| ApiError::Parse(format!("bad longitude: {}", best.lon)))?;

        Ok(Some(GeocodeMatch {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            display_name: best.display_name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_result_decodes_string_coordinates() {
        let body = r#"[{"lat": "28.6139", "lon": "77.2090", "display_name": "New Delhi, India"}]"#;
        let results: Vec<PlaceResult> = serde_json::from_str(body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lat, "28.6139");
        assert_eq!(results[0].display_name, "New Delhi, India");
    }

    #[test]
    fn test_empty_result_set_decodes() {
        let results: Vec<PlaceResult> = serde_json::from_str("[]").unwrap();
        assert!(results.is_empty());
    }
}
