/// Prediction backend API client.
///
/// Talks to the air quality backend's three JSON endpoints:
/// `/predict_single_point`, `/get_health_advice`, and
/// `/predict_grid_data`. Request and response shapes follow the
/// backend's contract exactly; optional numeric fields decode to
/// `Option<f64>` rather than silently defaulting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{ApiError, Coordinates, GridPoint, PollutantReading, SinglePointPrediction};
use crate::session::{AdviceRequest, PredictionApi};

// ============================================================================
// Wire Structures
// ============================================================================

#[derive(Debug, Serialize)]
struct PointRequest {
    latitude: f64,
    longitude: f64,
}

/// Success body of `/predict_single_point`.
#[derive(Debug, Deserialize)]
struct SinglePointResponse {
    no2: Option<f64>,
    pm25: Option<f64>,
    pm10: Option<f64>,
    o3: Option<f64>,
    so2: Option<f64>,
    co: Option<f64>,
    #[serde(rename = "overallAqiCategory")]
    overall_aqi_category: String,
    #[serde(rename = "overallAqiColor")]
    overall_aqi_color: String,
    source: String,
    date_utc: Option<String>,
}

/// Error body of the prediction endpoints on non-2xx.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AdviceWireRequest<'a> {
    aqi_category: &'a str,
    location_name: &'a str,
    data_source: &'a str,
    latitude: f64,
    longitude: f64,
}

/// Body of `/get_health_advice` — the same shape on success and failure.
/// On failure `health_advice` carries a usable fallback message.
#[derive(Debug, Deserialize)]
struct AdviceResponse {
    health_advice: String,
}

#[derive(Debug, Serialize)]
struct GridRequest {
    resolution: u32,
}

#[derive(Debug, Deserialize)]
struct GridResponse {
    grid_data: Vec<GridPointWire>,
}

#[derive(Debug, Deserialize)]
struct GridPointWire {
    lat: f64,
    lng: f64,
    no2: Option<f64>,
    pm25: Option<f64>,
    pm10: Option<f64>,
    o3: Option<f64>,
    so2: Option<f64>,
    co: Option<f64>,
}

// ============================================================================
// Client
// ============================================================================

/// Blocking client for the prediction backend.
pub struct BackendClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl BackendClient {
    /// Build a client with a per-request timeout. Expiry surfaces as a
    /// `Network` error and, on the primary fetch, a failed query.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(BackendClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    /// Fetch the background grid dataset. Done once at startup; the
    /// result is immutable for the session lifetime.
    pub fn fetch_grid(&self, resolution: u32) -> Result<Vec<GridPoint>, ApiError> {
        let response = self.post("/predict_grid_data", &GridRequest { resolution })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response
                .text()
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                .and_then(|b| b.error);
            return Err(ApiError::Http(status, message));
        }

        let decoded: GridResponse = response
            .json()
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(decoded
            .grid_data
            .into_iter()
            .map(|p| GridPoint {
                latitude: p.lat,
                longitude: p.lng,
                reading: PollutantReading {
                    no2: p.no2,
                    pm25: p.pm25,
                    pm10: p.pm10,
                    o3: p.o3,
                    so2: p.so2,
                    co: p.co,
                },
            })
            .collect())
    }
}

impl PredictionApi for BackendClient {
    fn predict_single_point(
        &self,
        coords: Coordinates,
    ) -> Result<SinglePointPrediction, ApiError> {
        let response = self.post(
            "/predict_single_point",
            &PointRequest {
                latitude: coords.latitude,
                longitude: coords.longitude,
            },
        )?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response
                .text()
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                .and_then(|b| b.error);
            return Err(ApiError::Http(status, message));
        }

        let decoded: SinglePointResponse = response
            .json()
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(SinglePointPrediction {
            reading: PollutantReading {
                no2: decoded.no2,
                pm25: decoded.pm25,
                pm10: decoded.pm10,
                o3: decoded.o3,
                so2: decoded.so2,
                co: decoded.co,
            },
            overall_category: decoded.overall_aqi_category,
            overall_color: decoded.overall_aqi_color,
            source: decoded.source,
            date_utc: decoded.date_utc,
        })
    }

    fn health_advice(&self, request: &AdviceRequest) -> Result<String, ApiError> {
        let response = self.post(
            "/get_health_advice",
            &AdviceWireRequest {
                aqi_category: &request.aqi_category,
                location_name: &request.location_name,
                data_source: &request.data_source,
                latitude: request.coordinates.latitude,
                longitude: request.coordinates.longitude,
            },
        )?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            // The advice endpoint puts its fallback text in the same
            // field on failure; pass it along so the session can show it.
            let fallback = response
                .text()
                .ok()
                .and_then(|body| serde_json::from_str::<AdviceResponse>(&body).ok())
                .map(|b| b.health_advice);
            return Err(ApiError::Http(status, fallback));
        }

        let decoded: AdviceResponse = response
            .json()
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(decoded.health_advice)
    }
}
