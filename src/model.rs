/// Core data types for the air quality monitoring viewer.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond accessors, no I/O, and no external dependencies
/// — only types.

// ---------------------------------------------------------------------------
// Pollutants
// ---------------------------------------------------------------------------

/// One of the six tracked chemical species.
///
/// The set is closed: adding a species means adding a variant here plus a
/// band table in `aqi::bands`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    No2,
    Pm25,
    Pm10,
    O3,
    So2,
    Co,
}

impl Pollutant {
    /// All pollutants, in the canonical display order used by the backend.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::No2,
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// Field name used in backend JSON payloads.
    pub fn wire_name(self) -> &'static str {
        match self {
            Pollutant::No2 => "no2",
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::No2 => "NO2",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::O3 => "O3",
            Pollutant::So2 => "SO2",
            Pollutant::Co => "CO",
        }
    }

    /// Concentration unit for this species. CO is reported in mg/m³,
    /// everything else in µg/m³.
    pub fn unit(self) -> &'static str {
        match self {
            Pollutant::Co => "mg/m³",
            _ => "µg/m³",
        }
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// WGS84 coordinates of a queried or gridded location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Concentrations for a single location. A reading may be partial — any
/// species the source did not report is `None` and is excluded from
/// severity resolution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PollutantReading {
    pub no2: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
}

impl PollutantReading {
    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::No2 => self.no2,
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        }
    }

    /// Iterate over all six species with their (possibly absent) values,
    /// in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, Option<f64>)> + '_ {
        Pollutant::ALL.into_iter().map(move |p| (p, self.get(p)))
    }

    /// True when no species reported a value at all.
    pub fn is_empty(&self) -> bool {
        Pollutant::ALL.iter().all(|p| self.get(*p).is_none())
    }
}

/// One background measurement location, rendered as a map marker.
///
/// Immutable once fetched; the full grid is fetched once at startup and
/// held for the session lifetime. Sequence order is render order only.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub reading: PollutantReading,
}

// ---------------------------------------------------------------------------
// Backend result types
// ---------------------------------------------------------------------------

/// Decoded result of a single-point prediction request.
///
/// The overall category and color here come from the backend and are
/// authoritative for single-point queries — the backend may fold in
/// factors (live-measurement provenance, station proximity) that are not
/// available client-side, so they are never recomputed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePointPrediction {
    pub reading: PollutantReading,
    pub overall_category: String,
    pub overall_color: String,
    /// Data provenance as reported by the backend, e.g.
    /// "Live (OpenAQ API)" or "AI Model Prediction".
    pub source: String,
    pub date_utc: Option<String>, // ISO 8601 when present
}

/// Best geocoding match for a free-text location search.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub coordinates: Coordinates,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when talking to the prediction backend or the
/// geocoder.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Non-2xx HTTP response. Carries the server's structured message when
    /// the body had one (`error` for predictions, `health_advice` for the
    /// advice endpoint, which returns a usable fallback text on failure).
    Http(u16, Option<String>),
    /// Transport-level failure (DNS, connect, timeout).
    Network(String),
    /// The response body could not be deserialized.
    Parse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(code, Some(msg)) => write!(f, "HTTP error {}: {}", code, msg),
            ApiError::Http(code, None) => write!(f, "HTTP error: {}", code),
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Human-readable message for surfacing in the session error field.
    /// Prefers the server's own message when one was returned.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(_, Some(msg)) => msg.clone(),
            other => other.to_string(),
        }
    }
}
