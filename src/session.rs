/// Query session state machine.
///
/// One `QuerySession` value holds the full state of the "currently
/// inspected location" and is mutated only through the transition
/// methods here — never as freestanding fields owned by the view layer.
///
/// Lifecycle: `Idle → Loading → {Ready, Failed}`, with every new query
/// re-entering `Loading` first. The session itself never terminates; it
/// lives until the hosting view is torn down.
///
/// The machine is pure (no I/O). The blocking drivers `run_query` and
/// `run_search` sequence the network calls through the `PredictionApi`
/// and `Geocoder` traits and feed results back in, so tests can drive
/// the machine with in-memory fakes.

use crate::aqi::{self, Category, UNKNOWN_COLOR, UNKNOWN_LABEL};
use crate::logging::{self, DataSource};
use crate::model::{
    ApiError, Coordinates, GeocodeMatch, Pollutant, PollutantReading, SinglePointPrediction,
};

// ---------------------------------------------------------------------------
// Fixed user-facing messages
// ---------------------------------------------------------------------------

/// Advisory text shown when the primary fetch failed (no data to advise on).
pub const ADVICE_NO_DATA: &str =
    "Health advice is unavailable because pollutant data could not be retrieved.";

/// Advisory text shown when the advice fetch failed without a usable
/// fallback in the response body.
pub const ADVICE_FETCH_FAILED: &str =
    "Health advice could not be generated for this location. Pollutant data is unaffected.";

/// Validation message for a blank search submission.
pub const SEARCH_EMPTY_INPUT: &str = "Please enter a location to search for.";

// ---------------------------------------------------------------------------
// External service seams
// ---------------------------------------------------------------------------

/// Request payload for the health-advice endpoint. Carries the overall
/// category and provenance obtained from the primary fetch — the advice
/// call is sequenced after it and must observe its result.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceRequest {
    pub aqi_category: String,
    pub location_name: String,
    pub data_source: String,
    pub coordinates: Coordinates,
}

/// The two backend endpoints a query needs, in call order.
pub trait PredictionApi {
    fn predict_single_point(&self, coords: Coordinates)
        -> Result<SinglePointPrediction, ApiError>;

    /// On a non-2xx response the endpoint still returns a usable
    /// fallback text in `health_advice`; implementations surface it as
    /// `ApiError::Http(status, Some(fallback))`.
    fn health_advice(&self, request: &AdviceRequest) -> Result<String, ApiError>;
}

/// Free-text location resolution. Returns `Ok(None)` for a well-formed
/// lookup that simply matched nothing.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<Option<GeocodeMatch>, ApiError>;
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Handle identifying one query generation. Completion transitions carry
/// the id they were started with; a stale id (superseded by a newer
/// `begin_query`) is dropped instead of clobbering the newer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySession {
    status: SessionStatus,
    coordinates: Option<Coordinates>,
    display_name: String,
    reading: Option<PollutantReading>,
    /// Overall category/color exactly as reported by the backend.
    /// Authoritative for single-point queries; never recomputed from the
    /// local resolver.
    overall_category: Option<String>,
    overall_color: Option<String>,
    source: Option<String>,
    date_utc: Option<String>,
    advisory: Option<String>,
    /// True when the advisory text is a degraded fallback rather than a
    /// generated advisory. Kept separate from `status` so the view can
    /// distinguish "no pollutant data" from "no advice text".
    advice_degraded: bool,
    error: Option<String>,
    seq: u64,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySession {
    pub fn new() -> Self {
        QuerySession {
            status: SessionStatus::Idle,
            coordinates: None,
            display_name: String::new(),
            reading: None,
            overall_category: None,
            overall_color: None,
            source: None,
            date_utc: None,
            advisory: None,
            advice_degraded: false,
            error: None,
            seq: 0,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn reading(&self) -> Option<&PollutantReading> {
        self.reading.as_ref()
    }

    /// Backend-reported overall category label, or "Unknown" before the
    /// first successful query.
    pub fn overall_label(&self) -> &str {
        self.overall_category.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    /// Backend-reported overall color, or the unknown color.
    pub fn overall_color(&self) -> &str {
        self.overall_color.as_deref().unwrap_or(UNKNOWN_COLOR)
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    pub fn advice_degraded(&self) -> bool {
        self.advice_degraded
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Timestamp of the underlying measurement, when the backend reported
    /// one and it parses as RFC 3339.
    pub fn observed_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.date_utc
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }

    /// One display row per pollutant, in canonical order. Species absent
    /// from the reading (or with invalid values) surface as unknown rows
    /// rather than being omitted.
    pub fn display_rows(&self) -> Vec<PollutantRow> {
        let reading = self.reading.unwrap_or_default();
        reading
            .iter()
            .map(|(pollutant, concentration)| {
                let category = concentration.and_then(|c| aqi::classify(c, pollutant));
                PollutantRow {
                    pollutant,
                    concentration,
                    category,
                    color: category.map(Category::color).unwrap_or(UNKNOWN_COLOR),
                }
            })
            .collect()
    }

    // -- transitions --------------------------------------------------------

    /// Begin a new query: record the target, clear all prior results, and
    /// enter `Loading`. Supersedes any in-flight query — their completion
    /// transitions will be dropped as stale.
    pub fn begin_query(&mut self, coords: Coordinates, provisional_name: &str) -> QueryId {
        self.seq += 1;
        self.status = SessionStatus::Loading;
        self.coordinates = Some(coords);
        self.display_name = provisional_name.to_string();
        self.reading = None;
        self.overall_category = None;
        self.overall_color = None;
        self.source = None;
        self.date_utc = None;
        self.advisory = None;
        self.advice_degraded = false;
        self.error = None;
        QueryId(self.seq)
    }

    /// True when `id` no longer identifies the current query.
    pub fn is_stale(&self, id: QueryId) -> bool {
        id.0 != self.seq
    }

    /// Primary fetch succeeded. Stores the reading and the backend's
    /// authoritative overall category/color. Status stays `Loading` until
    /// the advice fetch settles. Returns false if the result was stale
    /// and dropped.
    pub fn primary_succeeded(&mut self, id: QueryId, prediction: SinglePointPrediction) -> bool {
        if self.is_stale(id) {
            return false;
        }
        self.reading = Some(prediction.reading);
        self.overall_category = Some(prediction.overall_category);
        self.overall_color = Some(prediction.overall_color);
        self.source = Some(prediction.source);
        self.date_utc = prediction.date_utc;
        true
    }

    /// Primary fetch failed: the query is over. Surfaces the server's own
    /// error message when one was returned, otherwise the transport/parse
    /// description.
    pub fn primary_failed(&mut self, id: QueryId, err: &ApiError) -> bool {
        if self.is_stale(id) {
            return false;
        }
        self.status = SessionStatus::Failed;
        self.error = Some(err.user_message());
        self.advisory = Some(ADVICE_NO_DATA.to_string());
        self.advice_degraded = true;
        true
    }

    /// Advice fetch succeeded; the query is fully `Ready`.
    pub fn advice_succeeded(&mut self, id: QueryId, text: String) -> bool {
        if self.is_stale(id) {
            return false;
        }
        self.advisory = Some(text);
        self.advice_degraded = false;
        self.status = SessionStatus::Ready;
        true
    }

    /// Advice fetch failed. Partial failure only: the primary data stands
    /// and the session still becomes `Ready`, with the advisory text
    /// replaced by the endpoint's fallback when it sent one.
    pub fn advice_failed(&mut self, id: QueryId, fallback: Option<String>) -> bool {
        if self.is_stale(id) {
            return false;
        }
        self.advisory = Some(fallback.unwrap_or_else(|| ADVICE_FETCH_FAILED.to_string()));
        self.advice_degraded = true;
        self.status = SessionStatus::Ready;
        true
    }

    /// Confirm the display name once geocoding or the backend supplies a
    /// better one than the provisional value.
    pub fn set_display_name(&mut self, id: QueryId, name: &str) -> bool {
        if self.is_stale(id) {
            return false;
        }
        self.display_name = name.to_string();
        true
    }
}

/// One row of the per-pollutant detail table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantRow {
    pub pollutant: Pollutant,
    /// `None` renders as "unknown" in the view.
    pub concentration: Option<f64>,
    pub category: Option<Category>,
    pub color: &'static str,
}

impl PollutantRow {
    pub fn category_label(&self) -> &'static str {
        self.category.map(Category::label).unwrap_or(UNKNOWN_LABEL)
    }
}

// ---------------------------------------------------------------------------
// Query drivers
// ---------------------------------------------------------------------------

/// Pre-flight rejection of a search submission. Not a query failure: the
/// session never enters `Loading` and its status is untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRejection {
    EmptyInput,
    NoMatch { query: String },
    GeocodeFailed(String),
}

impl SearchRejection {
    /// Transient validation message for the view.
    pub fn message(&self) -> String {
        match self {
            SearchRejection::EmptyInput => SEARCH_EMPTY_INPUT.to_string(),
            SearchRejection::NoMatch { query } => {
                format!("No results found for \"{}\". Try a different search.", query)
            }
            SearchRejection::GeocodeFailed(msg) => {
                format!("Location search is unavailable: {}", msg)
            }
        }
    }
}

/// Run one full query against the backend: begin, primary fetch, then —
/// only on primary success — the advice fetch. Every failure path maps
/// to a transition; nothing is swallowed.
pub fn run_query<A: PredictionApi>(
    session: &mut QuerySession,
    api: &A,
    coords: Coordinates,
    provisional_name: &str,
) -> QueryId {
    let id = session.begin_query(coords, provisional_name);
    complete_query(session, api, coords, id);
    id
}

/// The fetch sequence shared by the click and search paths. `id` is the
/// query begun by the caller; by this point the display name is settled.
fn complete_query<A: PredictionApi>(
    session: &mut QuerySession,
    api: &A,
    coords: Coordinates,
    id: QueryId,
) {
    logging::info(
        DataSource::Session,
        None,
        &format!(
            "query started: {} ({:.4}, {:.4})",
            session.display_name(),
            coords.latitude,
            coords.longitude
        ),
    );

    let prediction = match api.predict_single_point(coords) {
        Ok(p) => p,
        Err(err) => {
            logging::log_backend_failure("predict_single_point", &err);
            session.primary_failed(id, &err);
            return;
        }
    };

    let advice_request = AdviceRequest {
        aqi_category: prediction.overall_category.clone(),
        location_name: session.display_name().to_string(),
        data_source: prediction.source.clone(),
        coordinates: coords,
    };
    if !session.primary_succeeded(id, prediction) {
        // Superseded while the primary fetch was in flight.
        return;
    }

    match api.health_advice(&advice_request) {
        Ok(text) => {
            session.advice_succeeded(id, text);
        }
        Err(err) => {
            logging::log_backend_failure("get_health_advice", &err);
            let fallback = match err {
                ApiError::Http(_, Some(text)) => Some(text),
                _ => None,
            };
            session.advice_failed(id, fallback);
        }
    }
}

/// Search path: resolve free text to coordinates, then run the normal
/// query. Blank input and zero-result lookups are rejected before any
/// state change.
pub fn run_search<G: Geocoder, A: PredictionApi>(
    session: &mut QuerySession,
    geocoder: &G,
    api: &A,
    input: &str,
) -> Result<QueryId, SearchRejection> {
    let query = input.trim();
    if query.is_empty() {
        return Err(SearchRejection::EmptyInput);
    }

    let matched = match geocoder.geocode(query) {
        Ok(Some(m)) => m,
        Ok(None) => {
            logging::info(
                DataSource::Geocoder,
                None,
                &format!("no results for query: {}", query),
            );
            return Err(SearchRejection::NoMatch {
                query: query.to_string(),
            });
        }
        Err(err) => {
            logging::log_geocoder_failure(query, &err);
            return Err(SearchRejection::GeocodeFailed(err.user_message()));
        }
    };

    // The user's text serves as the provisional name; the geocoder's
    // resolved name confirms it before any fetch observes it.
    let id = session.begin_query(matched.coordinates, query);
    session.set_display_name(id, &matched.display_name);
    complete_query(session, api, matched.coordinates, id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction() -> SinglePointPrediction {
        SinglePointPrediction {
            reading: PollutantReading {
                no2: Some(10.0),
                pm25: Some(5.0),
                pm10: Some(20.0),
                o3: Some(50.0),
                so2: Some(30.0),
                co: Some(1.0),
            },
            overall_category: "Good".to_string(),
            overall_color: "#00e400".to_string(),
            source: "Live (OpenAQ API)".to_string(),
            date_utc: Some("2026-08-01T12:00:00+00:00".to_string()),
        }
    }

    fn coords() -> Coordinates {
        Coordinates {
            latitude: 28.61,
            longitude: 77.21,
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = QuerySession::new();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.overall_label(), "Unknown");
        assert_eq!(session.overall_color(), UNKNOWN_COLOR);
    }

    #[test]
    fn test_begin_query_clears_prior_state() {
        let mut session = QuerySession::new();
        let id = session.begin_query(coords(), "Delhi");
        session.primary_succeeded(id, prediction());
        session.advice_succeeded(id, "stay outside".to_string());
        assert_eq!(session.status(), SessionStatus::Ready);

        let _id2 = session.begin_query(coords(), "Mumbai");
        assert_eq!(session.status(), SessionStatus::Loading);
        assert!(session.reading().is_none());
        assert!(session.advisory().is_none());
        assert!(session.error().is_none());
        assert_eq!(session.overall_label(), "Unknown");
        assert_eq!(session.display_name(), "Mumbai");
    }

    #[test]
    fn test_primary_failure_is_terminal_for_query() {
        let mut session = QuerySession::new();
        let id = session.begin_query(coords(), "Delhi");
        let applied =
            session.primary_failed(id, &ApiError::Http(404, Some("not found".to_string())));
        assert!(applied);
        assert_eq!(session.status(), SessionStatus::Failed);
        assert_eq!(session.error(), Some("not found"));
        assert!(session.reading().is_none());
        assert_eq!(session.advisory(), Some(ADVICE_NO_DATA));
        assert!(session.advice_degraded());
    }

    #[test]
    fn test_advice_failure_is_partial() {
        let mut session = QuerySession::new();
        let id = session.begin_query(coords(), "Delhi");
        session.primary_succeeded(id, prediction());
        session.advice_failed(id, Some("fallback text".to_string()));

        assert_eq!(session.status(), SessionStatus::Ready);
        assert!(session.reading().is_some());
        assert_eq!(session.advisory(), Some("fallback text"));
        assert!(session.advice_degraded());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut session = QuerySession::new();
        let old = session.begin_query(coords(), "Delhi");
        let new = session.begin_query(
            Coordinates {
                latitude: 19.07,
                longitude: 72.88,
            },
            "Mumbai",
        );

        // Late completion of the superseded query must not change state.
        assert!(!session.primary_succeeded(old, prediction()));
        assert!(session.reading().is_none());
        assert!(!session.primary_failed(old, &ApiError::Network("timeout".to_string())));
        assert_eq!(session.status(), SessionStatus::Loading);
        assert!(!session.advice_succeeded(old, "stale advice".to_string()));

        // The current query still completes normally.
        assert!(session.primary_succeeded(new, prediction()));
        assert!(session.advice_succeeded(new, "advice".to_string()));
        assert_eq!(session.status(), SessionStatus::Ready);
        assert_eq!(session.display_name(), "Mumbai");
    }

    #[test]
    fn test_display_rows_surface_missing_species_as_unknown() {
        let mut session = QuerySession::new();
        let id = session.begin_query(coords(), "Delhi");
        session.primary_succeeded(
            id,
            SinglePointPrediction {
                reading: PollutantReading {
                    pm25: Some(200.0),
                    ..Default::default()
                },
                overall_category: "Very Unhealthy".to_string(),
                overall_color: "#8f3f97".to_string(),
                source: "AI Model Prediction".to_string(),
                date_utc: None,
            },
        );

        let rows = session.display_rows();
        assert_eq!(rows.len(), 6);
        let pm25 = rows.iter().find(|r| r.pollutant == Pollutant::Pm25).unwrap();
        assert_eq!(pm25.category, Some(Category::VeryUnhealthy));
        let no2 = rows.iter().find(|r| r.pollutant == Pollutant::No2).unwrap();
        assert_eq!(no2.concentration, None);
        assert_eq!(no2.category_label(), "Unknown");
        assert_eq!(no2.color, UNKNOWN_COLOR);
    }

    #[test]
    fn test_backend_category_is_authoritative() {
        // Backend may report a category the local resolver would not
        // derive from the raw values; the session keeps the backend's.
        let mut session = QuerySession::new();
        let id = session.begin_query(coords(), "Delhi");
        session.primary_succeeded(
            id,
            SinglePointPrediction {
                reading: PollutantReading {
                    pm25: Some(5.0),
                    ..Default::default()
                },
                overall_category: "Moderate".to_string(),
                overall_color: "#ffff00".to_string(),
                source: "Live (OpenAQ API)".to_string(),
                date_utc: None,
            },
        );
        assert_eq!(session.overall_label(), "Moderate");
        assert_eq!(session.overall_color(), "#ffff00");
    }

    #[test]
    fn test_set_display_name_confirms_current_query_only() {
        let mut session = QuerySession::new();
        let old = session.begin_query(coords(), "delhi");
        assert!(session.set_display_name(old, "New Delhi, India"));
        assert_eq!(session.display_name(), "New Delhi, India");

        // A superseded query must not rename the newer one.
        let _new = session.begin_query(coords(), "Mumbai");
        assert!(!session.set_display_name(old, "New Delhi, India"));
        assert_eq!(session.display_name(), "Mumbai");
    }

    #[test]
    fn test_observed_at_parses_rfc3339() {
        let mut session = QuerySession::new();
        let id = session.begin_query(coords(), "Delhi");
        session.primary_succeeded(id, prediction());
        let observed = session.observed_at().unwrap();
        assert_eq!(observed.to_rfc3339(), "2026-08-01T12:00:00+00:00");
    }
}
