use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;
use weather_core::{ErrorKind, LocationProvider, WeatherError, WeatherProvider, get_weather};

/// Providers shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub location: Arc<dyn LocationProvider>,
    pub weather: Arc<dyn WeatherProvider>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(weather_by_zipcode))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// First `zipcode` value in the query string; empty when absent.
fn zipcode_param(params: &[(String, String)]) -> &str {
    params
        .iter()
        .find(|(key, _)| key == "zipcode")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

async fn weather_by_zipcode(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let zipcode = zipcode_param(&params);
    let result = get_weather(state.location.as_ref(), state.weather.as_ref(), zipcode)
        .await
        .and_then(|weather| serde_json::to_vec(&weather).map_err(WeatherError::from));

    match result {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => error_response(&err),
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidCode => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Configuration | ErrorKind::Provider | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &WeatherError) -> Response {
    let status = status_for(err.kind());
    if status.is_server_error() {
        warn!(error = %err, kind = ?err.kind(), "weather lookup failed");
    }

    (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use httpmock::prelude::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };
    use tower::ServiceExt;
    use weather_core::{
        PostalLookup, WeatherReading,
        provider::{self, weatherapi::WeatherApiProvider},
    };

    #[derive(Debug)]
    struct FakeLocation {
        city: Option<&'static str>,
    }

    #[async_trait]
    impl LocationProvider for FakeLocation {
        async fn resolve(&self, zip_code: &str) -> Result<PostalLookup, WeatherError> {
            if zip_code.len() != 8 {
                return Err(WeatherError::InvalidZipCode);
            }
            Ok(self.city.map(PostalLookup::found).unwrap_or_else(PostalLookup::not_found))
        }
    }

    #[derive(Debug, Default)]
    struct FakeWeather {
        missing_key: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn fetch(&self, city: &str) -> Result<WeatherReading, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(city, "TestCity");
            if self.missing_key {
                return Err(WeatherError::MissingApiKey { provider: "weatherapi" });
            }
            Ok(WeatherReading { temp_c: 25.0, temp_f: 77.0 })
        }
    }

    fn app(city: Option<&'static str>, weather: Arc<FakeWeather>) -> Router {
        router(AppState { location: Arc::new(FakeLocation { city }), weather })
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn returns_temperatures_for_known_zipcode() {
        let weather = Arc::new(FakeWeather::default());
        let (status, body) = send_get(app(Some("TestCity"), weather.clone()), "/weather?zipcode=12345678").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["temp_C"].as_f64(), Some(25.0));
        assert_eq!(json["temp_F"].as_f64(), Some(77.0));
        assert_eq!(json["temp_K"].as_f64(), Some(298.0));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_zipcode_is_404() {
        let weather = Arc::new(FakeWeather::default());
        let (status, body) = send_get(app(None, weather.clone()), "/weather?zipcode=12345678").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("can not find zipcode"));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn short_zipcode_is_422_without_weather_call() {
        let weather = Arc::new(FakeWeather::default());
        let (status, body) = send_get(app(Some("TestCity"), weather.clone()), "/weather?zipcode=123").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("invalid zipcode"));
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_zipcode_is_422() {
        let weather = Arc::new(FakeWeather::default());
        let (status, body) = send_get(app(Some("TestCity"), weather), "/weather").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("invalid zipcode"));
    }

    #[tokio::test]
    async fn provider_failure_is_500_with_message() {
        let weather = Arc::new(FakeWeather { missing_key: true, ..Default::default() });
        let (status, body) = send_get(app(Some("TestCity"), weather), "/weather?zipcode=12345678").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "weatherapi api key not found");
    }

    #[tokio::test]
    async fn repeated_zipcode_uses_the_first_value() {
        let weather = Arc::new(FakeWeather::default());
        let (status, _) = send_get(
            app(Some("TestCity"), weather.clone()),
            "/weather?zipcode=12345678&zipcode=123",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);

        let (status, body) =
            send_get(app(Some("TestCity"), weather), "/weather?zipcode=123&zipcode=12345678").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("invalid zipcode"));
    }

    #[tokio::test]
    async fn upstream_timeout_is_500_without_api_key_in_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/current.json");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(serde_json::json!({ "current": { "temp_c": 25.0, "temp_f": 77.0 } }));
            })
            .await;

        let http = provider::http_client(Duration::from_millis(300)).unwrap();
        let state = AppState {
            location: Arc::new(FakeLocation { city: Some("TestCity") }),
            weather: Arc::new(WeatherApiProvider::new(server.base_url(), Some("SECRET_KEY".into()), http)),
        };

        let (status, body) = send_get(router(state), "/weather?zipcode=12345678").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("weatherapi"));
        assert!(!body.contains("SECRET_KEY"), "leaked key: {body}");
    }

    #[test]
    fn maps_every_kind_to_a_status() {
        assert_eq!(status_for(ErrorKind::InvalidCode), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Configuration), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::Provider), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
