//! `WeatherApiClient` against a wiremock stand-in for WeatherAPI.com.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_core::{FetchError, WeatherApiClient, WeatherClient};

const KEY: &str = "TEST_KEY";

fn endpoint(server: &MockServer) -> String {
    format!("{}/v1/current.json", server.uri())
}

fn paris_body() -> serde_json::Value {
    json!({
        "location": {
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "tz_id": "Europe/Paris"
        },
        "current": {
            "last_updated_epoch": 1737199800,
            "temp_c": 4.2,
            "temp_f": 39.6,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "humidity": 81,
            "pressure_mb": 1021.0,
            "vis_km": 10.0
        }
    })
}

#[tokio::test]
async fn sends_city_and_key_and_parses_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Paris"))
        .and(query_param("key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(endpoint(&server), KEY);
    let record = client.fetch("Paris").await.expect("lookup should succeed");

    assert_eq!(record.location.name, "Paris");
    assert_eq!(record.location.country, "France");
    assert_eq!(record.current.temp_f, 39.6);
    assert_eq!(record.current.pressure_mb, 1021.0);
    assert_eq!(record.current.condition.icon, "//cdn.weatherapi.com/weather/64x64/day/116.png");
}

#[tokio::test]
async fn unknown_city_is_not_found_with_upstream_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(endpoint(&server), KEY);
    let err = client.fetch("Atlantis").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "No matching location found.");
}

#[tokio::test]
async fn server_error_is_reported_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(endpoint(&server), KEY);
    let err = client.fetch("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Api { status: 500, .. }));
    assert!(err.to_string().contains("status code 500"));
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "location": {} })))
        .mount(&server)
        .await;

    let client = WeatherApiClient::new(endpoint(&server), KEY);
    let err = client.fetch("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let client = WeatherApiClient::new("http://127.0.0.1:1/v1/current.json", KEY);
    let err = client.fetch("Paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Network(_)));
}

#[tokio::test]
async fn waits_configured_delay_before_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let delay = Duration::from_millis(150);
    let client = WeatherApiClient::new(endpoint(&server), KEY).with_delay(delay);

    let started = Instant::now();
    client.fetch("Paris").await.expect("lookup should succeed");

    assert!(started.elapsed() >= delay);
}
