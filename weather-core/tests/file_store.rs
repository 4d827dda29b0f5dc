//! `FileStore` on a real filesystem, and preferences surviving a restart.

use std::fs;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_core::{
    FileStore, PreferenceStore, SearchController, TemperatureUnit, WeatherApiClient,
    storage::{RECENT_SEARCHES_KEY, TEMPERATURE_UNIT_KEY},
};

#[test]
fn missing_file_is_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path().join("preferences.json"));

    assert_eq!(store.load(RECENT_SEARCHES_KEY), None);
    assert_eq!(store.load(TEMPERATURE_UNIT_KEY), None);
}

#[test]
fn save_creates_parent_dirs_and_reopens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("preferences.json");

    let mut store = FileStore::open(&path);
    store.save(RECENT_SEARCHES_KEY, &json!(["Paris", "London"])).unwrap();
    store.save(TEMPERATURE_UNIT_KEY, &json!(false)).unwrap();

    let reopened = FileStore::open(&path);
    assert_eq!(reopened.load(RECENT_SEARCHES_KEY), Some(json!(["Paris", "London"])));
    assert_eq!(reopened.load(TEMPERATURE_UNIT_KEY), Some(json!(false)));
}

#[test]
fn corrupt_file_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");
    fs::write(&path, "{ not json").unwrap();

    let mut store = FileStore::open(&path);
    assert_eq!(store.load(RECENT_SEARCHES_KEY), None);

    store.save(TEMPERATURE_UNIT_KEY, &json!(true)).unwrap();
    let reopened = FileStore::open(&path);
    assert_eq!(reopened.load(TEMPERATURE_UNIT_KEY), Some(json!(true)));
}

#[test]
fn non_object_file_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");
    fs::write(&path, r#"["Paris"]"#).unwrap();

    let store = FileStore::open(&path);
    assert_eq!(store.load(RECENT_SEARCHES_KEY), None);
}

#[tokio::test]
async fn history_and_unit_survive_restart() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": { "name": "London", "region": "City of London, Greater London", "country": "United Kingdom" },
            "current": {
                "temp_c": 7.0,
                "temp_f": 44.6,
                "condition": { "text": "Overcast", "icon": "//cdn.weatherapi.com/weather/64x64/day/122.png" },
                "humidity": 87,
                "pressure_mb": 1015.0,
                "vis_km": 9.0
            }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("preferences.json");
    let endpoint = format!("{}/v1/current.json", server.uri());

    {
        let client = WeatherApiClient::new(endpoint.clone(), "KEY");
        let mut ctl = SearchController::new(client, FileStore::open(&path));
        ctl.submit("london").await;
        ctl.toggle_unit();
        assert!(ctl.record().is_some());
    }

    let client = WeatherApiClient::new(endpoint, "KEY");
    let ctl = SearchController::new(client, FileStore::open(&path));

    assert_eq!(ctl.history().entries(), ["London"]);
    assert_eq!(ctl.unit(), TemperatureUnit::Fahrenheit);
    assert!(ctl.record().is_none());
}
