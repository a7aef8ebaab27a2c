//! OpenWeatherMap client tests against a wiremock server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_watch::config::ProviderConfig;
use weather_watch::provider::{OpenWeatherMapProvider, WeatherProvider};

fn provider_for(server: &MockServer) -> OpenWeatherMapProvider {
    let config = ProviderConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
    };
    OpenWeatherMapProvider::new(&config).unwrap()
}

#[tokio::test]
async fn test_current_weather_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Chennai"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Chennai",
            "main": {"temp": 305.15, "feels_like": 309.65, "humidity": 70},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain"}],
            "dt": 1717243200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let obs = provider_for(&server).current("Chennai").await.unwrap();
    assert_eq!(obs.name, "Chennai");
    assert_eq!(obs.temp_kelvin, 305.15);
    assert_eq!(obs.feels_like_kelvin, 309.65);
    assert_eq!(obs.condition, "Rain");
    assert_eq!(obs.observed_at, 1717243200);
}

#[tokio::test]
async fn test_non_success_status_is_error_without_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server).current("Delhi").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("401"), "unexpected error: {}", msg);
    assert!(!msg.contains("test-key"));
}

#[tokio::test]
async fn test_malformed_payload_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": \"Delhi\"}"))
        .mount(&server)
        .await;

    assert!(provider_for(&server).current("Delhi").await.is_err());
}

#[tokio::test]
async fn test_connection_failure_does_not_leak_key() {
    let config = ProviderConfig {
        // Nothing listens on port 9 (discard) in the test environment.
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 2,
    };
    let provider = OpenWeatherMapProvider::new(&config).unwrap();
    let err = provider.current("Delhi").await.unwrap_err();
    assert!(!format!("{:#}", err).contains("test-key"));
}
