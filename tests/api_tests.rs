//! HTTP client tests against a mock wttr.in using wiremock

use std::time::Duration;

use pretty_assertions::assert_eq;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};
use wttr_tui::{
    action::Action,
    api::{FetchError, WeatherClient},
    config::ClientConfig,
    effect,
};

fn sample_payload() -> serde_json::Value {
    serde_json::json!({
        "current_condition": [{
            "temp_C": "21",
            "FeelsLikeC": "21",
            "windspeedKmph": "10",
            "humidity": "50",
            "weatherCode": "113",
            "weatherDesc": [{ "value": "Sunny" }]
        }],
        "nearest_area": [{
            "areaName": [{ "value": "London" }],
            "country": [{ "value": "United Kingdom" }]
        }]
    })
}

#[allow(clippy::expect_used)]
fn create_test_client(mock_server: &MockServer) -> WeatherClient {
    let config = ClientConfig::new(mock_server.uri()).with_timeout_secs(Some(5));
    WeatherClient::new(config).expect("Failed to create client")
}

async fn setup_city_mock(mock_server: &MockServer, city_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(city_path))
        .and(query_param("format", "j1"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_fetch_current_success() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_json(sample_payload()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("London").await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let report = result.unwrap();
    assert_eq!(report.area_name, "London");
    assert_eq!(report.country, "United Kingdom");
    assert_eq!(report.temp_c, "21");
    assert_eq!(report.feels_like_c, "21");
    assert_eq!(report.windspeed_kmph, "10");
    assert_eq!(report.humidity, "50");
    assert_eq!(report.description, "Sunny");
    assert_eq!(report.weather_code, "113");
}

#[tokio::test]
async fn test_city_is_percent_encoded() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/New%20York",
        ResponseTemplate::new(200).set_body_json(sample_payload()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("New York").await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_json_content_type_with_charset() {
    let mock_server = MockServer::start().await;
    let body = serde_json::to_vec(&sample_payload()).unwrap();
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_raw(body, "Application/JSON; charset=utf-8"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("London").await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_missing_area_falls_back_to_city() {
    let mock_server = MockServer::start().await;
    let mut payload = sample_payload();
    payload
        .as_object_mut()
        .unwrap()
        .remove("nearest_area");
    setup_city_mock(
        &mock_server,
        "/Atlantis",
        ResponseTemplate::new(200).set_body_json(payload),
    )
    .await;

    let client = create_test_client(&mock_server);
    let report = client.fetch_current("Atlantis").await.unwrap();

    assert_eq!(report.area_name, "Atlantis");
    assert_eq!(report.country, "");
}

// ============================================================================
// Error scenarios
// ============================================================================

#[tokio::test]
async fn test_not_found_status() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/Qwxyzzz",
        ResponseTemplate::new(404).set_body_string("Unknown location"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("Qwxyzzz").await;

    assert!(
        matches!(result, Err(FetchError::NotFound { ref city }) if city == "Qwxyzzz"),
        "Expected NotFound, got: {result:?}"
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "'Qwxyzzz' not found. Please check the spelling or try another location."
    );
}

#[tokio::test]
async fn test_server_error_reports_not_found() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(500).set_body_json(sample_payload()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("London").await;

    assert!(
        matches!(result, Err(FetchError::NotFound { .. })),
        "Expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn test_html_response_is_unexpected_format() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_raw("<html>busy</html>", "text/html"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("London").await;

    assert!(
        matches!(result, Err(FetchError::UnexpectedFormat)),
        "Expected UnexpectedFormat, got: {result:?}"
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Received an unexpected response from the weather service."
    );
}

#[tokio::test]
async fn test_missing_current_condition_is_incomplete() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "nearest_area": [] })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("London").await;

    assert!(
        matches!(result, Err(FetchError::IncompleteData)),
        "Expected IncompleteData, got: {result:?}"
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Weather data for this location is incomplete. Please try another city."
    );
}

#[tokio::test]
async fn test_empty_current_condition_is_incomplete() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "current_condition": [] })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.fetch_current("London").await;

    assert!(matches!(result, Err(FetchError::IncompleteData)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfig::new("http://127.0.0.1:1").with_timeout_secs(Some(5));
    let client = WeatherClient::new(config).unwrap();

    let result = client.fetch_current("London").await;

    assert!(
        matches!(result, Err(FetchError::Network(_))),
        "Expected Network, got: {result:?}"
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Could not connect to the weather service. Please check your internet connection."
    );
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200)
            .set_body_json(sample_payload())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = ClientConfig::new(mock_server.uri()).with_timeout_secs(Some(1));
    let client = WeatherClient::new(config).unwrap();
    let result = client.fetch_current("London").await;

    assert!(
        matches!(result, Err(FetchError::Network(ref e)) if e.is_timeout()),
        "Expected Network timeout, got: {result:?}"
    );
}

// ============================================================================
// Effect task
// ============================================================================

#[tokio::test]
async fn test_fetch_weather_effect_emits_did_load() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_json(sample_payload()),
    )
    .await;

    let client = create_test_client(&mock_server);
    let action = effect::fetch_weather(client, 7, "London".into()).await;

    match action {
        Action::WeatherDidLoad { request_id, report } => {
            assert_eq!(request_id, 7);
            assert_eq!(report.description, "Sunny");
        }
        other => panic!("Expected WeatherDidLoad, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_weather_effect_emits_did_error() {
    let mock_server = MockServer::start().await;
    setup_city_mock(&mock_server, "/Qwxyzzz", ResponseTemplate::new(404)).await;

    let client = create_test_client(&mock_server);
    let action = effect::fetch_weather(client, 3, "Qwxyzzz".into()).await;

    assert_eq!(
        action,
        Action::WeatherDidError {
            request_id: 3,
            message: "'Qwxyzzz' not found. Please check the spelling or try another location."
                .into(),
        }
    );
}

#[tokio::test]
async fn test_fetch_weather_effect_times_out_with_network_message() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200)
            .set_body_json(sample_payload())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let config = ClientConfig::new(mock_server.uri()).with_timeout_secs(Some(1));
    let client = WeatherClient::new(config).unwrap();
    let action = effect::fetch_weather(client, 5, "London".into()).await;

    assert_eq!(
        action,
        Action::WeatherDidError {
            request_id: 5,
            message: "Could not connect to the weather service. Please check your internet connection."
                .into(),
        }
    );
}

#[tokio::test]
async fn test_search_after_cancelled_fetch_completes() {
    let mock_server = MockServer::start().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200)
            .set_body_json(sample_payload())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let cancelled = tokio::time::timeout(
        Duration::from_millis(500),
        effect::fetch_weather(client.clone(), 1, "London".into()),
    )
    .await;
    assert!(cancelled.is_err(), "Expected the fetch to still be in flight");

    // The replacement search still completes normally.
    mock_server.reset().await;
    setup_city_mock(
        &mock_server,
        "/London",
        ResponseTemplate::new(200).set_body_json(sample_payload()),
    )
    .await;
    let action = effect::fetch_weather(client, 2, "London".into()).await;
    assert!(matches!(action, Action::WeatherDidLoad { request_id: 2, .. }));
}
