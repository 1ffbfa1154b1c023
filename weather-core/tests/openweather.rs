//! OpenWeatherProvider against a mock HTTP server.

use std::time::Duration;

use weather_core::{
    Config, Endpoints, FetchError, Locator, OpenWeatherProvider, WeatherProvider,
    error::TRANSPORT_MESSAGE,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEO_PATH: &str = "/geo/1.0/direct";
const WEATHER_PATH: &str = "/data/2.5/weather";

fn endpoints_for(server: &MockServer) -> Endpoints {
    Endpoints {
        geocoding_url: format!("{}{GEO_PATH}", server.uri()),
        weather_url: format!("{}{WEATHER_PATH}", server.uri()),
    }
}

fn provider_with_timeout(server: &MockServer, timeout: Option<Duration>) -> OpenWeatherProvider {
    OpenWeatherProvider::new("KEY".into(), endpoints_for(server), timeout).expect("provider")
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    provider_with_timeout(server, Some(Duration::from_secs(5)))
}

fn london_payload() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ],
        "main": {
            "temp": 12.5, "feels_like": 11.8, "temp_min": 11.0, "temp_max": 13.9,
            "pressure": 1012, "humidity": 63
        },
        "visibility": 10000,
        "wind": { "speed": 4.1, "deg": 50 },
        "sys": { "country": "GB", "sunrise": 1700000000, "sunset": 1700030000 },
        "name": "London",
        "cod": 200
    })
}

fn geo_entry(name: &str, state: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "local_names": { "en": name },
        "lat": 51.5073,
        "lon": -0.1276,
        "country": "GB",
        "state": state
    })
}

#[tokio::test]
async fn search_locations_sends_query_and_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .and(query_param("q", "Lon"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            geo_entry("London", Some("England")),
            geo_entry("Londonderry", None),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let candidates = provider_for(&server)
        .search_locations("Lon")
        .await
        .expect("candidates");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].display_name(), "London, GB, England");
    assert_eq!(candidates[1].display_name(), "Londonderry, GB");
    assert_eq!(candidates[0].key(), (51.5073, -0.1276));
}

#[tokio::test]
async fn search_locations_caps_results() {
    let server = MockServer::start().await;
    let many: Vec<_> = (0..7)
        .map(|i| geo_entry(&format!("Springfield {i}"), None))
        .collect();

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(many))
        .mount(&server)
        .await;

    let candidates = provider_for(&server)
        .search_locations("Spring")
        .await
        .expect("candidates");
    assert_eq!(candidates.len(), 5);
}

#[tokio::test]
async fn search_locations_failure_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .search_locations("Lon")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn current_weather_by_city_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = provider_for(&server)
        .current_weather(&Locator::CityName("  London ".into()))
        .await
        .expect("snapshot");

    assert_eq!(snapshot.name, "London");
    assert_eq!(snapshot.condition, "Clouds");
    assert_eq!(snapshot.description, "broken clouds");
    assert_eq!(snapshot.icon, "04d");
    assert_eq!(snapshot.temperature_c, 12.5);
    assert_eq!(snapshot.feels_like_c, 11.8);
    assert_eq!(snapshot.pressure_hpa, 1012);
    assert_eq!(snapshot.humidity_pct, 63);
    assert_eq!(snapshot.wind_speed_mps, 4.1);
    assert_eq!(snapshot.wind_deg, Some(50.0));
    assert_eq!(snapshot.visibility_m, Some(10000));
    assert_eq!(snapshot.sunrise, 1_700_000_000);
    assert_eq!(snapshot.sunset, 1_700_030_000);
}

#[tokio::test]
async fn city_name_is_escaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("q", "São Paulo & co"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
        .expect(1)
        .mount(&server)
        .await;

    provider_for(&server)
        .current_weather(&Locator::CityName("São Paulo & co".into()))
        .await
        .expect("snapshot");
}

#[tokio::test]
async fn current_weather_by_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("lat", "51.5073"))
        .and(query_param("lon", "-0.1276"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let locator = Locator::Coordinates {
        lat: 51.5073,
        lon: -0.1276,
        label: "London, GB, England".into(),
    };
    let snapshot = provider_for(&server)
        .current_weather(&locator)
        .await
        .expect("snapshot");

    // Labels are applied by the fetcher, not the provider.
    assert_eq!(snapshot.name, "London");
}

#[tokio::test]
async fn city_not_found_is_a_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current_weather(&Locator::CityName("Zzzxxqq".into()))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Provider("city not found".into()));
    assert_eq!(err.user_message(), "city not found");
}

#[tokio::test]
async fn error_payload_with_ok_status_is_a_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 400,
            "message": "wrong latitude"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current_weather(&Locator::CityName("x".into()))
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Provider("wrong latitude".into()));
}

#[tokio::test]
async fn unparseable_body_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current_weather(&Locator::CityName("London".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.user_message(), TRANSPORT_MESSAGE);
}

#[tokio::test]
async fn success_payload_with_wrong_shape_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cod": 200 })),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current_weather(&Locator::CityName("London".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    drop(server);

    let err = provider
        .current_weather(&Locator::CityName("London".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn transport_errors_never_carry_the_api_key() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    drop(server);

    let err = provider.search_locations("Lon").await.unwrap_err();
    let text = err.to_string();

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(!text.contains("appid"), "{text}");
    assert!(!text.contains("KEY"), "{text}");
}

#[tokio::test]
async fn slow_response_times_out_as_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_payload())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = provider_with_timeout(&server, Some(Duration::from_millis(200)))
        .current_weather(&Locator::CityName("London".into()))
        .await
        .unwrap_err();
    let text = err.to_string();

    assert!(matches!(err, FetchError::Transport(_)));
    assert_eq!(err.user_message(), TRANSPORT_MESSAGE);
    assert!(!text.contains("appid"), "{text}");
    assert!(!text.contains("KEY"), "{text}");
}

#[tokio::test]
async fn without_timeout_slow_responses_still_arrive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_payload())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let snapshot = provider_with_timeout(&server, None)
        .current_weather(&Locator::CityName("London".into()))
        .await
        .expect("snapshot");
    assert_eq!(snapshot.name, "London");
}

#[test]
fn zero_timeout_in_config_disables_it() {
    let mut config = Config::default();
    config.set_api_key("KEY".into());

    let provider = OpenWeatherProvider::from_config(&config).expect("provider");
    assert_eq!(provider.timeout(), Some(Duration::from_secs(10)));

    config.search.request_timeout_secs = 0;
    let provider = OpenWeatherProvider::from_config(&config).expect("provider");
    assert_eq!(provider.timeout(), None);
}
