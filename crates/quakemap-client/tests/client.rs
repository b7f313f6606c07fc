//! Integration tests for `EarthquakeClient` using wiremock HTTP mocks.

use quakemap_core::{GeoPoint, RadiusSearchRequest, Ring};
use quakemap_client::{ClientError, EarthquakeClient};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> EarthquakeClient {
    EarthquakeClient::with_base_url(base_url, 30, "quakemap-test")
        .expect("client construction should not fail")
}

fn triangle() -> Ring {
    Ring::new(vec![
        GeoPoint::new(0.0, 10.0).unwrap(),
        GeoPoint::new(5.0, 20.0).unwrap(),
        GeoPoint::new(10.0, 10.0).unwrap(),
    ])
    .expect("triangle is a valid ring")
}

#[tokio::test]
async fn list_sends_limit_and_parses_records() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id": "us7000abcd",
            "magnitude": 4.6,
            "place": "south of the Fiji Islands",
            "time": "2026-08-29T03:12:45Z",
            "depth": 520.3,
            "latitude": -24.1,
            "longitude": -178.9,
            "url": "https://example.org/eq/us7000abcd"
        },
        { "id": "nc100200300", "magnitude": null, "depth": null }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/earthquakes"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let records = client.list(500, None).await.expect("should parse records");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "us7000abcd");
    assert_eq!(records[0].magnitude, Some(4.6));
    assert_eq!(records[0].longitude, Some(-178.9));
    assert!(records[1].magnitude.is_none());
    assert!(records[1].latitude.is_none());
}

#[tokio::test]
async fn list_forwards_min_magnitude_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/earthquakes"))
        .and(query_param("limit", "100"))
        .and(query_param("min_magnitude", "3.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let records = client
        .list(100, Some(3.5))
        .await
        .expect("empty list should parse");
    assert!(records.is_empty());
}

#[tokio::test]
async fn sync_parses_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/earthquakes/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "sync complete: 120 events processed",
            "total_received": 311
        })))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let response = client.sync().await.expect("should parse sync response");
    assert_eq!(response.message, "sync complete: 120 events processed");
    assert_eq!(response.total_received, Some(311));
}

#[tokio::test]
async fn search_radius_posts_storage_coordinates() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "latitude": 38.0,
        "longitude": -122.5,
        "radius_km": 250.0
    });

    Mock::given(method("POST"))
        .and(path("/api/earthquakes/search/radius"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "nc73999999", "magnitude": 3.1, "distance_km": 12.4 }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let records = client
        .search_radius(&RadiusSearchRequest {
            latitude: 38.0,
            longitude: -122.5,
            radius_km: 250.0,
        })
        .await
        .expect("should parse radius results");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].distance_km, Some(12.4));
}

#[tokio::test]
async fn search_region_posts_closed_wkt() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "polygon_wkt": "POLYGON((10 0, 20 5, 10 10, 10 0))"
    });

    Mock::given(method("POST"))
        .and(path("/api/earthquakes/search/region"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "us6000xyz1", "magnitude": 5.0 }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let records = client
        .search_region(&triangle())
        .await
        .expect("should parse region results");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "us6000xyz1");
}

#[tokio::test]
async fn stats_parses_nested_aggregates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/earthquakes/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_earthquakes": 4021,
            "recent_24h": 97,
            "magnitude_stats": { "average": 1.9, "maximum": 6.4, "minimum": 0.2 },
            "depth_stats": { "average": 22.7, "maximum": 611.0, "minimum": 0.0 }
        })))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let stats = client.stats().await.expect("should parse stats");
    assert_eq!(stats.total_earthquakes, 4021);
    assert_eq!(stats.recent_24h, 97);
    assert!((stats.magnitude_stats.maximum - 6.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn boundary_stats_posts_id_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/earthquakes/boundary"))
        .and(body_json(serde_json::json!(["a1", "b2"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_count": 2,
            "center_point": "POINT(130 10)",
            "bounding_box": "POLYGON((129 9, 131 9, 131 11, 129 11, 129 9))",
            "convex_hull": "POLYGON((129 9, 131 9, 130 11, 129 9))",
            "area_km2": 24000.5
        })))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let boundary = client
        .boundary_stats(&["a1".to_string(), "b2".to_string()])
        .await
        .expect("should parse boundary stats");
    assert_eq!(boundary.total_count, 2);
    assert_eq!(boundary.center_point, "POINT(130 10)");
}

#[tokio::test]
async fn http_error_status_surfaces_as_client_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/earthquakes/stats"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let result = client.stats().await;
    assert!(matches!(result, Err(ClientError::Http(_))));
}

#[tokio::test]
async fn malformed_body_surfaces_as_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/earthquakes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&format!("{}/api", server.uri()));
    let result = client.list(10, None).await;
    assert!(matches!(result, Err(ClientError::Deserialize { .. })));
}
