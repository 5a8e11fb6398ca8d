//! HTTP handlers and routing
//!
//! Every route family speaks Collection+JSON. Handlers parse filters from the
//! query string, call the service layer and render the result; failures are
//! returned as [`ClassifiedError`](crate::classify::ClassifiedError) and
//! rendered by [`render_errors`] with the request URI.
//!
//! | Path | Methods |
//! |------|---------|
//! | `/api/devices[/{id}]` | GET POST PUT DELETE |
//! | `/api/devices/{id}/group\|type\|icon\|configuration\|locations\|measurements` | GET |
//! | `/api/device-groups[/{id}]` | GET POST PUT DELETE |
//! | `/api/device-groups/{id}/devices` | GET POST |
//! | `/api/device-groups/{id}/locations\|measurements` | GET DELETE |
//! | `/api/device-types[/{id}]` | GET POST PUT DELETE |
//! | `/api/device-types/{id}/devices` | GET POST |
//! | `/api/device-types/{id}/icon` | GET PUT DELETE |
//! | `/api/device-icons[/{id}]` | GET POST PUT DELETE |
//! | `/api/device-icons/{name}.png` | GET |
//! | `/api/device-icons/{id}/types` | GET POST |
//! | `/api/configurations[/{id}]` | GET POST PUT DELETE |
//! | `/api/configurations/{id}/devices` | GET POST |
//! | `/api/locations`, `/api/measurements` | GET POST DELETE |

mod configurations;
mod devices;
mod error;
mod groups;
mod icons;
mod query;
mod response;
mod series;
mod types;

pub use error::{
    not_found_route, panic_response, render_errors, unsupported_method, JsonBody, PathId,
};
pub use query::QueryParams;
pub use response::{collection, no_content, require_items, single, Reply};

use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
};

use crate::config::Config;
use crate::health::{health, readiness};
use crate::middleware::BasicAuth;
use crate::repository::Store;
use crate::state::AppState;

/// Build the application router over `state`
pub fn router<S: Store>(state: AppState<S>) -> Router {
    let routes = Router::new()
        .merge(devices::routes())
        .merge(groups::routes())
        .merge(types::routes())
        .merge(icons::routes())
        .merge(configurations::routes())
        .merge(series::routes())
        .route("/health", get(health::<S>))
        .route("/ready", get(readiness::<S>));

    #[cfg(feature = "openapi")]
    let routes = routes.merge(crate::openapi::routes());

    let routes = routes
        .method_not_allowed_fallback(unsupported_method)
        .fallback(not_found_route);

    with_request_guards(routes, state.config()).with_state(state)
}

/// Wrap routes in the per-request guards
///
/// Basic authentication covers everything except the configured public
/// paths. Error rendering is the outermost layer, so 401, 408, 413 and panic
/// bodies are Collection+JSON documents carrying the request URI too.
fn with_request_guards<S: Store>(
    routes: Router<AppState<S>>,
    config: &Config,
) -> Router<AppState<S>> {
    let auth = BasicAuth::new(&config.auth);
    let body_limit = config
        .middleware
        .body_limit_mb
        .saturating_mul(1024 * 1024);

    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.service.timeout_secs),
        ))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::from_fn_with_state(auth, BasicAuth::middleware))
        .layer(middleware::from_fn(render_errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::COLLECTION_JSON;
    use crate::domain::{
        time, ConfigurationInput, DeviceGroupInput, DeviceInput, DeviceTypeInput, LocationInput,
    };
    use crate::repository::memory::MemoryStore;
    use crate::repository::Repository;
    use crate::validation::MINIMUM_FILTERS_MESSAGE;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        store: MemoryStore,
        _icons: TempDir,
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.auth.username = Some("admin".into());
        config.auth.password = Some("admin".into());
        config
    }

    fn app() -> TestApp {
        app_with(test_config())
    }

    fn app_with(mut config: Config) -> TestApp {
        let icons = tempfile::tempdir().unwrap();
        config.icons.root = icons.path().to_path_buf();
        let store = MemoryStore::new();
        TestApp {
            router: router(AppState::new(config, store.clone())),
            store,
            _icons: icons,
        }
    }

    fn request(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, "localhost")
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", STANDARD.encode("admin:admin")),
            )
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        request(method, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        request(method, uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn property<'a>(document: &'a Value, item: usize, name: &str) -> &'a Value {
        document["collection"]["items"][item]["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|property| property["name"] == name)
            .map(|property| &property["value"])
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_device_generates_key_and_null_markers() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/devices", json!({"name": "test-device"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(property(&body, 0, "id").is_i64());
        assert_eq!(property(&body, 0, "authenticationKey").as_str().unwrap().len(), 32);
        assert!(property(&body, 0, "deviceTypeId").is_null());
        assert!(property(&body, 0, "deviceGroupId").is_null());
        assert!(property(&body, 0, "configurationId").is_null());
    }

    #[tokio::test]
    async fn test_group_without_locations_is_not_found() {
        let app = app();
        let group = app.store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        let input = DeviceInput {
            device_group_id: Some(group.id),
            ..DeviceInput::named("d")
        };
        app.store.devices().add(input).await.unwrap();

        let uri = format!("/api/device-groups/{}/locations", group.id);
        let (status, body) = send(&app, empty_request(Method::GET, &uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["collection"]["error"]["code"], "1002");
        assert_eq!(
            body["collection"]["href"],
            format!("http://localhost{}", uri)
        );
    }

    #[tokio::test]
    async fn test_group_window_delete_keeps_other_rows() {
        let app = app();
        let group = app.store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        let input = DeviceInput {
            device_group_id: Some(group.id),
            ..DeviceInput::named("d")
        };
        let device = app.store.devices().add(input).await.unwrap();
        for at in ["01-01-2017 00:00:10", "01-01-2017 00:00:20"] {
            let location = LocationInput::new(device.id, 1.5, 2.5).at(time::parse(at).unwrap());
            app.store.locations().add(location).await.unwrap();
        }

        let uri = format!(
            "/api/device-groups/{}/locations?startTime=01-01-2017%2000:00:05&endTime=01-01-2017%2000:00:15",
            group.id
        );
        let (status, _) = send(&app, empty_request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let uri = format!("/api/device-groups/{}/locations", group.id);
        let (status, body) = send(&app, empty_request(Method::GET, &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["collection"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(property(&body, 0, "deviceId"), &json!(device.id));
        assert_eq!(property(&body, 0, "latitude"), &json!(1.5));
        assert_eq!(property(&body, 0, "longitude"), &json!(2.5));
        assert_eq!(property(&body, 0, "time"), "01-01-2017 00:00:20");
    }

    #[tokio::test]
    async fn test_delete_without_filters_is_rejected() {
        let app = app();
        app.store.devices().add(DeviceInput::named("d")).await.unwrap();

        let (status, body) = send(&app, empty_request(Method::DELETE, "/api/devices")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["collection"]["error"]["message"], MINIMUM_FILTERS_MESSAGE);

        let (status, _) = send(&app, empty_request(Method::GET, "/api/devices")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_found() {
        let app = app();
        let (status, body) = send(&app, empty_request(Method::GET, "/api/device-groups?id=7")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["collection"]["error"]["title"], "Get device groups failed");
        assert_eq!(
            body["collection"]["error"]["message"],
            "Items not found using given parameters: [id: 7, name: null]"
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let app = app();
        let body = json!({"name": "lobby"});
        let (status, _) = send(&app, json_request(Method::POST, "/api/device-groups", body.clone())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, json_request(Method::POST, "/api/device-groups", body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["collection"]["error"]["code"], "1004");
    }

    #[tokio::test]
    async fn test_invalid_path_id() {
        let app = app();
        let (status, body) = send(&app, empty_request(Method::GET, "/api/devices/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["collection"]["error"]["message"],
            "Invalid value (abc) for parameter id"
        );
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let app = app();
        let request = request(Method::POST, "/api/devices")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["collection"]["error"]["message"], "Request body missing or invalid");
    }

    #[tokio::test]
    async fn test_unsupported_method_and_unknown_route() {
        let app = app();
        let (status, body) = send(&app, empty_request(Method::PUT, "/api/locations")).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["collection"]["error"]["title"], "HTTP request error");
        assert_eq!(body["collection"]["error"]["code"], "1003");

        let (status, body) = send(&app, empty_request(Method::GET, "/api/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["collection"]["error"]["code"], "1002");
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let app = app();
        let request = Request::builder()
            .uri("/api/devices")
            .header(header::HOST, "localhost")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"Device Manager\""
        );

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_without_filters_leaves_rows() {
        let app = app();
        app.store.devices().add(DeviceInput::named("keep")).await.unwrap();
        app.store.groups().add(DeviceGroupInput::named("keep")).await.unwrap();
        app.store.types().add(DeviceTypeInput::named("keep")).await.unwrap();
        app.store
            .configurations()
            .add(ConfigurationInput::named("keep"))
            .await
            .unwrap();

        for path in [
            "/api/devices",
            "/api/device-groups",
            "/api/device-types",
            "/api/configurations",
        ] {
            let (status, body) =
                send(&app, json_request(Method::PUT, path, json!({"name": "changed"}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
            assert_eq!(body["collection"]["error"]["message"], MINIMUM_FILTERS_MESSAGE);

            let (status, body) = send(&app, empty_request(Method::GET, path)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["collection"]["items"].as_array().unwrap().len(), 1);
            assert_eq!(property(&body, 0, "name"), "keep", "{path}");
        }
    }

    #[tokio::test]
    async fn test_repeated_get_is_byte_identical() {
        let app = app();
        let group = app.store.groups().add(DeviceGroupInput::named("g")).await.unwrap();
        for name in ["a", "b"] {
            let input = DeviceInput {
                device_group_id: Some(group.id),
                ..DeviceInput::named(name)
            };
            app.store.devices().add(input).await.unwrap();
        }

        let uri = format!("/api/devices?deviceGroupId={}", group.id);
        let mut bodies = Vec::new();
        for _ in 0..2 {
            let response = app
                .router
                .clone()
                .oneshot(empty_request(Method::GET, &uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            bodies.push(bytes);
        }
        assert_eq!(bodies[0], bodies[1]);
    }

    #[tokio::test]
    async fn test_oversized_body_is_collection_error() {
        let mut config = test_config();
        config.middleware.body_limit_mb = 1;
        let app = app_with(config);

        let body = vec![b' '; 2 * 1024 * 1024];
        let request = request(Method::POST, "/api/devices")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONTENT_TYPE], COLLECTION_JSON);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document["collection"]["href"], "http://localhost/api/devices");
        assert_eq!(document["collection"]["error"]["code"], "1001");
        assert_eq!(
            document["collection"]["error"]["message"],
            "Request body exceeds the size limit"
        );
    }

    #[tokio::test]
    async fn test_slow_request_is_collection_error() {
        let mut config = test_config();
        config.service.timeout_secs = 1;
        let slow = Router::new().route(
            "/api/slow",
            get(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                "late"
            }),
        );
        let state = AppState::new(config.clone(), MemoryStore::new());
        let router = with_request_guards(slow, &config).with_state(state);

        let response = router
            .oneshot(empty_request(Method::GET, "/api/slow"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(document["collection"]["href"], "http://localhost/api/slow");
        assert_eq!(document["collection"]["error"]["title"], "HTTP request error");
        assert_eq!(document["collection"]["error"]["message"], "Request timed out");
    }

    #[tokio::test]
    async fn test_icon_upload_and_download() {
        let app = app();
        let image: &[u8] = b"\x89PNG\r\n\x1a\nfake";
        let mut body = Vec::new();
        body.extend_from_slice(
            b"--boundary\r\nContent-Disposition: form-data; name=\"icon\"; filename=\"lamp.png\"\r\nContent-Type: image/png\r\n\r\n",
        );
        body.extend_from_slice(image);
        body.extend_from_slice(b"\r\n--boundary--\r\n");

        let upload = request(Method::POST, "/api/device-icons?name=lamp.png")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=boundary")
            .body(Body::from(body))
            .unwrap();
        let (status, document) = send(&app, upload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(property(&document, 0, "name"), "lamp.png");

        let response = app
            .router
            .clone()
            .oneshot(empty_request(Method::GET, "/api/device-icons/lamp.png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], image);
    }
}
