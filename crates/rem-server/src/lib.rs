//! HTTP server for the REM mock store.
//!
//! Exposes the engine's dataset and item operations as REST routes, keeps
//! one isolated session per client, and initializes each session with the
//! configured default datasets on its first request.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::RemServer;
pub use session::{CurrentSession, SESSION_HEADER};
pub use state::{AppState, SharedEngine};

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use rem_engine::RemEngine;
    use rem_loader::{DatasetLoader, InMemoryLoader};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app_with(config: ServerConfig, sources: &[(&str, Value)]) -> Router {
        let loader = sources
            .iter()
            .fold(InMemoryLoader::new(), |loader, (path, value)| {
                loader.with_source(*path, value.clone())
            });
        let engine = RemEngine::with_loader(Box::new(loader) as Box<dyn DatasetLoader>)
            .configure(sources.iter().map(|(path, _)| *path));
        RemServer::with_engine(config, engine).router()
    }

    fn app() -> Router {
        app_with(
            ServerConfig::default(),
            &[
                ("data/books.json", json!([])),
                ("data/users.json", json!([{"id": 1, "name": "kim"}, {"id": 2, "name": "lee"}])),
            ],
        )
    }

    struct Reply {
        status: StatusCode,
        body: Value,
        session: Option<String>,
        set_cookie: Option<String>,
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<&str>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            builder = builder.header("x-rem-session", id);
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let header_text = |name| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let session = header_text(SESSION_HEADER);
        let set_cookie = header_text(header::SET_COOKIE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply {
            status,
            body,
            session,
            set_cookie,
        }
    }

    /// Open a session and return its id.
    async fn open_session(app: &Router) -> String {
        send(app, Method::GET, "/api/books", None, None)
            .await
            .session
            .expect("session header")
    }

    // -----------------------------------------------------------------------
    // Service endpoints
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn health_endpoint() {
        let reply = send(&app(), Method::GET, "/health", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, json!({"status": "ok"}));
        assert!(reply.session.is_none());
    }

    #[tokio::test]
    async fn info_endpoint() {
        let reply = send(&app(), Method::GET, "/info", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["datasets"], json!(["books", "users"]));
        assert_eq!(reply.body["api_prefix"], json!("/api"));
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn first_request_opens_and_initializes_session() {
        let app = app();
        let reply = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["total"], json!(2));
        let id = reply.session.unwrap();
        let cookie = reply.set_cookie.unwrap();
        assert!(cookie.starts_with(&format!("remserver={id}")));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn known_session_gets_no_new_cookie() {
        let app = app();
        let id = open_session(&app).await;
        let reply = send(&app, Method::GET, "/api/books", Some(&id), None).await;
        assert_eq!(reply.session.as_deref(), Some(id.as_str()));
        assert!(reply.set_cookie.is_none());
    }

    #[tokio::test]
    async fn session_resolves_from_cookie() {
        let app = app();
        let id = open_session(&app).await;
        send(&app, Method::POST, "/api/books", Some(&id), Some(r#"{"title":"A"}"#)).await;

        let request = Request::builder()
            .uri("/api/books")
            .header(header::COOKIE, format!("remserver={id}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["total"], json!(1));
    }

    #[tokio::test]
    async fn sessions_do_not_share_data() {
        let app = app();
        let alice = open_session(&app).await;
        let bob = open_session(&app).await;
        assert_ne!(alice, bob);

        send(&app, Method::POST, "/api/books", Some(&alice), Some(r#"{"title":"A"}"#)).await;
        let mine = send(&app, Method::GET, "/api/books", Some(&alice), None).await;
        let theirs = send(&app, Method::GET, "/api/books", Some(&bob), None).await;
        assert_eq!(mine.body["total"], json!(1));
        assert_eq!(theirs.body["total"], json!(0));
    }

    #[tokio::test]
    async fn failing_source_reports_configuration_error() {
        let engine = RemEngine::with_loader(Box::new(InMemoryLoader::new()) as Box<dyn DatasetLoader>)
            .configure(["missing/books.json"]);
        let app = RemServer::with_engine(ServerConfig::default(), engine).router();

        let reply = send(&app, Method::GET, "/api/books", None, None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = reply.body["message"].as_str().unwrap();
        assert!(message.contains("configuration error"));
        assert!(message.contains("missing/books.json"));
    }

    // -----------------------------------------------------------------------
    // Init
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn init_resets_session() {
        let app = app();
        let id = open_session(&app).await;
        send(&app, Method::DELETE, "/api/users/1", Some(&id), None).await;

        let reply = send(&app, Method::GET, "/api/init", Some(&id), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!({
                "message": "The session is initiated with the default dataset(s).",
                "dataset": ["data/books.json", "data/users.json"],
            })
        );
        let users = send(&app, Method::GET, "/api/users", Some(&id), None).await;
        assert_eq!(users.body["total"], json!(2));
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn list_paginates() {
        let app = app();
        let id = open_session(&app).await;
        for n in 0..30 {
            let body = format!(r#"{{"n": {n}}}"#);
            send(&app, Method::POST, "/api/books", Some(&id), Some(&body)).await;
        }

        let first = send(&app, Method::GET, "/api/books", Some(&id), None).await;
        assert_eq!(first.body["data"].as_array().unwrap().len(), 25);
        assert_eq!(first.body["offset"], json!(0));
        assert_eq!(first.body["limit"], json!(25));
        assert_eq!(first.body["total"], json!(30));

        let rest = send(&app, Method::GET, "/api/books?offset=25&limit=25", Some(&id), None).await;
        let data = rest.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 5);
        assert_eq!(data[0]["id"], json!(26));
        assert_eq!(rest.body["total"], json!(30));
    }

    #[tokio::test]
    async fn list_unknown_dataset_is_empty_page() {
        let app = app();
        let reply = send(&app, Method::GET, "/api/nothing", None, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(
            reply.body,
            json!({"data": [], "offset": 0, "limit": 25, "total": 0})
        );
    }

    #[tokio::test]
    async fn configured_default_limit_applies() {
        let config = ServerConfig {
            default_limit: 1,
            ..Default::default()
        };
        let app = app_with(config, &[("users.json", json!([{"id": 1}, {"id": 2}]))]);
        let reply = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(reply.body["data"], json!([{"id": 1}]));
        assert_eq!(reply.body["limit"], json!(1));
    }

    // -----------------------------------------------------------------------
    // Item CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn books_scenario_over_http() {
        let app = app();
        let id = open_session(&app).await;

        let a = send(&app, Method::POST, "/api/books", Some(&id), Some(r#"{"title":"A"}"#)).await;
        assert_eq!(a.status, StatusCode::OK);
        assert_eq!(a.body, json!({"title": "A", "id": 1}));
        let b = send(&app, Method::POST, "/api/books", Some(&id), Some(r#"{"title":"B"}"#)).await;
        assert_eq!(b.body["id"], json!(2));

        let deleted = send(&app, Method::DELETE, "/api/books/1", Some(&id), None).await;
        assert_eq!(
            deleted.body,
            json!({"message": "Item id '1' was deleted from dataset 'books'."})
        );

        let list = send(&app, Method::GET, "/api/books", Some(&id), None).await;
        assert_eq!(list.body["data"], json!([{"title": "B", "id": 2}]));
    }

    #[tokio::test]
    async fn get_item_found_and_not_found() {
        let app = app();
        let id = open_session(&app).await;
        let found = send(&app, Method::GET, "/api/users/2", Some(&id), None).await;
        assert_eq!(found.body, json!({"id": 2, "name": "lee"}));

        let missing = send(&app, Method::GET, "/api/users/99", Some(&id), None).await;
        assert_eq!(missing.status, StatusCode::OK);
        assert_eq!(missing.body, json!({"message": "The item is not found."}));
    }

    #[tokio::test]
    async fn put_forces_path_id_and_replaces_in_place() {
        let app = app();
        let id = open_session(&app).await;
        let put = send(
            &app,
            Method::PUT,
            "/api/users/1",
            Some(&id),
            Some(r#"{"id": 500, "name": "park"}"#),
        )
        .await;
        assert_eq!(put.body, json!({"id": 1, "name": "park"}));

        let list = send(&app, Method::GET, "/api/users", Some(&id), None).await;
        assert_eq!(
            list.body["data"],
            json!([{"id": 1, "name": "park"}, {"id": 2, "name": "lee"}])
        );
    }

    #[tokio::test]
    async fn put_unknown_id_appends() {
        let app = app();
        let id = open_session(&app).await;
        send(&app, Method::PUT, "/api/users/10", Some(&id), Some(r#"{"name": "choi"}"#)).await;
        let list = send(&app, Method::GET, "/api/users", Some(&id), None).await;
        assert_eq!(list.body["total"], json!(3));
        assert_eq!(list.body["data"][2], json!({"name": "choi", "id": 10}));
    }

    #[tokio::test]
    async fn post_after_max_id_gets_distinct_id() {
        let app = app();
        let id = open_session(&app).await;
        let uri = format!("/api/books/{}", i64::MAX);
        let top = send(&app, Method::PUT, &uri, Some(&id), Some(r#"{"title":"top"}"#)).await;
        assert_eq!(top.body["id"], json!(i64::MAX));

        let added = send(&app, Method::POST, "/api/books", Some(&id), Some(r#"{"title":"A"}"#)).await;
        assert_eq!(added.status, StatusCode::OK);
        assert_eq!(added.body["id"], json!(1));
    }

    #[tokio::test]
    async fn delete_missing_item_still_confirms() {
        let app = app();
        let id = open_session(&app).await;
        let reply = send(&app, Method::DELETE, "/api/users/77", Some(&id), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        let list = send(&app, Method::GET, "/api/users", Some(&id), None).await;
        assert_eq!(list.body["total"], json!(2));
    }

    // -----------------------------------------------------------------------
    // Errors
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn malformed_body_is_fixed_500() {
        let app = app();
        for body in ["{not json", "[1, 2]", "\"text\"", ""] {
            let reply = send(&app, Method::POST, "/api/books", None, Some(body)).await;
            assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                reply.body,
                json!({"message": "500. HTTP request body is not an object/array or valid JSON."})
            );
        }
        let put = send(&app, Method::PUT, "/api/books/1", None, Some("nope")).await;
        assert_eq!(put.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unsupported_routes_are_404() {
        let app = app();
        let cases = [
            (Method::GET, "/nowhere"),
            (Method::GET, "/api/books/1/extra"),
            (Method::GET, "/api/books/abc"),
            (Method::PATCH, "/api/books/1"),
            (Method::DELETE, "/api/books"),
            (Method::POST, "/api/init"),
        ];
        for (method, uri) in cases {
            let reply = send(&app, method.clone(), uri, None, None).await;
            assert_eq!(reply.status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(
                reply.body,
                json!({"message": "404. The api does not support that."}),
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn routes_mount_at_root_with_empty_prefix() {
        let config = ServerConfig {
            api_prefix: "/".into(),
            ..Default::default()
        };
        let app = app_with(config, &[("books.json", json!([{"id": 1}]))]);
        let reply = send(&app, Method::GET, "/books/1", None, None).await;
        assert_eq!(reply.body, json!({"id": 1}));
        let health = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(health.body, json!({"status": "ok"}));
    }
}
