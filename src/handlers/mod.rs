pub mod projects;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth;
use crate::state::AppState;

/// GET / - liveness banner
pub async fn index() -> &'static str {
    "CipherStudio API running"
}

/// Full route table with request tracing. CORS is layered on by the caller.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile).put(auth::update_profile));

    let project_routes = Router::new()
        .route("/", get(projects::list_projects).post(projects::create_project))
        .route(
            "/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        );

    Router::new()
        .route("/", get(index))
        .nest("/api/users", user_routes)
        .nest("/api/projects", project_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentialed CORS for the configured frontend origins
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            // A wildcard cannot be combined with credentialed requests
            if origin.trim() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
                return None;
            }
            match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;

    fn server(origins: &[&str]) -> TestServer {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        let app = Router::new().route("/", get(index)).layer(cors_layer(&origins));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let server = server(&["http://localhost:5173"]);
        let response = server
            .get("/")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;
        response.assert_status_ok();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unlisted_origin() {
        let server = server(&["http://localhost:5173"]);
        let response = server
            .get("/")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://evil.example"))
            .await;
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_cors_drops_wildcard_origin() {
        let server = server(&["*", "http://localhost:5173", "bad\norigin"]);
        let response = server
            .get("/")
            .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }
}
