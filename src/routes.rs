use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::handlers::{health_handler, login_handler, metrics_handler, status_handler};
use crate::middleware::security_headers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/login", post(login_handler))
        .route("/login/status", get(status_handler))
        .layer(middleware::from_fn(security_headers));

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/admin", admin)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{StaticAuthenticator, hash_password};
    use crate::clock::ManualClock;
    use crate::rate_limit::{RateLimitConfig, RateLimiter};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn setup() -> (Router, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::default(), clock.clone()));
        let hash = hash_password("correct horse");
        let authenticator =
            StaticAuthenticator::new(Some("admin@example.com"), Some(&hash)).unwrap();

        let state = Arc::new(AppState {
            limiter,
            authenticator: Arc::new(authenticator),
            clock: clock.clone(),
        });
        (build_router(state), clock)
    }

    async fn login(app: &Router, email: &str, password: &str) -> Response {
        let body = serde_json::json!({ "email": email, "password": password });
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn status(app: &Router, email: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/admin/login/status?email={email}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn successful_login_clears_failures() {
        let (app, _clock) = setup();

        for _ in 0..3 {
            let response = login(&app, "admin@example.com", "wrong").await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = login(&app, "Admin@Example.com", "correct horse").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["email"], "admin@example.com");

        let body = json(status(&app, "admin@example.com").await).await;
        assert_eq!(body["remainingAttempts"], 5);
        assert_eq!(body["blocked"], false);
    }

    #[tokio::test]
    async fn failed_login_reports_remaining_attempts_without_enumeration() {
        let (app, _clock) = setup();

        let known = json(login(&app, "admin@example.com", "wrong").await).await;
        let unknown = json(login(&app, "nobody@example.com", "wrong").await).await;

        assert_eq!(known["error"], unknown["error"]);
        assert_eq!(known["error"], "Invalid email or password");
        assert_eq!(known["remainingAttempts"], 4);
        assert_eq!(unknown["remainingAttempts"], 4);
    }

    #[tokio::test]
    async fn fifth_attempt_is_throttled_even_with_correct_password() {
        let (app, _clock) = setup();

        for _ in 0..4 {
            login(&app, "admin@example.com", "wrong").await;
        }

        let response = login(&app, "admin@example.com", "correct horse").await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "3600"
        );
        let body = json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["remainingAttempts"], 0);
    }

    #[tokio::test]
    async fn block_lifts_after_block_duration() {
        let (app, clock) = setup();

        for _ in 0..5 {
            login(&app, "admin@example.com", "wrong").await;
        }
        clock.advance(chrono::Duration::minutes(30));
        let response = login(&app, "admin@example.com", "correct horse").await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "1800"
        );

        clock.advance(chrono::Duration::minutes(30));
        let response = login(&app, "admin@example.com", "correct horse").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn retry_after_rounds_up_partial_seconds() {
        let (app, clock) = setup();

        for _ in 0..5 {
            login(&app, "admin@example.com", "wrong").await;
        }
        clock.advance(chrono::Duration::milliseconds(500));

        let response = login(&app, "admin@example.com", "correct horse").await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: i64 = response
            .headers()
            .get(header::RETRY_AFTER)
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(retry_after, 3600);

        // waiting exactly the advertised time is enough
        clock.advance(chrono::Duration::seconds(retry_after));
        let response = login(&app, "admin@example.com", "correct horse").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_password_does_not_spend_an_attempt() {
        let (app, _clock) = setup();

        let response = login(&app, "admin@example.com", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "Password is required");

        let body = json(status(&app, "admin@example.com").await).await;
        assert_eq!(body["remainingAttempts"], 5);
    }

    #[tokio::test]
    async fn status_reports_block_and_is_read_only() {
        let (app, _clock) = setup();

        for _ in 0..2 {
            login(&app, "admin@example.com", "wrong").await;
        }
        for _ in 0..5 {
            let body = json(status(&app, "admin@example.com").await).await;
            assert_eq!(body["remainingAttempts"], 3);
        }

        for _ in 0..3 {
            login(&app, "admin@example.com", "wrong").await;
        }
        let body = json(status(&app, "admin@example.com").await).await;
        assert_eq!(body["blocked"], true);
        assert_eq!(body["remainingAttempts"], 0);
    }

    #[tokio::test]
    async fn empty_email_is_throttled_under_unknown() {
        let (app, _clock) = setup();

        let first = json(login(&app, "", "guess").await).await;
        let second = json(login(&app, "   ", "guess").await).await;
        assert_eq!(first["remainingAttempts"], 4);
        assert_eq!(second["remainingAttempts"], 3);
    }

    #[tokio::test]
    async fn admin_routes_carry_security_headers() {
        let (app, _clock) = setup();

        let response = status(&app, "admin@example.com").await;
        let headers = response.headers();
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(
            headers.get("referrer-policy").unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert_eq!(headers.get("x-xss-protection").unwrap(), "1; mode=block");

        let health = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        assert!(health.headers().get("x-frame-options").is_none());
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_login_counters() {
        let (app, _clock) = setup();
        login(&app, "admin@example.com", "wrong").await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("login_attempts_total"));
    }
}
