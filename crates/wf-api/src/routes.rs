//! API routes.

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::extractors::AppState;
use crate::handlers::{auth, bookings, reviews, tours, users};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_router())
}

fn api_v1_router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/tours", tours_router())
        .nest("/users", users_router())
        .nest("/reviews", reviews_router())
        .nest("/bookings", bookings_router())
}

fn tours_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tours::list_tours).post(tours::create_tour))
        .route("/top-5-cheap", get(tours::top_cheap))
        .route("/stats", get(tours::tour_stats))
        .route("/monthly-plan/:year", get(tours::monthly_plan))
        .route(
            "/tours-within/:distance/center/:latlng/unit/:unit",
            get(tours::tours_within),
        )
        .route("/distances/:latlng/unit/:unit", get(tours::tour_distances))
        .route(
            "/:id",
            get(tours::get_tour)
                .patch(tours::update_tour)
                .delete(tours::delete_tour),
        )
        .route(
            "/:id/reviews",
            get(reviews::list_tour_reviews).post(reviews::create_tour_review),
        )
}

fn users_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/update-my-password", patch(auth::update_my_password))
        .route(
            "/me",
            get(users::get_me)
                .patch(users::update_me)
                .delete(users::delete_me),
        )
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

fn reviews_router() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/:id",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
}

fn bookings_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/my", get(bookings::my_bookings))
        .route(
            "/:id",
            get(bookings::get_booking)
                .patch(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
}

async fn api_root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "name": "Wayfarer API",
            "version": "1",
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use wf_core::AppConfig;

    fn app() -> Router {
        router().with_state(AppState::without_database(AppConfig::default()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_api_root() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(
            Request::builder()
                .uri("/api/v1/nothing-here")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "fail");
        assert_eq!(
            body["message"],
            "You are not logged in! Please log in to get access."
        );
    }

    #[tokio::test]
    async fn test_list_without_database_is_503() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/tours")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_bad_unit_rejected_before_database() {
        let (status, body) = send(
            Request::builder()
                .uri("/api/v1/tours/tours-within/200/center/34.1,-118.1/unit/furlong")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Unit must be either mi or km.");
    }
}
