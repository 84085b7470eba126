#[cfg(test)]
mod tests {
    use crate::helpers::{bearer, body_json, make_test_app};
    use axum::{
        Router,
        body::Body as AxumBody,
        http::{
            Request, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
    };
    use db::models::resource::Model as ResourceModel;
    use serde_json::{Value, json};
    use serial_test::serial;
    use services::{
        caller::Role,
        resource::{CreateResource, ResourceService},
        service::Service,
    };
    use tower::ServiceExt;
    use util::state::AppState;

    async fn seed_resource(state: &AppState, title: &str) -> ResourceModel {
        ResourceService::create(
            state.db(),
            CreateResource {
                title: Some(title.to_string()),
                description: Some(format!("About {title}")),
            },
        )
        .await
        .unwrap()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        auth: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            req = req.header(AUTHORIZATION, auth);
        }
        let req = match body {
            Some(body) => req
                .header(CONTENT_TYPE, "application/json")
                .body(AxumBody::from(body.to_string()))
                .unwrap(),
            None => req.body(AxumBody::empty()).unwrap(),
        };
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Posts a review and waits for its rating recompute to finish.
    async fn add_review(
        app: &Router,
        state: &AppState,
        resource_id: i64,
        user_id: i64,
        rating: i32,
    ) -> Value {
        let (status, json) = send(
            app,
            "POST",
            &format!("/api/resources/{resource_id}/reviews"),
            Some(bearer(user_id, Role::User)),
            Some(json!({ "rating": rating, "text": "Clear and practical" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        state.supervisor().wait_idle().await;
        json["data"].clone()
    }

    #[tokio::test]
    #[serial]
    async fn create_uses_caller_and_path_and_recomputes_rating() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "The Rust Book").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/resources/{}/reviews", resource.id),
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 4, "text": "Great", "user_id": 99, "resource_id": 77 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["user_id"], 5);
        assert_eq!(json["data"]["resource_id"], resource.id);
        state.supervisor().wait_idle().await;

        add_review(&app, &state, resource.id, 6, 5).await;
        state.supervisor().wait_idle().await;

        let (_, json) = send(&app, "GET", &format!("/api/resources/{}", resource.id), None, None).await;
        assert_eq!(json["data"]["average_rating"], 4.5);
    }

    #[tokio::test]
    #[serial]
    async fn create_requires_token() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Locked").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/resources/{}/reviews", resource.id),
            None,
            Some(json!({ "rating": 4, "text": "Great" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn create_for_missing_resource_is_not_found() {
        let (app, _state, _tmp) = make_test_app().await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/resources/999/reviews",
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 4, "text": "Great" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No resource with the id of 999");

        let (_, json) = send(&app, "GET", "/api/reviews", None, None).await;
        assert_eq!(json["count"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_rating_is_rejected() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Strict").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/resources/{}/reviews", resource.id),
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 7, "text": "Too good" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Please add a rating between 1 and 5");
    }

    #[tokio::test]
    #[serial]
    async fn second_review_by_same_user_is_duplicate() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Once").await;
        add_review(&app, &state, resource.id, 5, 3).await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/resources/{}/reviews", resource.id),
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 5, "text": "Changed my mind" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Duplicate field value entered");
    }

    #[tokio::test]
    #[serial]
    async fn get_review_includes_resource_title() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Titled").await;
        let review = add_review(&app, &state, resource.id, 5, 4).await;

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/reviews/{}", review["id"]),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["resource"]["title"], "Titled");
        assert_eq!(json["data"]["resource"]["id"], resource.id);

        let (status, json) = send(&app, "GET", "/api/reviews/4242", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No review found with the id of 4242");
    }

    #[tokio::test]
    #[serial]
    async fn list_for_resource_carries_count() {
        let (app, state, _tmp) = make_test_app().await;
        let first = seed_resource(&state, "First").await;
        let second = seed_resource(&state, "Second").await;
        add_review(&app, &state, first.id, 5, 4).await;
        add_review(&app, &state, first.id, 6, 2).await;
        add_review(&app, &state, second.id, 5, 1).await;

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/resources/{}/reviews", first.id),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 2);
        assert!(
            json["data"]
                .as_array()
                .unwrap()
                .iter()
                .all(|r| r["resource_id"] == first.id)
        );
    }

    #[tokio::test]
    #[serial]
    async fn list_all_is_filtered_and_paginated() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Popular").await;
        for (user, rating) in [(1, 5), (2, 3), (3, 5)] {
            add_review(&app, &state, resource.id, user, rating).await;
        }

        let (status, json) =
            send(&app, "GET", "/api/reviews?per_page=2&sort=-rating", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(json["pagination"]["total"], 3);
        assert_eq!(json["pagination"]["next"]["page"], 2);
        assert_eq!(json["data"][0]["rating"], 5);

        let (_, json) = send(&app, "GET", "/api/reviews?rating=3", None, None).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["user_id"], 2);

        let (status, _) = send(&app, "GET", "/api/reviews?rating=high", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn only_author_or_admin_may_update() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Contested").await;
        let review = add_review(&app, &state, resource.id, 5, 2).await;
        let uri = format!("/api/reviews/{}", review["id"]);

        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(bearer(6, Role::Publisher)),
            Some(json!({ "rating": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Not authorized to update review");

        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 4, "text": "Grew on me" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["rating"], 4);
        assert_eq!(json["data"]["text"], "Grew on me");
        state.supervisor().wait_idle().await;

        let (status, json) = send(
            &app,
            "PUT",
            &uri,
            Some(bearer(1, Role::Admin)),
            Some(json!({ "rating": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["rating"], 3);

        state.supervisor().wait_idle().await;
        let (_, json) = send(&app, "GET", &format!("/api/resources/{}", resource.id), None, None).await;
        assert_eq!(json["data"]["average_rating"], 3.0);
    }

    #[tokio::test]
    #[serial]
    async fn update_of_missing_review_is_not_found() {
        let (app, _state, _tmp) = make_test_app().await;

        let (status, json) = send(
            &app,
            "PUT",
            "/api/reviews/321",
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No review with the id of 321");
    }

    #[tokio::test]
    #[serial]
    async fn delete_by_owner_clears_rating() {
        let (app, state, _tmp) = make_test_app().await;
        let resource = seed_resource(&state, "Fleeting").await;
        let review = add_review(&app, &state, resource.id, 5, 5).await;
        let uri = format!("/api/reviews/{}", review["id"]);

        let (status, json) = send(&app, "DELETE", &uri, Some(bearer(6, Role::User)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Not authorized to delete review");

        let (status, json) = send(&app, "DELETE", &uri, Some(bearer(5, Role::User)), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!({}));

        state.supervisor().wait_idle().await;
        let (_, json) = send(&app, "GET", &format!("/api/resources/{}", resource.id), None, None).await;
        assert!(json["data"]["average_rating"].is_null());

        let (status, _) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
