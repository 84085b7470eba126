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
    use db::models::review;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{Value, json};
    use serial_test::serial;
    use services::caller::Role;
    use tower::ServiceExt;

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

    async fn create(app: &Router, title: &str) -> Value {
        let (status, json) = send(
            app,
            "POST",
            "/api/resources",
            Some(bearer(1, Role::Admin)),
            Some(json!({ "title": title, "description": "A resource" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"].clone()
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_resource_without_rating() {
        let (app, _state, _tmp) = make_test_app().await;
        let data = create(&app, "  The Rust Book  ").await;

        assert_eq!(data["title"], "The Rust Book");
        assert!(data["average_rating"].is_null());
    }

    #[tokio::test]
    #[serial]
    async fn mutations_are_admin_only() {
        let (app, _state, _tmp) = make_test_app().await;
        let body = json!({ "title": "Mine", "description": "x" });

        let (status, _) = send(&app, "POST", "/api/resources", None, Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, json) = send(
            &app,
            "POST",
            "/api/resources",
            Some(bearer(5, Role::Publisher)),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Admin access required");
    }

    #[tokio::test]
    #[serial]
    async fn create_validates_title() {
        let (app, _state, _tmp) = make_test_app().await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/resources",
            Some(bearer(1, Role::Admin)),
            Some(json!({ "description": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Please add a title");

        let (status, json) = send(
            &app,
            "POST",
            "/api/resources",
            Some(bearer(1, Role::Admin)),
            Some(json!({ "title": "x".repeat(101), "description": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Title must be between 1 and 100 characters");
    }

    #[tokio::test]
    #[serial]
    async fn malformed_json_is_bad_request() {
        let (app, _state, _tmp) = make_test_app().await;

        let req = Request::builder()
            .method("POST")
            .uri("/api/resources")
            .header(AUTHORIZATION, bearer(1, Role::Admin))
            .header(CONTENT_TYPE, "application/json")
            .body(AxumBody::from("{not json"))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn list_filters_by_title_and_paginates() {
        let (app, _state, _tmp) = make_test_app().await;
        for title in ["Rust in Action", "Zero to Production", "Programming Rust"] {
            create(&app, title).await;
        }

        let (status, json) =
            send(&app, "GET", "/api/resources?query=rust&sort=title", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 2);
        assert_eq!(json["data"][0]["title"], "Programming Rust");
        assert_eq!(json["pagination"]["total"], 2);

        let (_, json) = send(&app, "GET", "/api/resources?per_page=1&page=2", None, None).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["pagination"]["prev"]["page"], 1);
        assert_eq!(json["pagination"]["next"]["page"], 3);
    }

    #[tokio::test]
    #[serial]
    async fn update_and_missing_resource() {
        let (app, _state, _tmp) = make_test_app().await;
        let data = create(&app, "Draft title").await;

        let (status, json) = send(
            &app,
            "PUT",
            &format!("/api/resources/{}", data["id"]),
            Some(bearer(1, Role::Admin)),
            Some(json!({ "title": "Final title" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "Final title");
        assert_eq!(json["data"]["description"], "A resource");

        let (status, json) = send(&app, "GET", "/api/resources/77", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Resource not found with id of 77");
    }

    #[tokio::test]
    #[serial]
    async fn delete_cascades_reviews() {
        let (app, state, _tmp) = make_test_app().await;
        let data = create(&app, "Short lived").await;
        let id = data["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/resources/{id}/reviews"),
            Some(bearer(5, Role::User)),
            Some(json!({ "rating": 2, "text": "Meh" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        state.supervisor().wait_idle().await;

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/resources/{id}"),
            Some(bearer(1, Role::SuperAdmin)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(review::Entity::find().count(state.db()).await.unwrap(), 0);

        let (status, _) = send(&app, "GET", &format!("/api/resources/{id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
