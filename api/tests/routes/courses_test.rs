#[cfg(test)]
mod tests {
    use crate::helpers::{MultipartBuilder, bearer, body_json, make_test_app};
    use axum::{
        Router,
        body::Body as AxumBody,
        http::{
            Request, StatusCode,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
    };
    use db::models::content;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::Value;
    use serial_test::serial;
    use services::caller::Role;
    use tower::ServiceExt;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";
    const MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42fake-video";

    fn course_form(title: &str, content_titles: &[&str]) -> MultipartBuilder {
        let content: Vec<Value> = content_titles
            .iter()
            .map(|t| serde_json::json!({ "title": t }))
            .collect();

        let mut form = MultipartBuilder::new()
            .text("title", title)
            .text("description", "Ownership from first principles")
            .text("price", "19.99")
            .text("category", "video")
            .text("content", &Value::Array(content).to_string());
        for i in 0..content_titles.len() {
            form = form.file(&format!("content[{i}].file"), &format!("lesson{i}.mp4"), MP4);
        }
        form
    }

    async fn send_form(
        app: &Router,
        method: &str,
        uri: &str,
        auth: Option<String>,
        form: MultipartBuilder,
    ) -> (StatusCode, Value) {
        let (content_type, body) = form.finish();
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, content_type);
        if let Some(auth) = auth {
            req = req.header(AUTHORIZATION, auth);
        }
        let response = app
            .clone()
            .oneshot(req.body(AxumBody::from(body)).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().uri(uri).body(AxumBody::empty()).unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn create_course(app: &Router, title: &str, content_titles: &[&str]) -> Value {
        let form = course_form(title, content_titles).file("thumbnail", "cover.png", PNG);
        let (status, json) =
            send_form(app, "POST", "/api/courses", Some(bearer(1, Role::Admin)), form).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        json["data"].clone()
    }

    #[tokio::test]
    #[serial]
    async fn admin_creates_published_course_with_content() {
        let (app, _state, _tmp) = make_test_app().await;

        let form = course_form("Rust for Beginners", &["Intro", "Lesson 2"])
            .text("status", "draft")
            .file("thumbnail", "cover.png", PNG);
        let (status, json) =
            send_form(&app, "POST", "/api/courses", Some(bearer(1, Role::Admin)), form).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Course created successfully");
        let data = &json["data"];
        assert_eq!(data["title"], "Rust for Beginners");
        assert_eq!(data["status"], "published");
        assert_eq!(data["price"], 19.99);
        assert_eq!(data["category"], "video");
        assert_eq!(data["content"].as_array().unwrap().len(), 2);
        assert!(
            data["thumbnail"]
                .as_str()
                .unwrap()
                .starts_with("http://media.test/media/images/")
        );

        let id = data["id"].as_i64().unwrap();
        let (status, json) = get(&app, &format!("/api/courses/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        let items = json["data"]["content"].as_array().unwrap();
        assert_eq!(items[0]["title"], "Intro");
        assert_eq!(items[1]["title"], "Lesson 2");
        assert_eq!(items[0]["course_id"], id);
        assert!(
            items[0]["file"]
                .as_str()
                .unwrap()
                .starts_with("http://media.test/media/videos/")
        );
    }

    #[tokio::test]
    #[serial]
    async fn uploaded_thumbnail_is_served_under_media() {
        let (app, _state, _tmp) = make_test_app().await;
        let course = create_course(&app, "Served", &[]).await;

        let url = course["thumbnail"].as_str().unwrap();
        let path = url.trim_start_matches("http://media.test");
        let req = Request::builder().uri(path).body(AxumBody::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], PNG);
    }

    #[tokio::test]
    #[serial]
    async fn create_requires_token() {
        let (app, _state, _tmp) = make_test_app().await;
        let form = course_form("No token", &[]).file("thumbnail", "cover.png", PNG);

        let (status, json) = send_form(&app, "POST", "/api/courses", None, form).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    #[serial]
    async fn non_admin_cannot_create() {
        let (app, _state, _tmp) = make_test_app().await;
        let form = course_form("Publisher", &[]).file("thumbnail", "cover.png", PNG);

        let (status, json) =
            send_form(&app, "POST", "/api/courses", Some(bearer(5, Role::Publisher)), form).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "User 5 is not authorized to add course");
    }

    #[tokio::test]
    #[serial]
    async fn create_without_thumbnail_is_rejected() {
        let (app, _state, _tmp) = make_test_app().await;

        let (status, json) = send_form(
            &app,
            "POST",
            "/api/courses",
            Some(bearer(1, Role::Admin)),
            course_form("No thumbnail", &["Intro"]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Thumbnail file not provided");
    }

    #[tokio::test]
    #[serial]
    async fn create_reports_first_validation_error() {
        let (app, _state, _tmp) = make_test_app().await;

        let form = MultipartBuilder::new()
            .text("description", "No title")
            .text("price", "10")
            .text("category", "podcast")
            .text("content", "[]")
            .file("thumbnail", "cover.png", PNG);
        let (status, json) =
            send_form(&app, "POST", "/api/courses", Some(bearer(1, Role::Admin)), form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "\"title\" is required");

        let form = MultipartBuilder::new()
            .text("title", "Bad category")
            .text("description", "x")
            .text("price", "10")
            .text("category", "podcast")
            .text("content", "[]")
            .file("thumbnail", "cover.png", PNG);
        let (status, json) =
            send_form(&app, "POST", "/api/courses", Some(bearer(1, Role::Admin)), form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "\"category\" must be one of [video, book]");
    }

    #[tokio::test]
    #[serial]
    async fn content_must_be_an_array() {
        let (app, _state, _tmp) = make_test_app().await;

        let form = MultipartBuilder::new()
            .text("title", "Bad content")
            .text("description", "x")
            .text("price", "10")
            .text("category", "book")
            .text("content", "{\"title\":\"Intro\"}")
            .file("thumbnail", "cover.png", PNG);
        let (status, json) =
            send_form(&app, "POST", "/api/courses", Some(bearer(1, Role::Admin)), form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "\"content\" must be an array");
    }

    #[tokio::test]
    #[serial]
    async fn missing_content_file_persists_nothing() {
        let (app, state, _tmp) = make_test_app().await;

        let form = MultipartBuilder::new()
            .text("title", "Half uploaded")
            .text("description", "x")
            .text("price", "10")
            .text("category", "video")
            .text("content", "[{\"title\":\"Intro\"},{\"title\":\"Lesson 2\"}]")
            .file("content[0].file", "intro.mp4", MP4)
            .file("thumbnail", "cover.png", PNG);
        let (status, json) =
            send_form(&app, "POST", "/api/courses", Some(bearer(1, Role::Admin)), form).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "File not provided for Lesson 2");

        let (_, list) = get(&app, "/api/courses").await;
        assert!(list["data"].as_array().unwrap().is_empty());
        assert_eq!(content::Entity::find().count(state.db()).await.unwrap(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn edit_replaces_content_and_keeps_thumbnail() {
        let (app, state, _tmp) = make_test_app().await;
        let course = create_course(&app, "Original", &["Old 1", "Old 2"]).await;
        let id = course["id"].as_i64().unwrap();

        let (status, json) = send_form(
            &app,
            "PUT",
            &format!("/api/courses/{id}"),
            Some(bearer(1, Role::SuperAdmin)),
            course_form("Renamed", &["New 1"]),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["message"], "Course updated successfully");
        assert_eq!(json["data"]["title"], "Renamed");
        assert_eq!(json["data"]["thumbnail"], course["thumbnail"]);
        assert_eq!(json["data"]["content"].as_array().unwrap().len(), 1);

        let (_, detail) = get(&app, &format!("/api/courses/{id}")).await;
        let items = detail["data"]["content"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "New 1");
        assert_eq!(content::Entity::find().count(state.db()).await.unwrap(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn edit_of_missing_course_is_not_found() {
        let (app, _state, _tmp) = make_test_app().await;

        let (status, json) = send_form(
            &app,
            "PUT",
            "/api/courses/999",
            Some(bearer(1, Role::Admin)),
            course_form("Ghost", &[]),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Course not found");
    }

    #[tokio::test]
    #[serial]
    async fn delete_removes_course_and_content() {
        let (app, state, _tmp) = make_test_app().await;
        let course = create_course(&app, "Doomed", &["Intro"]).await;
        let id = course["id"].as_i64().unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/courses/{id}"))
            .header(AUTHORIZATION, bearer(1, Role::Admin))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Course and its content deleted successfully");

        let (status, json) = get(&app, &format!("/api/courses/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Course not found");
        assert_eq!(content::Entity::find().count(state.db()).await.unwrap(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn delete_by_user_is_unauthorized() {
        let (app, _state, _tmp) = make_test_app().await;
        let course = create_course(&app, "Kept", &[]).await;
        let id = course["id"].as_i64().unwrap();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/courses/{id}"))
            .header(AUTHORIZATION, bearer(9, Role::User))
            .body(AxumBody::empty())
            .unwrap();
        let response = app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "User 9 is not authorized to delete course");

        let (status, _) = get(&app, &format!("/api/courses/{id}")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn malformed_id_is_reported_as_not_found() {
        let (app, _state, _tmp) = make_test_app().await;

        let (status, json) = get(&app, "/api/courses/not-a-number").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Resource not found with id of not-a-number");
    }

    #[tokio::test]
    #[serial]
    async fn search_matches_title_and_description_ignoring_case() {
        let (app, _state, _tmp) = make_test_app().await;
        create_course(&app, "Async Rust", &[]).await;
        create_course(&app, "Gardening", &[]).await;

        let (status, json) = get(&app, "/api/courses/search/ASYNC").await;
        assert_eq!(status, StatusCode::OK);
        let found = json["data"].as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["title"], "Async Rust");

        let (_, json) = get(&app, "/api/courses/search/first%20principles").await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let (status, json) = get(&app, "/api/courses/search/%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "\"keyword\" is not allowed to be empty");
    }

    #[tokio::test]
    #[serial]
    async fn recent_returns_three_newest() {
        let (app, _state, _tmp) = make_test_app().await;
        for title in ["One", "Two", "Three", "Four"] {
            create_course(&app, title, &[]).await;
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let (status, json) = get(&app, "/api/courses/recent").await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Four", "Three", "Two"]);

        let (_, all) = get(&app, "/api/courses").await;
        assert_eq!(all["data"].as_array().unwrap().len(), 4);
    }
}
