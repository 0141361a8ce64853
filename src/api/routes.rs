use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::api::{bean_handlers, docs, handlers, note_handlers, recipe_handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // API Documentation
        .route("/doc", get(docs::get_openapi_spec))
        .route("/ui", get(docs::get_api_docs))
        // Beans
        .route(
            "/beans",
            get(bean_handlers::list_beans::<S>).post(bean_handlers::create_bean::<S>),
        )
        .route(
            "/beans/:id",
            patch(bean_handlers::update_bean::<S>).delete(bean_handlers::delete_bean::<S>),
        )
        // Recipes
        .route(
            "/recipes",
            get(recipe_handlers::list_recipes::<S>).post(recipe_handlers::create_recipe::<S>),
        )
        .route(
            "/recipes/:id",
            patch(recipe_handlers::update_recipe::<S>)
                .delete(recipe_handlers::delete_recipe::<S>),
        )
        // Notes
        .route(
            "/notes",
            get(note_handlers::list_notes::<S>).post(note_handlers::create_note::<S>),
        )
        .route(
            "/notes/:id",
            patch(note_handlers::update_note::<S>).delete(note_handlers::delete_note::<S>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::store::MemoryStore;

    fn app() -> Router {
        create_router::<MemoryStore>().with_state(Arc::new(MemoryStore::new()))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn bean_body() -> Value {
        json!({
            "name": "Guji",
            "origin": "Colombia",
            "variety": "Heirloom",
            "roastLevel": "light"
        })
    }

    fn v60_body() -> Value {
        json!({
            "name": "V60",
            "description": "Single cup pour over",
            "instructions": "Bloom 45s, then pour slowly to 300g",
            "waterAmount": 300,
            "beanAmount": 18,
            "brewTime": 180,
            "temperature": 93,
            "grinderType": "manual"
        })
    }

    #[tokio::test]
    async fn test_create_then_list_bean() {
        let app = app();
        let (status, body) = send(&app, "POST", "/beans", Some(bean_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "id": 1 }));

        let (status, body) = send(&app, "GET", "/beans", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{
                "id": 1,
                "name": "Guji",
                "origin": "Colombia",
                "variety": "Heirloom",
                "roastLevel": "light"
            }])
        );
    }

    #[tokio::test]
    async fn test_recipe_without_grinder_details_reads_back_null() {
        let app = app();
        let (status, body) = send(&app, "POST", "/recipes", Some(v60_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "id": 1 }));

        let (_, recipes) = send(&app, "GET", "/recipes", None).await;
        let recipe = &recipes[0];
        assert_eq!(recipe["name"], "V60");
        assert_eq!(recipe["grinderType"], "manual");
        assert_eq!(recipe["grinderName"], Value::Null);
        assert_eq!(recipe["grinderClicks"], Value::Null);
        assert!(recipe.as_object().unwrap().contains_key("grinderName"));
    }

    #[tokio::test]
    async fn test_patch_changes_only_supplied_field() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;

        let (status, body) =
            send(&app, "PATCH", "/beans/1", Some(json!({ "origin": "Ethiopia" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1 }));

        let (_, beans) = send(&app, "GET", "/beans", None).await;
        let mut expected = bean_body();
        expected["id"] = json!(1);
        expected["origin"] = json!("Ethiopia");
        assert_eq!(beans, json!([expected]));
    }

    #[tokio::test]
    async fn test_empty_patch_returns_id_and_keeps_row() {
        let app = app();
        send(&app, "POST", "/recipes", Some(v60_body())).await;
        let (_, before) = send(&app, "GET", "/recipes", None).await;

        let (status, body) = send(&app, "PATCH", "/recipes/1", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1 }));

        let (_, after) = send(&app, "GET", "/recipes", None).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let app = app();
        for collection in ["beans", "recipes", "notes"] {
            let uri = format!("/{}/77", collection);
            let (status, body) = send(&app, "PATCH", &uri, Some(json!({}))).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "PATCH {uri}");
            assert!(body["message"].is_string());

            let (status, body) = send(&app, "DELETE", &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
            assert!(body["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_ids_beyond_serial_range_are_not_found() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;

        let (status, body) = send(&app, "PATCH", "/beans/2147483648", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Bean not found" }));

        let (status, body) = send(&app, "DELETE", "/beans/2147483648", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Bean not found" }));

        for collection in ["recipes", "notes"] {
            let uri = format!("/{}/99999999999", collection);
            let (status, _) = send(&app, "DELETE", &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
        }
    }

    #[tokio::test]
    async fn test_null_in_patch_is_bad_request() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;
        send(&app, "POST", "/recipes", Some(v60_body())).await;

        let (status, body) = send(
            &app,
            "PATCH",
            "/beans/1",
            Some(json!({ "name": null, "roastLevel": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());

        let (status, _) =
            send(&app, "PATCH", "/recipes/1", Some(json!({ "grinderName": null }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, beans) = send(&app, "GET", "/beans", None).await;
        assert_eq!(beans[0]["name"], "Guji");
        assert_eq!(beans[0]["roastLevel"], "light");
    }

    #[tokio::test]
    async fn test_delete_twice_is_ok_then_not_found() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;

        let (status, body) = send(&app, "DELETE", "/beans/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1 }));

        let (status, body) = send(&app, "DELETE", "/beans/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Bean not found" }));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_rejected_before_store() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;

        let (status, body) =
            send(&app, "PATCH", "/beans/abc", Some(json!({ "origin": "Kenya" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("abc"));

        let (status, _) = send(&app, "DELETE", "/beans/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Nothing was touched
        let (_, beans) = send(&app, "GET", "/beans", None).await;
        assert_eq!(beans[0]["origin"], "Colombia");
    }

    #[tokio::test]
    async fn test_invalid_bodies_are_bad_request() {
        let app = app();

        let mut unknown_roast = bean_body();
        unknown_roast["roastLevel"] = json!("blonde");
        let (status, _) = send(&app, "POST", "/beans", Some(unknown_roast)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut empty_name = bean_body();
        empty_name["name"] = json!("");
        let (status, body) = send(&app, "POST", "/beans", Some(empty_name)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name must not be empty");

        let mut missing_field = v60_body();
        missing_field.as_object_mut().unwrap().remove("brewTime");
        let (status, _) = send(&app, "POST", "/recipes", Some(missing_field)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, beans) = send(&app, "GET", "/beans", None).await;
        assert_eq!(beans, json!([]));
    }

    #[tokio::test]
    async fn test_note_references_are_enforced() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;
        send(&app, "POST", "/recipes", Some(v60_body())).await;

        let dangling = json!({ "name": "Bad", "recipe": 5, "bean": 1, "content": "x" });
        let (status, body) = send(&app, "POST", "/notes", Some(dangling)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Failed to create note" }));

        let valid = json!({ "name": "Good", "recipe": 1, "bean": 1, "content": "Stone fruit" });
        let (status, body) = send(&app, "POST", "/notes", Some(valid)).await;
        assert_eq!(status, StatusCode::CREATED);
        let note_id = body["id"].as_i64().unwrap();

        let (_, notes) = send(&app, "GET", "/notes", None).await;
        let note = notes
            .as_array()
            .unwrap()
            .iter()
            .find(|note| note["id"].as_i64() == Some(note_id))
            .unwrap();
        assert_eq!(note["recipe"], 1);
        assert_eq!(note["bean"], 1);
        assert_eq!(note["content"], "Stone fruit");
    }

    #[tokio::test]
    async fn test_deleting_referenced_bean_fails() {
        let app = app();
        send(&app, "POST", "/beans", Some(bean_body())).await;
        send(&app, "POST", "/recipes", Some(v60_body())).await;
        send(
            &app,
            "POST",
            "/notes",
            Some(json!({ "name": "n", "recipe": 1, "bean": 1, "content": "c" })),
        )
        .await;

        let (status, body) = send(&app, "DELETE", "/beans/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "Failed to delete bean" }));

        let (status, _) = send(&app, "DELETE", "/notes/1", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", "/beans/1", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_docs_and_health_are_served() {
        let app = app();
        let (status, doc) = send(&app, "GET", "/doc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["openapi"], "3.0.0");

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/ui").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (status, health) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["status"], "healthy");
    }
}
