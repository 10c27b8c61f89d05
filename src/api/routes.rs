use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::api::{book_instance_handlers, handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::catalog_home))
        .route("/catalog", get(handlers::catalog_home))
        // Book copies
        .route(
            "/catalog/bookinstances",
            get(book_instance_handlers::book_instance_list::<S>),
        )
        .route(
            "/catalog/bookinstance/create",
            get(book_instance_handlers::book_instance_create_get::<S>)
                .post(book_instance_handlers::book_instance_create_post::<S>),
        )
        .route(
            "/catalog/bookinstance/:id",
            get(book_instance_handlers::book_instance_detail::<S>),
        )
        .route(
            "/catalog/bookinstance/:id/delete",
            get(book_instance_handlers::book_instance_delete_get::<S>)
                .post(book_instance_handlers::book_instance_delete_post::<S>),
        )
        .route(
            "/catalog/bookinstance/:id/update",
            get(book_instance_handlers::book_instance_update_get::<S>)
                .post(book_instance_handlers::book_instance_update_post::<S>),
        )
        // Stylesheet and other static assets
        .nest_service("/public", ServeDir::new("public"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, BookInstance, BookInstanceFields, BookSummary, Id, PopulatedBookInstance};
    use crate::store::{BookInstanceStore, BookStore, MemoryStore};
    use anyhow::{anyhow, Result};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use chrono::NaiveDate;
    use tower::ServiceExt;

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_book(Book::new_with_id("B1".to_string(), "The Name of the Wind".to_string()))
            .await
            .unwrap();
        store
            .upsert_book(Book::new_with_id("B2".to_string(), "Apes and Angels".to_string()))
            .await
            .unwrap();
        store
    }

    async fn existing_copy(store: &MemoryStore) -> BookInstance {
        store
            .create_book_instance(BookInstanceFields {
                book: "B1".to_string(),
                imprint: "Gollancz, 2011".to_string(),
                status: "Available".to_string(),
                due_back: None,
            })
            .await
            .unwrap()
    }

    async fn get<S: Store + 'static>(store: Arc<S>, uri: &str) -> Response {
        create_router::<S>()
            .with_state(store)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form<S: Store + 'static>(store: Arc<S>, uri: &str, body: &str) -> Response {
        create_router::<S>()
            .with_state(store)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).to_string()
    }

    fn location(response: &Response) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    /// A store whose backend is unreachable
    struct UnavailableStore;

    #[async_trait::async_trait]
    impl BookStore for UnavailableStore {
        async fn list_books_for_selection(&self) -> Result<Vec<BookSummary>> {
            Err(anyhow!("connection refused"))
        }
        async fn get_book(&self, _id: &Id) -> Result<Option<Book>> {
            Err(anyhow!("connection refused"))
        }
        async fn upsert_book(&self, _book: Book) -> Result<()> {
            Err(anyhow!("connection refused"))
        }
    }

    #[async_trait::async_trait]
    impl BookInstanceStore for UnavailableStore {
        async fn create_book_instance(&self, _fields: BookInstanceFields) -> Result<BookInstance> {
            Err(anyhow!("connection refused"))
        }
        async fn get_book_instance(&self, _id: &Id) -> Result<Option<BookInstance>> {
            Err(anyhow!("connection refused"))
        }
        async fn get_book_instance_with_book(
            &self,
            _id: &Id,
        ) -> Result<Option<PopulatedBookInstance>> {
            Err(anyhow!("connection refused"))
        }
        async fn list_book_instances(&self) -> Result<Vec<PopulatedBookInstance>> {
            Err(anyhow!("connection refused"))
        }
        async fn update_book_instance(
            &self,
            _id: &Id,
            _fields: BookInstanceFields,
        ) -> Result<Option<BookInstance>> {
            Err(anyhow!("connection refused"))
        }
        async fn delete_book_instance(&self, _id: &Id) -> Result<bool> {
            Err(anyhow!("connection refused"))
        }
    }

    impl Store for UnavailableStore {}

    #[tokio::test]
    async fn test_health_check() {
        let response = get(seeded_store().await, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("healthy"));
    }

    #[tokio::test]
    async fn test_home_redirects_to_list() {
        let response = get(seeded_store().await, "/catalog").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");
    }

    #[tokio::test]
    async fn test_list_shows_copies_with_book_titles() {
        let store = seeded_store().await;
        existing_copy(&store).await;

        let response = get(store, "/catalog/bookinstances").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("The Name of the Wind : Gollancz, 2011"));
    }

    #[tokio::test]
    async fn test_detail_uses_book_title_in_heading() {
        let store = seeded_store().await;
        let copy = existing_copy(&store).await;

        let response = get(store, &format!("/catalog/bookinstance/{}", copy.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response)
            .await
            .contains("<h1>Copy: The Name of the Wind</h1>"));
    }

    #[tokio::test]
    async fn test_detail_for_missing_copy_is_404() {
        let response = get(seeded_store().await, "/catalog/bookinstance/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Book copy not found"));
    }

    #[tokio::test]
    async fn test_create_form_lists_books() {
        let response = get(seeded_store().await, "/catalog/bookinstance/create").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Create BookInstance</h1>"));
        assert!(html.contains(r#"<option value="B2">Apes and Angels</option>"#));
        assert!(html.contains(r#"<option value="B1">The Name of the Wind</option>"#));
    }

    #[tokio::test]
    async fn test_create_redirects_to_new_copy() {
        let store = seeded_store().await;
        let response = post_form(
            store.clone(),
            "/catalog/bookinstance/create",
            "book=B1&imprint=First+Edition&status=Available&due_back=",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let target = location(&response);
        let id = target
            .strip_prefix("/catalog/bookinstance/")
            .expect("redirect to detail page")
            .to_string();

        let stored = store.get_book_instance(&id).await.unwrap().unwrap();
        assert_eq!(stored.book, "B1");
        assert_eq!(stored.imprint, "First Edition");
        assert_eq!(stored.status, "Available");
        assert_eq!(stored.due_back, None);
    }

    #[tokio::test]
    async fn test_create_with_empty_book_rerenders_without_saving() {
        let store = seeded_store().await;
        let response = post_form(
            store.clone(),
            "/catalog/bookinstance/create",
            "book=&imprint=X&status=&due_back=",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert_eq!(html.matches("<li>").count(), 1);
        assert!(html.contains("<li>book: must be specified</li>"));
        assert!(html.contains(r#"value="X""#));
        assert!(store.list_book_instances().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rerender_keeps_selected_book() {
        let response = post_form(
            seeded_store().await,
            "/catalog/bookinstance/create",
            "book=B2&imprint=&due_back=someday",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"<option value="B2" selected>Apes and Angels</option>"#));
        assert!(html.contains("<li>imprint: must be specified</li>"));
        assert!(html.contains("<li>due_back: invalid date</li>"));
        assert!(html.contains(r#"value="someday""#));
    }

    #[tokio::test]
    async fn test_update_form_is_prepopulated() {
        let store = seeded_store().await;
        let copy = store
            .create_book_instance(BookInstanceFields {
                book: "B2".to_string(),
                imprint: "Old".to_string(),
                status: "Loaned".to_string(),
                due_back: NaiveDate::from_ymd_opt(2024, 3, 1),
            })
            .await
            .unwrap();

        let response = get(store, &format!("/catalog/bookinstance/{}/update", copy.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<h1>Update BookInstance</h1>"));
        assert!(html.contains(r#"<option value="B2" selected>Apes and Angels</option>"#));
        assert!(html.contains(r#"<option value="Loaned" selected>Loaned</option>"#));
        assert!(html.contains(r#"value="2024-03-01""#));
        assert!(html.contains(r#"value="Old""#));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let store = seeded_store().await;
        let copy = existing_copy(&store).await;

        let response = post_form(
            store.clone(),
            &format!("/catalog/bookinstance/{}/update", copy.id),
            "book=B2&imprint=Rev.&status=Loaned&due_back=2024-03-01",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/catalog/bookinstance/{}", copy.id));
        let stored = store.get_book_instance(&copy.id).await.unwrap().unwrap();
        assert_eq!(stored.id, copy.id);
        assert_eq!(stored.book, "B2");
        assert_eq!(stored.imprint, "Rev.");
        assert_eq!(stored.status, "Loaned");
        assert_eq!(stored.due_back, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_record_untouched() {
        let store = seeded_store().await;
        let copy = existing_copy(&store).await;

        let response = post_form(
            store.clone(),
            &format!("/catalog/bookinstance/{}/update", copy.id),
            "book=B2&imprint=+++&status=Loaned",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<h1>Update BookInstance</h1>"));
        assert_eq!(store.get_book_instance(&copy.id).await.unwrap().unwrap(), copy);
    }

    #[tokio::test]
    async fn test_update_missing_copy_is_404() {
        let store = seeded_store().await;
        let response = get(store.clone(), "/catalog/bookinstance/nope/update").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = post_form(
            store,
            "/catalog/bookinstance/nope/update",
            "book=B1&imprint=X",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_update_of_missing_copy_is_404() {
        let response = post_form(
            seeded_store().await,
            "/catalog/bookinstance/nope/update",
            "book=B1&imprint=",
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Book copy not found"));
        assert!(!html.contains("Update BookInstance"));
    }

    #[tokio::test]
    async fn test_delete_confirmation_and_removal() {
        let store = seeded_store().await;
        let copy = existing_copy(&store).await;

        let response = get(store.clone(), &format!("/catalog/bookinstance/{}/delete", copy.id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Do you really want to delete"));

        let response = post_form(
            store.clone(),
            &format!("/catalog/bookinstance/{}/delete", copy.id),
            &format!("bookinstanceid={}", copy.id),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");
        assert!(store.get_book_instance(&copy.id).await.unwrap().is_none());
        assert!(store.get_book(&"B1".to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_copy_is_404() {
        let store = seeded_store().await;
        let response = get(store.clone(), "/catalog/bookinstance/nope/delete").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = post_form(
            store,
            "/catalog/bookinstance/nope/delete",
            "bookinstanceid=nope",
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Book copy not found"));
    }

    #[tokio::test]
    async fn test_store_failures_are_500() {
        let store = Arc::new(UnavailableStore);
        for uri in [
            "/catalog/bookinstances",
            "/catalog/bookinstance/x",
            "/catalog/bookinstance/create",
            "/catalog/bookinstance/x/update",
        ] {
            let response = get(store.clone(), uri).await;
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        }

        // even a rejected form needs the book list to re-render
        let response = post_form(store, "/catalog/bookinstance/create", "book=").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
