use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use itertools::Itertools;
use serde::Deserialize;

use crate::api::handlers::AppState;
use crate::api::views::{self, BookInstanceFormPage, DetailMode};
use crate::error::CatalogError;
use crate::logic::{BookInstanceValidator, FieldError};
use crate::model::{
    book_instance_list_url, book_instance_url, BookInstanceDraft, BookInstanceForm, Id,
};
use crate::store::traits::Store;

const CREATE_TITLE: &str = "Create BookInstance";
const UPDATE_TITLE: &str = "Update BookInstance";

/// Body of the delete confirmation form
#[derive(Debug, Default, Deserialize)]
pub struct DeleteBookInstanceForm {
    pub bookinstanceid: Option<String>,
}

/// GET /catalog/bookinstances
pub async fn book_instance_list<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Html<String>, CatalogError> {
    let copies = store.list_book_instances().await?;
    Ok(Html(views::book_instance_list("Book Instance List", &copies)))
}

/// GET /catalog/bookinstance/{id}
pub async fn book_instance_detail<S: Store>(
    Path(id): Path<Id>,
    State(store): State<AppState<S>>,
) -> Result<Html<String>, CatalogError> {
    let copy = store
        .get_book_instance_with_book(&id)
        .await?
        .ok_or_else(CatalogError::book_copy_not_found)?;
    Ok(Html(views::book_instance_detail(&copy, DetailMode::View)))
}

/// GET /catalog/bookinstance/create
pub async fn book_instance_create_get<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Html<String>, CatalogError> {
    let books = store.list_books_for_selection().await?;
    Ok(Html(views::book_instance_form(&BookInstanceFormPage {
        title: CREATE_TITLE,
        books: &books,
        selected_book: None,
        draft: None,
        errors: &[],
    })))
}

/// POST /catalog/bookinstance/create
pub async fn book_instance_create_post<S: Store>(
    State(store): State<AppState<S>>,
    Form(form): Form<BookInstanceForm>,
) -> Result<Response, CatalogError> {
    let fields = match BookInstanceValidator::validate(&form) {
        Ok(fields) => fields,
        Err(errors) => {
            let draft = BookInstanceValidator::sanitize(&form);
            return rerender_form(&*store, CREATE_TITLE, &draft, &errors).await;
        }
    };

    let created = store.create_book_instance(fields).await?;
    log::info!("Created book instance {} for book {}", created.id, created.book);
    Ok(Redirect::to(&book_instance_url(&created.id)).into_response())
}

/// GET /catalog/bookinstance/{id}/delete
pub async fn book_instance_delete_get<S: Store>(
    Path(id): Path<Id>,
    State(store): State<AppState<S>>,
) -> Result<Html<String>, CatalogError> {
    let copy = store
        .get_book_instance_with_book(&id)
        .await?
        .ok_or_else(CatalogError::book_copy_not_found)?;
    Ok(Html(views::book_instance_detail(
        &copy,
        DetailMode::ConfirmDelete,
    )))
}

/// POST /catalog/bookinstance/{id}/delete
///
/// The copy removed is the one named by the `bookinstanceid` form field. The
/// path id is used only when that field is missing or blank.
pub async fn book_instance_delete_post<S: Store>(
    Path(id): Path<Id>,
    State(store): State<AppState<S>>,
    Form(form): Form<DeleteBookInstanceForm>,
) -> Result<Redirect, CatalogError> {
    let target = form
        .bookinstanceid
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(id);

    if !store.delete_book_instance(&target).await? {
        return Err(CatalogError::book_copy_not_found());
    }

    log::info!("Deleted book instance {}", target);
    Ok(Redirect::to(&book_instance_list_url()))
}

/// GET /catalog/bookinstance/{id}/update
pub async fn book_instance_update_get<S: Store>(
    Path(id): Path<Id>,
    State(store): State<AppState<S>>,
) -> Result<Html<String>, CatalogError> {
    let (books, instance) = tokio::try_join!(
        store.list_books_for_selection(),
        store.get_book_instance(&id),
    )?;
    let instance = instance.ok_or_else(CatalogError::book_copy_not_found)?;
    let draft = BookInstanceDraft::from(&instance);

    Ok(Html(views::book_instance_form(&BookInstanceFormPage {
        title: UPDATE_TITLE,
        books: &books,
        selected_book: Some(&instance.book),
        draft: Some(&draft),
        errors: &[],
    })))
}

/// POST /catalog/bookinstance/{id}/update
pub async fn book_instance_update_post<S: Store>(
    Path(id): Path<Id>,
    State(store): State<AppState<S>>,
    Form(form): Form<BookInstanceForm>,
) -> Result<Response, CatalogError> {
    let fields = match BookInstanceValidator::validate(&form) {
        Ok(fields) => fields,
        Err(errors) => {
            // a rejected submission for a copy that does not exist is still a 404
            if store.get_book_instance(&id).await?.is_none() {
                return Err(CatalogError::book_copy_not_found());
            }
            let draft = BookInstanceDraft {
                id: Some(id),
                ..BookInstanceValidator::sanitize(&form)
            };
            return rerender_form(&*store, UPDATE_TITLE, &draft, &errors).await;
        }
    };

    let updated = store
        .update_book_instance(&id, fields)
        .await?
        .ok_or_else(CatalogError::book_copy_not_found)?;
    log::info!("Updated book instance {}", updated.id);
    Ok(Redirect::to(&book_instance_url(&updated.id)).into_response())
}

/// Show a rejected submission again with its errors. Nothing is persisted.
async fn rerender_form<S: Store>(
    store: &S,
    title: &str,
    draft: &BookInstanceDraft,
    errors: &[FieldError],
) -> Result<Response, CatalogError> {
    log::warn!("{} rejected: {}", title, errors.iter().join(", "));

    let books = store.list_books_for_selection().await?;
    let page = BookInstanceFormPage {
        title,
        books: &books,
        selected_book: Some(&draft.book),
        draft: Some(draft),
        errors,
    };
    Ok(Html(views::book_instance_form(&page)).into_response())
}
