//! Display values derived from stored records. Nothing here is persisted.

use crate::model::{BookInstance, Id, CATALOG_PREFIX};

pub fn book_instance_url(id: &Id) -> String {
    format!("{}/bookinstance/{}", CATALOG_PREFIX, id)
}

pub fn book_instance_list_url() -> String {
    format!("{}/bookinstances", CATALOG_PREFIX)
}

pub fn book_instance_create_url() -> String {
    format!("{}/bookinstance/create", CATALOG_PREFIX)
}

/// Due date for display, e.g. `Mar 1, 2024`. Empty when there is none.
pub fn due_back_formatted(instance: &BookInstance) -> String {
    instance
        .due_back
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Due date in the `YYYY-MM-DD` shape a date input expects
pub fn due_back_input_value(instance: &BookInstance) -> String {
    instance
        .due_back
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn status_class(status: &str) -> &'static str {
    match status {
        "Available" => "text-success",
        "Maintenance" => "text-danger",
        _ => "text-warning",
    }
}
