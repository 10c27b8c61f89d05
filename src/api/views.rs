//! Server-rendered HTML pages.
//!
//! Book instance fields arrive here already escaped by the validation layer and
//! are written verbatim. Book titles, ids and raw date text come from elsewhere
//! and are escaped on the way out.

use axum::http::StatusCode;

use crate::logic::escape_markup;
use crate::logic::FieldError;
use crate::model::{
    book_instance_create_url, book_instance_list_url, book_instance_url, due_back_formatted,
    status_class, BookInstanceDraft, BookSummary, PopulatedBookInstance, KNOWN_STATUSES,
};

/// How the detail page is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailMode {
    View,
    ConfirmDelete,
}

/// Everything the create/update form needs
#[derive(Debug)]
pub struct BookInstanceFormPage<'a> {
    pub title: &'a str,
    pub books: &'a [BookSummary],
    pub selected_book: Option<&'a str>,
    pub draft: Option<&'a BookInstanceDraft>,
    pub errors: &'a [FieldError],
}

fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <link rel="stylesheet" href="/public/style.css">
</head>
<body>
    <nav>
        <a href="{list}">All book copies</a>
        <a href="{create}">Create new book copy</a>
    </nav>
    <h1>{title}</h1>
{content}
</body>
</html>
"#,
        title = escape_markup(title),
        list = book_instance_list_url(),
        create = book_instance_create_url(),
        content = content,
    )
}

pub fn book_instance_list(title: &str, copies: &[PopulatedBookInstance]) -> String {
    if copies.is_empty() {
        return layout(title, "    <p>There are no book copies in this library.</p>");
    }

    let items: String = copies
        .iter()
        .map(|copy| {
            let instance = &copy.instance;
            let due = if instance.status != "Available" && instance.due_back.is_some() {
                format!(" (Due: {})", due_back_formatted(instance))
            } else {
                String::new()
            };
            format!(
                "        <li><a href=\"{url}\">{book} : {imprint}</a> - <span class=\"{class}\">{status}</span>{due}</li>\n",
                url = book_instance_url(&instance.id),
                book = escape_markup(copy.book_title()),
                imprint = instance.imprint,
                class = status_class(&instance.status),
                status = instance.status,
                due = due,
            )
        })
        .collect();

    layout(title, &format!("    <ul>\n{}    </ul>", items))
}

pub fn book_instance_detail(copy: &PopulatedBookInstance, mode: DetailMode) -> String {
    let instance = &copy.instance;
    let url = book_instance_url(&instance.id);
    let due = if instance.status != "Available" && instance.due_back.is_some() {
        format!(
            "    <p><strong>Due back:</strong> {}</p>\n",
            due_back_formatted(instance)
        )
    } else {
        String::new()
    };

    let controls = match mode {
        DetailMode::View => format!(
            "    <p><a href=\"{url}/delete\">Delete copy</a> | <a href=\"{url}/update\">Update copy</a></p>\n",
            url = url
        ),
        DetailMode::ConfirmDelete => format!(
            r#"    <p>Do you really want to delete this book copy?</p>
    <form method="POST" action="{url}/delete">
        <input type="hidden" name="bookinstanceid" value="{id}">
        <button type="submit">Delete</button>
    </form>
"#,
            url = url,
            id = escape_markup(&instance.id),
        ),
    };

    let content = format!(
        r#"    <p>ID: {id}</p>
    <p><strong>Title:</strong> {book}</p>
    <p><strong>Imprint:</strong> {imprint}</p>
    <p><strong>Status:</strong> <span class="{class}">{status}</span></p>
{due}{controls}"#,
        id = escape_markup(&instance.id),
        book = escape_markup(copy.book_title()),
        imprint = instance.imprint,
        class = status_class(&instance.status),
        status = instance.status,
        due = due,
        controls = controls,
    );

    layout(&format!("Copy: {}", copy.book_title()), &content)
}

pub fn book_instance_form(page: &BookInstanceFormPage<'_>) -> String {
    let empty = BookInstanceDraft::default();
    let draft = page.draft.unwrap_or(&empty);

    let book_options: String = page
        .books
        .iter()
        .map(|book| {
            let selected = if page.selected_book == Some(book.id.as_str()) {
                " selected"
            } else {
                ""
            };
            format!(
                "            <option value=\"{id}\"{selected}>{title}</option>\n",
                id = escape_markup(&book.id),
                selected = selected,
                title = escape_markup(&book.title),
            )
        })
        .collect();

    let mut statuses: Vec<&str> = KNOWN_STATUSES.to_vec();
    if !draft.status.is_empty() && !statuses.contains(&draft.status.as_str()) {
        statuses.push(&draft.status);
    }
    let status_options: String = statuses
        .iter()
        .map(|status| {
            let selected = if *status == draft.status { " selected" } else { "" };
            format!(
                "            <option value=\"{status}\"{selected}>{status}</option>\n",
                status = status,
                selected = selected,
            )
        })
        .collect();

    let errors = if page.errors.is_empty() {
        String::new()
    } else {
        let items: String = page
            .errors
            .iter()
            .map(|e| format!("        <li>{}</li>\n", escape_markup(&e.to_string())))
            .collect();
        format!("    <ul class=\"errors\">\n{}    </ul>\n", items)
    };

    let content = format!(
        r#"    <form method="POST" action="">
        <div class="form-group">
            <label for="book">Book:</label>
            <select id="book" name="book" required>
            <option value="">--Please select a book--</option>
{book_options}            </select>
        </div>
        <div class="form-group">
            <label for="imprint">Imprint:</label>
            <input id="imprint" type="text" name="imprint" placeholder="Publisher and date information" required value="{imprint}">
        </div>
        <div class="form-group">
            <label for="due_back">Date when book available:</label>
            <input id="due_back" type="date" name="due_back" value="{due_back}">
        </div>
        <div class="form-group">
            <label for="status">Status:</label>
            <select id="status" name="status">
{status_options}            </select>
        </div>
        <button type="submit">Submit</button>
    </form>
{errors}"#,
        book_options = book_options,
        imprint = draft.imprint,
        due_back = escape_markup(&draft.due_back),
        status_options = status_options,
        errors = errors,
    );

    layout(page.title, &content)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let content = format!(
        "    <h2>{}</h2>\n    <p>{}</p>",
        status.as_u16(),
        escape_markup(message)
    );
    layout("Error", &content)
}
