//! Artifact ingress: slide deck upload.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{DeckUploadResponse, UploadForm, UploadQuery};
use crate::app_state::AppState;
use crate::domain::SessionCode;
use crate::domain::presentation::positive_count;
use crate::error::{ErrorResponse, RelayError};

/// Multipart part names accepted for the deck file.
const FILE_FIELDS: [&str; 2] = ["pdf", "file"];

/// `POST /upload?code=<code>`: Store a deck and publish it to a session.
///
/// # Errors
///
/// Returns [`RelayError::MissingSessionCode`] or [`RelayError::MissingFile`]
/// (400) before anything is written, and [`RelayError::Storage`] (500) if
/// the file cannot be stored.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "Decks",
    summary = "Upload a slide deck",
    description = "Stores the uploaded file, then pushes a deck-change and a page-change to every viewer of the session.",
    params(UploadQuery),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Deck stored and published", body = DeckUploadResponse),
        (status = 400, description = "Missing session code or file", body = ErrorResponse),
        (status = 500, description = "Deck could not be stored", body = ErrorResponse),
    )
)]
pub async fn upload_deck(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let code = query
        .code
        .as_deref()
        .and_then(SessionCode::parse)
        .ok_or(RelayError::MissingSessionCode)?;
    let mut multipart = multipart.map_err(|_| RelayError::MissingFile)?;

    let mut file = None;
    let mut form_page_counts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::InvalidRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(n) if FILE_FIELDS.contains(&n) && file.is_none() => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
                if file_name.is_some() || !bytes.is_empty() {
                    file = Some((file_name.unwrap_or_default(), bytes));
                }
            }
            Some("pageCount" | "numPages") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
                form_page_counts.push(text);
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or(RelayError::MissingFile)?;
    let page_count = declared_page_count(&query, &form_page_counts);

    let published = state
        .relay
        .publish_deck(&code, &file_name, &bytes, page_count)
        .await?;
    Ok(Json(DeckUploadResponse::from(published)))
}

/// First usable page count, from the query string before the form.
fn declared_page_count(query: &UploadQuery, form: &[String]) -> Option<u32> {
    [query.page_count.as_deref(), query.num_pages.as_deref()]
        .into_iter()
        .flatten()
        .chain(form.iter().map(String::as_str))
        .find_map(parse_page_count)
}

/// Parses a declared page count; invalid values count as "not declared".
fn parse_page_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<f64>().ok().and_then(positive_count)
}

/// Upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/upload", post(upload_deck))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_parsing() {
        assert_eq!(parse_page_count("10"), Some(10));
        assert_eq!(parse_page_count(" 3.0 "), Some(3));
        assert_eq!(parse_page_count("0"), None);
        assert_eq!(parse_page_count("-2"), None);
        assert_eq!(parse_page_count("NaN"), None);
        assert_eq!(parse_page_count("inf"), None);
        assert_eq!(parse_page_count("ten"), None);
    }

    #[test]
    fn declared_page_count_takes_first_usable_value() {
        let both = UploadQuery {
            code: Some("abc".to_string()),
            page_count: Some("12".to_string()),
            num_pages: Some("12".to_string()),
        };
        assert_eq!(declared_page_count(&both, &[]), Some(12));

        let bad_current = UploadQuery {
            page_count: Some("x".to_string()),
            num_pages: Some("8".to_string()),
            ..UploadQuery::default()
        };
        assert_eq!(declared_page_count(&bad_current, &[]), Some(8));

        let form_only = UploadQuery::default();
        let form = vec!["zero".to_string(), "5".to_string()];
        assert_eq!(declared_page_count(&form_only, &form), Some(5));
        assert_eq!(declared_page_count(&form_only, &[]), None);
    }
}
