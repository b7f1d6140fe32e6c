//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

/// Generated OpenAPI description of the REST endpoints.
///
/// The WebSocket endpoint is not described here; see the `ws` module.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "slidecast-relay",
        description = "Session relay for live slides and transcripts"
    ),
    paths(
        super::handlers::system::health_handler,
        super::handlers::deck::upload_deck,
        super::handlers::session::list_sessions,
        super::handlers::session::get_session,
    ),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Decks", description = "Slide deck ingress"),
        (name = "Sessions", description = "Live session inspection"),
    )
)]
pub struct ApiDoc;
