use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::core::http::handlers::health,
        crate::notes::http::handlers::list_notes,
        crate::notes::http::handlers::create_note,
        crate::notes::http::handlers::update_note,
        crate::notes::http::handlers::delete_note
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::store::Note,
        crate::notes::NoteWithUsername,
        crate::notes::http::CreateNoteRequest,
        crate::notes::http::UpdateNoteRequest,
        crate::notes::http::DeleteNoteRequest,
        crate::notes::http::MessageResponse
    )),
    tags(
        (name = "Core", description = "Service endpoints"),
        (name = "Notes", description = "Notes endpoints")
    )
)]
pub struct ApiDoc;
