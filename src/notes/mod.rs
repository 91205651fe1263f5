pub mod http;
pub mod service;

pub use service::{NoteError, NoteService, NoteWithUsername};
