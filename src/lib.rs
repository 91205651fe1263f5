use std::sync::Arc;

use crate::notes::NoteService;
use crate::store::{NoteStore, UserStore};

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod notes;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub notes: NoteService,
}

impl AppState {
    pub fn new(notes: Arc<dyn NoteStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            notes: NoteService::new(notes, users),
        }
    }
}
