//! Application display state and the actions that move it.
//!
//! All UI-facing state lives in one `AppState`; it only changes through
//! `AppState::apply`, which also performs the matching `NoteStore` mutation.
use log::debug;

use crate::{
    filter_notes, Category, CategoryFilter, DiaryError, DisplayMode, KeyValueStore, Note,
    NoteStore, Result, ValidationError,
};

/// A single user intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetInput(String),
    SelectCategory(Category),
    SetSearch(String),
    SetFilter(CategoryFilter),
    /// Create a note from the input, or update the note being edited
    Submit,
    /// Load a note into the input for editing
    StartEdit(i64),
    CancelEdit,
    Delete(i64),
    ToggleDisplayMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub input: String,
    pub category: Category,
    pub search: String,
    pub filter: CategoryFilter,
    /// Id of the note currently loaded for editing
    pub editing: Option<i64>,
    pub display_mode: DisplayMode,
}

impl AppState {
    /// Initial state with the persisted display mode
    pub fn load<S: KeyValueStore>(store: &NoteStore<S>) -> Result<Self> {
        Ok(Self {
            display_mode: store.persistence().load_display_mode()?,
            ..Self::default()
        })
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Applies `action`. On error the state is left as it was, except that a
    /// submit for a note that no longer exists drops out of edit mode.
    pub fn apply<S: KeyValueStore>(&mut self, action: Action, store: &mut NoteStore<S>) -> Result<()> {
        debug!("Applying {:?}", action);
        match action {
            Action::SetInput(text) => self.input = text,
            Action::SelectCategory(category) => self.category = category,
            Action::SetSearch(term) => self.search = term,
            Action::SetFilter(filter) => self.filter = filter,
            Action::Submit => self.submit(store)?,
            Action::StartEdit(id) => {
                let note = store.get(id).ok_or(ValidationError::NotFound { id })?;
                self.input = note.text.clone();
                self.category = note.category;
                self.editing = Some(id);
            }
            Action::CancelEdit => {
                self.editing = None;
                self.input.clear();
            }
            Action::Delete(id) => {
                store.delete(id)?;
                if self.editing == Some(id) {
                    self.editing = None;
                    self.input.clear();
                }
            }
            Action::ToggleDisplayMode => {
                let mode = self.display_mode.toggled();
                store.persistence_mut().save_display_mode(mode)?;
                self.display_mode = mode;
            }
        }
        Ok(())
    }

    fn submit<S: KeyValueStore>(&mut self, store: &mut NoteStore<S>) -> Result<()> {
        let result = match self.editing {
            Some(id) => store.update(id, &self.input, self.category),
            None => store.create(&self.input, self.category),
        };
        if let Err(e) = result {
            if matches!(e, DiaryError::Validation(ValidationError::NotFound { .. })) {
                self.editing = None;
            }
            return Err(e);
        }
        self.editing = None;
        self.input.clear();
        Ok(())
    }

    /// The notes to show for the current search term and filter
    pub fn visible_notes<'a, S: KeyValueStore>(&self, store: &'a NoteStore<S>) -> Vec<&'a Note> {
        filter_notes(store.notes(), &self.search, &self.filter)
    }
}
