//! Note creation form state.
//!
//! The form is validated before anything is submitted. Validation failures are
//! meant to be shown inline next to the offending field and never reach the
//! [`MutationCoordinator`](crate::mutation::MutationCoordinator).

use crate::model::{NewNote, NoteTag};
use crate::validation::{validate_note, Field, FieldError, FormErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

impl NoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_tag(mut self, tag: NoteTag) -> Self {
        self.tag = tag;
        self
    }

    /// Returns the create payload, or every failing field.
    pub fn validate(&self) -> Result<NewNote, FormErrors> {
        let note = NewNote::new(self.title.clone(), self.content.clone(), self.tag);
        validate_note(&note)?;
        Ok(note)
    }

    /// Inline error for a single field, for live feedback while typing.
    pub fn field_error(&self, field: Field) -> Option<FieldError> {
        self.validate()
            .err()
            .and_then(|errors| errors.for_field(field).cloned())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
