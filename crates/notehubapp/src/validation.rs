//! Field validation for the note form.
//!
//! Rules:
//! - Title is required and must be 3 to 50 characters long
//! - Content is optional and at most 500 characters long
//! - Tag is one of the [`NoteTag`](crate::model::NoteTag) variants, enforced by the type
//!
//! Lengths count Unicode scalar values, not bytes.

use crate::model::NewNote;
use std::fmt;

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 50;
pub const CONTENT_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Content,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Title => f.write_str("title"),
            Field::Content => f.write_str("content"),
        }
    }
}

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Title is empty
    TitleRequired,
    /// Title is shorter than [`TITLE_MIN_LEN`]
    TitleTooShort(usize),
    /// Title is longer than [`TITLE_MAX_LEN`]
    TitleTooLong(usize),
    /// Content is longer than [`CONTENT_MAX_LEN`]
    ContentTooLong(usize),
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::TitleRequired
            | FieldError::TitleTooShort(_)
            | FieldError::TitleTooLong(_) => Field::Title,
            FieldError::ContentTooLong(_) => Field::Content,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::TitleRequired => write!(f, "title is required"),
            FieldError::TitleTooShort(len) => write!(
                f,
                "title must be at least {} characters, got {}",
                TITLE_MIN_LEN, len
            ),
            FieldError::TitleTooLong(len) => write!(
                f,
                "title must be at most {} characters, got {}",
                TITLE_MAX_LEN, len
            ),
            FieldError::ContentTooLong(len) => write!(
                f,
                "content must be at most {} characters, got {}",
                CONTENT_MAX_LEN, len
            ),
        }
    }
}

impl std::error::Error for FieldError {}

/// Every failed rule of one form submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// The error to show next to `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }

    fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn validate_title(title: &str) -> Result<(), FieldError> {
    if title.is_empty() {
        return Err(FieldError::TitleRequired);
    }

    let len = title.chars().count();
    if len < TITLE_MIN_LEN {
        return Err(FieldError::TitleTooShort(len));
    }
    if len > TITLE_MAX_LEN {
        return Err(FieldError::TitleTooLong(len));
    }

    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), FieldError> {
    let len = content.chars().count();
    if len > CONTENT_MAX_LEN {
        return Err(FieldError::ContentTooLong(len));
    }
    Ok(())
}

/// Validates a create payload, collecting every failing field.
///
/// # Examples
/// ```
/// use notehubapp::model::{NewNote, NoteTag};
/// use notehubapp::validation::validate_note;
///
/// assert!(validate_note(&NewNote::new("Buy milk", "", NoteTag::Shopping)).is_ok());
/// assert!(validate_note(&NewNote::new("ab", "", NoteTag::Todo)).is_err());
/// ```
pub fn validate_note(note: &NewNote) -> Result<(), FormErrors> {
    let mut errors = FormErrors::default();

    if let Err(e) = validate_title(&note.title) {
        errors.push(e);
    }
    if let Err(e) = validate_content(&note.content) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
