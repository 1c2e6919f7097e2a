use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::NoteDraft,
    slug::{self, SLUG_MAX_LENGTH},
};

/// Substrings a comment must not contain (matched case-insensitively).
pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];
/// Error attached to `text` when a comment contains a forbidden word.
pub const BAD_WORDS_WARNING: &str = "Не ругайтесь!";
/// Suffix of the error attached to `slug` when the slug is already taken.
pub const SLUG_WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_SLUG: &str =
    "Enter a valid “slug” consisting of letters, numbers, underscores or hyphens.";
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn’t match.";

/// Key under which errors not tied to a single field are reported.
pub const NON_FIELD_ERRORS: &str = "__all__";

const NOTE_TITLE_MAX_LENGTH: usize = 100;
const USERNAME_MAX_LENGTH: usize = 150;

/// FormErrors
///
/// Field name to error messages. Serialized as a plain JSON object so a
/// client can render each message next to its input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`; empty when the field is valid.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// BoundForm
///
/// A form as rendered to the client: the submitted (or initial) data plus any
/// validation errors. A page without a `form` key means the client may not
/// submit one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundForm<T> {
    pub data: T,
    pub errors: FormErrors,
}

impl<T> BoundForm<T> {
    pub fn unbound(data: T) -> Self {
        Self { data, errors: FormErrors::default() }
    }

    pub fn with_errors(data: T, errors: FormErrors) -> Self {
        Self { data, errors }
    }
}

// --- News ---

/// CommentForm
///
/// Body of a comment create or edit submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Returns the comment text to store, or the field errors to re-render.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        } else if contains_bad_word(text) {
            errors.add("text", BAD_WORDS_WARNING);
        }
        errors.into_result(text.to_string())
    }
}

fn contains_bad_word(text: &str) -> bool {
    let lowered = text.to_lowercase();
    BAD_WORDS.iter().any(|word| lowered.contains(word))
}

// --- Notes ---

/// NoteForm
///
/// Body of a note create or edit submission. An empty slug asks the server
/// to derive one from the title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

impl NoteForm {
    /// clean
    ///
    /// Checks required fields and lengths and settles the slug. Slug
    /// uniqueness needs the store and is checked by the caller, see
    /// [`slug_taken_error`].
    pub fn clean(&self) -> Result<NoteDraft, FormErrors> {
        let mut errors = FormErrors::default();
        let title = self.title.trim();
        let text = self.text.trim();

        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title.chars().count() > NOTE_TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!("Ensure this value has at most {NOTE_TITLE_MAX_LENGTH} characters."),
            );
        }
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let explicit = self.slug.trim();
        let slug = if explicit.is_empty() {
            slug::derive_slug(title)
        } else {
            explicit.to_string()
        };
        if slug.chars().count() > SLUG_MAX_LENGTH {
            errors.add(
                "slug",
                format!("Ensure this value has at most {SLUG_MAX_LENGTH} characters."),
            );
        } else if !title.is_empty() && !slug::is_valid_slug(&slug) {
            errors.add("slug", INVALID_SLUG);
        }

        errors.into_result(NoteDraft {
            title: title.to_string(),
            text: text.to_string(),
            slug,
        })
    }

    /// Initial form data for editing an existing note.
    pub fn from_note(note: &crate::models::Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}

/// Errors for a slug already used by another note.
pub fn slug_taken_error(slug: &str) -> FormErrors {
    let mut errors = FormErrors::default();
    errors.add("slug", format!("{slug}{SLUG_WARNING}"));
    errors
}

// --- Users ---

/// LoginForm
///
/// Credentials plus the page to return to. The password is never echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result(())
    }
}

/// SignupForm
///
/// Registration body. Passwords are compared here and never echoed back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

impl SignupForm {
    /// Returns `(username, password)` when the form is acceptable apart from
    /// username uniqueness, which the store decides.
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let mut errors = FormErrors::default();
        let username = self.username.trim();

        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else if username.chars().count() > USERNAME_MAX_LENGTH
            || !username
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.add("username", INVALID_USERNAME);
        }
        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        } else if self.password1 != self.password2 {
            errors.add("password2", PASSWORD_MISMATCH);
        }

        errors.into_result((username.to_string(), self.password1.clone()))
    }
}
