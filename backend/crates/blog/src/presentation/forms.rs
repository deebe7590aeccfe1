//! Post form

use kernel::validator::{Validator, max_chars, not_blank};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Post;

pub const BLANK: &str = "This field cannot be empty";
pub const MAX_TITLE_CHARS: usize = 140;

/// `POST /post/add` and `POST /post/edit/{id}`
///
/// `name` is the page heading and submit label, filled in by the handler.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostForm {
    #[serde(skip_deserializing)]
    pub name: String,
    pub title: String,
    pub content: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl PostForm {
    pub const ADD: &'static str = "Add Post";
    pub const EDIT: &'static str = "Edit Post";

    /// Empty form for a new post
    pub fn add() -> Self {
        Self {
            name: Self::ADD.to_string(),
            ..Self::default()
        }
    }

    /// Form pre-filled from an existing post
    pub fn edit(post: Post) -> Self {
        Self {
            name: Self::EDIT.to_string(),
            title: post.title,
            content: post.content,
            validator: Validator::default(),
        }
    }

    /// Run every rule; true if the form is valid
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;

        v.check_field(not_blank(&self.title), "title", BLANK);
        v.check_field(
            max_chars(&self.title, MAX_TITLE_CHARS),
            "title",
            "This field cannot be more than 140 characters long",
        );
        v.check_field(not_blank(&self.content), "content", BLANK);

        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str) -> PostForm {
        PostForm {
            title: title.into(),
            content: content.into(),
            ..PostForm::add()
        }
    }

    #[test]
    fn test_valid_post() {
        let mut f = form("Hello", "World");
        assert!(f.validate());
        assert!(f.validator.field_errors.is_empty());
    }

    #[test]
    fn test_blank_fields() {
        let mut f = form("   ", "\n\t");
        assert!(!f.validate());
        assert_eq!(f.validator.field_error("title"), Some(BLANK));
        assert_eq!(f.validator.field_error("content"), Some(BLANK));
    }

    #[test]
    fn test_title_length_counts_characters() {
        let mut f = form(&"é".repeat(140), "x");
        assert!(f.validate());

        let mut f = form(&"a".repeat(141), "x");
        assert!(!f.validate());
        assert_eq!(
            f.validator.field_error("title"),
            Some("This field cannot be more than 140 characters long")
        );
        assert_eq!(f.validator.field_error("content"), None);
    }

    #[test]
    fn test_name_is_not_read_from_the_body() {
        let f: PostForm = serde_json::from_str(r#"{"name":"x","title":"t"}"#).unwrap();
        assert_eq!(f.name, "");
        assert_eq!(f.title, "t");
        assert_eq!(f.content, "");
    }
}
