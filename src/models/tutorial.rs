use serde::{Deserialize, Serialize};

/// Maximum length for a tutorial title.
pub const TITLE_MAX_LEN: usize = 20;

/// Maximum length for a tutorial description.
pub const DESCRIPTION_MAX_LEN: usize = 200;

/// A tutorial record as stored by the backend.
///
/// The `id` is server-assigned and immutable; updates always send the
/// full record back via PUT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tutorial {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub published: bool,
}

impl Tutorial {
    /// Display string for the publish flag.
    pub fn status(&self) -> &'static str {
        if self.published {
            "Published"
        } else {
            "Unpublished"
        }
    }
}

/// Payload for creating a tutorial. The server assigns the id and
/// defaults `published` to false.
#[derive(Debug, Clone, Serialize)]
pub struct NewTutorial {
    pub title: String,
    pub description: String,
}

/// Validation failure for a single draft field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl DraftErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Mutable form state for the create and edit views.
///
/// A draft is owned by exactly one view: seeded from a fetch result in
/// the edit view, empty in the create view. `validate` must pass before
/// any request is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

impl Draft {
    pub fn from_tutorial(tutorial: &Tutorial) -> Self {
        Self {
            title: tutorial.title.clone(),
            description: tutorial.description.clone(),
        }
    }

    /// Client-side validation: both fields required, bounded length.
    pub fn validate(&self) -> Result<(), DraftErrors> {
        let mut errors = DraftErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some("this field is required");
        } else if self.title.chars().count() > TITLE_MAX_LEN {
            errors.title = Some("too long (max 20 chars)");
        }

        if self.description.trim().is_empty() {
            errors.description = Some("this field is required");
        } else if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            errors.description = Some("too long (max 200 chars)");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the create payload from a validated draft.
    pub fn to_new_tutorial(&self) -> NewTutorial {
        NewTutorial {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }

    /// Build the full-record update payload. Both write paths in the
    /// edit view funnel through this: the form submit passes the
    /// record's current publish flag, the publish toggle passes the
    /// flipped one.
    pub fn to_update(&self, id: i64, published: bool) -> Tutorial {
        Tutorial {
            id,
            title: self.title.clone(),
            description: self.description.clone(),
            published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tutorial() {
        let json = r#"{"id": 7, "title": "A", "description": "B", "published": true}"#;
        let t: Tutorial = serde_json::from_str(json).expect("Failed to parse tutorial");
        assert_eq!(t.id, 7);
        assert_eq!(t.title, "A");
        assert_eq!(t.description, "B");
        assert!(t.published);
    }

    #[test]
    fn test_parse_tutorial_published_defaults_false() {
        let json = r#"{"id": 1, "title": "A", "description": "B"}"#;
        let t: Tutorial = serde_json::from_str(json).expect("Failed to parse tutorial");
        assert!(!t.published);
        assert_eq!(t.status(), "Unpublished");
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let draft = Draft::default();
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.title, Some("this field is required"));
        assert_eq!(errors.description, Some("this field is required"));

        // Whitespace-only counts as empty
        let draft = Draft {
            title: "   ".to_string(),
            description: "ok".to_string(),
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.title.is_some());
        assert!(errors.description.is_none());
    }

    #[test]
    fn test_validate_rejects_over_length() {
        let draft = Draft {
            title: "x".repeat(TITLE_MAX_LEN + 1),
            description: "y".repeat(DESCRIPTION_MAX_LEN + 1),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.title, Some("too long (max 20 chars)"));
        assert_eq!(errors.description, Some("too long (max 200 chars)"));
    }

    #[test]
    fn test_validate_accepts_boundary_length() {
        let draft = Draft {
            title: "x".repeat(TITLE_MAX_LEN),
            description: "y".repeat(DESCRIPTION_MAX_LEN),
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_publish_toggle_preserves_content() {
        let record = Tutorial {
            id: 3,
            title: "Rust".to_string(),
            description: "Ownership".to_string(),
            published: false,
        };
        let draft = Draft::from_tutorial(&record);

        let toggled = draft.to_update(record.id, !record.published);
        assert!(toggled.published);
        assert_eq!(toggled.title, record.title);
        assert_eq!(toggled.description, record.description);
        assert_eq!(toggled.id, record.id);
    }
}
