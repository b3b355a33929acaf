use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::utils::error::CustomError;
use crate::utils::helpers::{generate_id, now};
use crate::utils::validation::{FieldViolation, JsonFields, merge_violations, rule};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub bookmarked: bool,
}

impl Post {
    /// Builds a new post from a payload that already passed `PostPayload::check`.
    pub fn from_payload(payload: PostPayload) -> Self {
        Post {
            id: generate_id(),
            title: payload.title.unwrap_or_default(),
            content: payload.content.unwrap_or_default(),
            author: payload.author.unwrap_or_default(),
            tags: payload.tags.unwrap_or_default(),
            date: now(),
            bookmarked: payload.bookmarked.unwrap_or(false),
        }
    }

    /// Overlays the payload on the stored record. `id` and `date` never change;
    /// fields absent from the payload keep their stored value.
    pub fn merge(&mut self, payload: PostPayload) {
        if let Some(title) = payload.title {
            self.title = title;
        }
        if let Some(content) = payload.content {
            self.content = content;
        }
        if let Some(author) = payload.author {
            self.author = author;
        }
        if let Some(tags) = payload.tags {
            self.tags = tags;
        }
        if let Some(bookmarked) = payload.bookmarked {
            self.bookmarked = bookmarked;
        }
    }
}

/// Body of `POST /posts` and `PATCH /posts/{id}`.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct PostPayload {
    #[validate(
        required(message = "title is required"),
        length(min = 3, message = "title must be at least 3 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "content is required"),
        length(min = 5, message = "content must be at least 5 characters")
    )]
    pub content: Option<String>,

    #[validate(
        required(message = "author is required"),
        length(min = 1, message = "author cannot be empty")
    )]
    pub author: Option<String>,

    #[validate(required(message = "tags is required"))]
    pub tags: Option<Vec<String>>,

    pub bookmarked: Option<bool>,

    /// Fields that were sent with the wrong JSON type.
    #[serde(skip)]
    pub rejected: Vec<FieldViolation>,
}

impl PostPayload {
    /// Reads a request body. Only a non-object body fails here; wrongly typed
    /// fields are kept for `check` so they show up next to every other violation.
    pub fn from_json(body: Value) -> Result<Self, CustomError> {
        let mut fields = JsonFields::new(body)?;

        let title = fields.take("title", "a string");
        let content = fields.take("content", "a string");
        let author = fields.take("author", "a string");
        let tags = fields.take("tags", "an array of strings");
        let bookmarked = fields.take("bookmarked", "a boolean");

        Ok(PostPayload {
            title,
            content,
            author,
            tags,
            bookmarked,
            rejected: fields.into_rejected(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.tags.is_none()
            && self.bookmarked.is_none()
            && self.rejected.is_empty()
    }

    /// Runs every rule and reports all failures together.
    pub fn check(&self) -> Result<(), CustomError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(tags) = &self.tags {
            if tags.iter().any(|t| t.trim().is_empty()) {
                errors.add("tags", rule("empty_tag", "tags cannot contain empty values"));
            }
        }

        let list = merge_violations(&self.rejected, &errors);
        if list.is_empty() {
            Ok(())
        } else {
            Err(CustomError::ValidationError(list))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
