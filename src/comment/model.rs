use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::utils::error::CustomError;
use crate::utils::helpers::{generate_id, now};
use crate::utils::validation::{FieldViolation, JsonFields, merge_violations};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author: String,
    pub content: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: &str, payload: CommentPayload) -> Self {
        Comment {
            id: generate_id(),
            post_id: post_id.to_string(),
            author: payload.author.unwrap_or_default(),
            content: payload.content.unwrap_or_default(),
            date: now(),
        }
    }
}

/// Body of `POST /posts/{postId}/comments`.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct CommentPayload {
    #[validate(
        required(message = "author is required"),
        length(min = 1, message = "author cannot be empty")
    )]
    pub author: Option<String>,

    #[validate(
        required(message = "content is required"),
        length(min = 1, message = "content cannot be empty")
    )]
    pub content: Option<String>,

    #[serde(skip)]
    pub rejected: Vec<FieldViolation>,
}

impl CommentPayload {
    pub fn from_json(body: Value) -> Result<Self, CustomError> {
        let mut fields = JsonFields::new(body)?;

        let author = fields.take("author", "a string");
        let content = fields.take("content", "a string");

        Ok(CommentPayload {
            author,
            content,
            rejected: fields.into_rejected(),
        })
    }

    pub fn check(&self) -> Result<(), CustomError> {
        let errors = self.validate().err().unwrap_or_else(ValidationErrors::new);

        let list = merge_violations(&self.rejected, &errors);
        if list.is_empty() {
            Ok(())
        } else {
            Err(CustomError::ValidationError(list))
        }
    }
}
