//! Blog post documents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::document::{Document, RawDocument};
use super::filter::FilterConfig;
use super::query::Criteria;
use crate::error::DecodeError;
use crate::types::{FieldSelector, FieldValue, ItemId, Sort};

/// Status value carried by posts that are visible on the public feed.
pub const PUBLISHED_STATUS: &str = "published";

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: ItemId,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Returns true if the post is visible on the public feed.
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED_STATUS
    }

    /// Criteria for the public feed: published posts, newest first.
    pub fn published_feed() -> Criteria<Post> {
        Criteria::new(
            FilterConfig::default().with_category(PUBLISHED_STATUS),
            Post::default_sort(),
        )
    }
}

/// Fields a post can be sorted or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    Title,
    Author,
    Status,
    CreatedAt,
}

impl FieldSelector for PostField {
    fn all() -> &'static [Self] {
        &[
            PostField::Title,
            PostField::Author,
            PostField::Status,
            PostField::CreatedAt,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Author => "author",
            PostField::Status => "status",
            PostField::CreatedAt => "createdAt",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Document for Post {
    type Field = PostField;

    const COLLECTION: &'static str = "posts";
    const KIND: &'static str = "post";
    const CATEGORY_FIELD: PostField = PostField::Status;
    const RANGE_FIELD: Option<PostField> = None;
    const SEARCH_FIELDS: [PostField; 2] = [PostField::Title, PostField::Author];

    fn default_sort() -> Sort<PostField> {
        Sort::desc(PostField::CreatedAt)
    }

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn value(&self, field: PostField) -> FieldValue<'_> {
        match field {
            PostField::Title => FieldValue::Text(&self.title),
            PostField::Author => FieldValue::Text(&self.author),
            PostField::Status => FieldValue::Text(&self.status),
            PostField::CreatedAt => FieldValue::Time(self.created_at),
        }
    }

    fn decode(raw: &RawDocument) -> Result<Self, DecodeError> {
        Ok(Self {
            id: raw.item_id()?,
            title: raw.text("title"),
            excerpt: raw.text("excerpt"),
            author: raw.text("author"),
            status: raw.text("status"),
            created_at: raw.time("createdAt"),
        })
    }
}
