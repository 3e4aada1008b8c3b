//! Health article records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::StoreError;

/// Who wrote an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorType {
    Doctor,
    Admin,
}

impl AuthorType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthorType::Doctor => "doctor",
            AuthorType::Admin => "admin",
        }
    }
}

impl fmt::Display for AuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(AuthorType::Doctor),
            "admin" => Ok(AuthorType::Admin),
            other => Err(StoreError::InvalidInput(format!(
                "author type must be doctor or admin, got '{other}'"
            ))),
        }
    }
}

/// Publication state of an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            other => Err(StoreError::InvalidInput(format!(
                "article status must be draft or published, got '{other}'"
            ))),
        }
    }
}

/// A health article as persisted under the `articles` key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub author_type: AuthorType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: ArticleStatus,
    pub category: String,
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fields supplied by the caller when adding an article.
///
/// The store assigns `id`, `createdAt` and `updatedAt`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub author_type: AuthorType,
    pub status: ArticleStatus,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub image_url: Option<String>,
}

impl NewArticle {
    pub(crate) fn into_article(self, id: String, now: DateTime<Utc>) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            author_name: self.author_name,
            author_type: self.author_type,
            created_at: now,
            updated_at: now,
            status: self.status,
            category: self.category,
            tags: self.tags,
            image_url: self.image_url,
        }
    }
}

/// Partial update for an article. `None` leaves a field untouched.
///
/// `image_url: Some(None)` removes the image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author_type: Option<AuthorType>,
    pub status: Option<ArticleStatus>,
    pub category: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub image_url: Option<Option<String>>,
}

impl ArticlePatch {
    /// Patch that only changes the status.
    pub fn status(status: ArticleStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the patch into `article`. Timestamps are the caller's concern.
    pub(crate) fn apply(self, article: &mut Article) {
        if let Some(title) = self.title {
            article.title = title;
        }
        if let Some(content) = self.content {
            article.content = content;
        }
        if let Some(author_id) = self.author_id {
            article.author_id = author_id;
        }
        if let Some(author_name) = self.author_name {
            article.author_name = author_name;
        }
        if let Some(author_type) = self.author_type {
            article.author_type = author_type;
        }
        if let Some(status) = self.status {
            article.status = status;
        }
        if let Some(category) = self.category {
            article.category = category;
        }
        if let Some(tags) = self.tags {
            article.tags = tags;
        }
        if let Some(image_url) = self.image_url {
            article.image_url = image_url;
        }
    }
}
