//! Article store.
//!
//! Holds every article in insertion order and persists the full list under the `articles`
//! key. Derived views (by author type, status, category, free text) are pure filters over
//! [`ArticleStore::list`].

use crate::constants::ARTICLES_KEY;
use crate::models::{Article, ArticlePatch, ArticleStatus, AuthorType, NewArticle};
use crate::seed::sample_articles;
use crate::storage::{load_json, persist_json, Fallback, Hydrated, LocalStorage};
use crate::stores::{allocate_id, observe_ids, touch};
use crate::StoreResult;
use careportal_ids::TimestampIdGenerator;
use careportal_types::{NonEmptyText, StorageKey};
use chrono::Utc;
use std::sync::Arc;

/// Criteria for [`ArticleStore::filter`]. Unset criteria match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub author_type: Option<AuthorType>,
    pub status: Option<ArticleStatus>,
    pub author_id: Option<String>,
    /// Compared case-insensitively.
    pub category: Option<String>,
    /// Case-insensitive substring of title, content or author name. Blank matches everything.
    pub text: Option<String>,
}

impl ArticleFilter {
    pub fn matches(&self, article: &Article) -> bool {
        if self.author_type.is_some_and(|t| t != article.author_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != article.status) {
            return false;
        }
        if let Some(author_id) = &self.author_id {
            if *author_id != article.author_id {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !category.trim().eq_ignore_ascii_case(article.category.trim()) {
                return false;
            }
        }
        match self.text.as_deref().map(NonEmptyText::new) {
            Some(Ok(needle)) => matches_text(article, &needle),
            _ => true,
        }
    }
}

fn matches_text(article: &Article, needle: &NonEmptyText) -> bool {
    let needle = needle.as_str().to_lowercase();
    [&article.title, &article.content, &article.author_name]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// In-memory article collection backed by local storage.
#[derive(Debug)]
pub struct ArticleStore {
    storage: Arc<dyn LocalStorage>,
    key: StorageKey,
    articles: Vec<Article>,
    ids: TimestampIdGenerator,
}

impl ArticleStore {
    /// Loads the persisted article list, falling back to the sample set (or an empty list when
    /// `seed_sample_data` is false) if nothing usable is stored.
    ///
    /// A fallback is written back immediately so the storage matches what is in memory. Failing
    /// to write it is logged, not returned.
    pub fn hydrate(storage: Arc<dyn LocalStorage>, seed_sample_data: bool) -> StoreResult<Self> {
        Self::hydrate_with(storage, seed_sample_data, Fallback::WriteBack)
    }

    /// Like [`hydrate`](Self::hydrate), with explicit control over writing the fallback back.
    pub fn hydrate_with(
        storage: Arc<dyn LocalStorage>,
        seed_sample_data: bool,
        fallback: Fallback,
    ) -> StoreResult<Self> {
        let key = StorageKey::new(ARTICLES_KEY)?;

        let (articles, from_storage) = match load_json::<Vec<Article>>(storage.as_ref(), &key) {
            Hydrated::Loaded(articles) => (articles, true),
            Hydrated::Missing | Hydrated::Discarded if seed_sample_data => {
                (sample_articles(), false)
            }
            Hydrated::Missing | Hydrated::Discarded => (Vec::new(), false),
        };

        let mut ids = TimestampIdGenerator::new();
        observe_ids(&mut ids, articles.iter().map(|a| a.id.as_str()));

        let store = Self {
            storage,
            key,
            articles,
            ids,
        };

        if !from_storage && fallback == Fallback::WriteBack {
            if let Err(e) = store.persist() {
                tracing::warn!("failed to write initial articles: {}", e);
            }
        }
        tracing::info!(
            "hydrated {} articles ({})",
            store.articles.len(),
            if from_storage { "storage" } else { "fallback" }
        );

        Ok(store)
    }

    /// All articles in insertion order.
    pub fn list(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Appends a new article with a fresh id and `createdAt = updatedAt = now`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting fails. The article stays in memory.
    pub fn add(&mut self, new_article: NewArticle) -> StoreResult<Article> {
        let articles = &self.articles;
        let id = allocate_id(&mut self.ids, |candidate| {
            articles.iter().any(|a| a.id == candidate)
        });

        let article = new_article.into_article(id, Utc::now());
        tracing::debug!("adding article {} ({})", article.id, article.title);
        self.articles.push(article.clone());
        self.persist()?;

        Ok(article)
    }

    /// Merges `patch` into the article with `id` and refreshes `updatedAt`.
    ///
    /// Returns `Ok(None)` without touching storage when no article has that id.
    pub fn update(&mut self, id: &str, patch: ArticlePatch) -> StoreResult<Option<Article>> {
        let Some(article) = self.articles.iter_mut().find(|a| a.id == id) else {
            tracing::debug!("update ignored, no article {}", id);
            return Ok(None);
        };

        if patch.is_empty() {
            tracing::debug!("empty patch for article {}, refreshing updatedAt only", id);
        }
        patch.apply(article);
        article.updated_at = touch(article.updated_at);
        let updated = article.clone();
        self.persist()?;

        Ok(Some(updated))
    }

    /// Removes the article with `id`. Returns whether anything was removed.
    ///
    /// Deleting an unknown id is a no-op and does not touch storage.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.articles.len();
        self.articles.retain(|a| a.id != id);
        if self.articles.len() == before {
            return Ok(false);
        }
        tracing::debug!("deleted article {}", id);
        self.persist()?;
        Ok(true)
    }

    pub fn filter(&self, filter: &ArticleFilter) -> Vec<&Article> {
        self.articles.iter().filter(|a| filter.matches(a)).collect()
    }

    pub fn by_author_type(&self, author_type: AuthorType) -> Vec<&Article> {
        self.filter(&ArticleFilter {
            author_type: Some(author_type),
            ..ArticleFilter::default()
        })
    }

    pub fn by_status(&self, status: ArticleStatus) -> Vec<&Article> {
        self.filter(&ArticleFilter {
            status: Some(status),
            ..ArticleFilter::default()
        })
    }

    pub fn by_category(&self, category: &str) -> Vec<&Article> {
        self.filter(&ArticleFilter {
            category: Some(category.to_string()),
            ..ArticleFilter::default()
        })
    }

    pub fn by_author(&self, author_id: &str) -> Vec<&Article> {
        self.filter(&ArticleFilter {
            author_id: Some(author_id.to_string()),
            ..ArticleFilter::default()
        })
    }

    pub fn search(&self, text: &str) -> Vec<&Article> {
        self.filter(&ArticleFilter {
            text: Some(text.to_string()),
            ..ArticleFilter::default()
        })
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for article in &self.articles {
            if !seen.contains(&article.category.as_str()) {
                seen.push(&article.category);
            }
        }
        seen
    }

    fn persist(&self) -> StoreResult<()> {
        persist_json(self.storage.as_ref(), &self.key, &self.articles)
    }
}
