//! Post and comment composers
//!
//! Length rules are enforced here, before any request; the backend is not
//! assumed to validate anything.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Comment, NewComment, NewPost, Post};
use crate::error::{AppError, Result};
use crate::repository::SocialStore;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PostDraft {
    #[serde(default)]
    #[validate(length(max = 280, message = "Content or title cannot exceed 280 characters."))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 280, message = "Content or title cannot exceed 280 characters."))]
    pub content: String,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// The submit control only exists once a title has been typed
    pub fn can_submit(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if !self.can_submit() {
            return Err(AppError::Validation("Please enter a title.".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentDraft {
    #[validate(length(max = 200, message = "Comment can be only 200 characters long."))]
    pub content: String,
}

impl CommentDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn check(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("Please enter a comment.".to_string()));
        }
        self.validate()?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PostComposer {
    store: Arc<dyn SocialStore>,
    author: Uuid,
}

impl PostComposer {
    pub fn new(store: Arc<dyn SocialStore>, author: Uuid) -> Self {
        Self { store, author }
    }

    pub async fn submit(&self, draft: PostDraft) -> Result<Post> {
        draft.check()?;

        let post = self
            .store
            .insert_post(NewPost {
                user_id: self.author,
                title: draft.title,
                content: draft.content,
            })
            .await
            .map_err(|e| {
                error!(author = %self.author, error = %e, "Error submitting post");
                e
            })?;

        info!(post_id = %post.id, author = %self.author, "post created");
        Ok(post)
    }
}

#[derive(Clone)]
pub struct CommentComposer {
    store: Arc<dyn SocialStore>,
    author: Uuid,
}

impl CommentComposer {
    pub fn new(store: Arc<dyn SocialStore>, author: Uuid) -> Self {
        Self { store, author }
    }

    /// Insert the comment, then bring the post's `comment_amount` in line
    /// with the actual number of comment rows.
    pub async fn submit(&self, post_id: Uuid, draft: CommentDraft) -> Result<Comment> {
        draft.check()?;

        let comment = self
            .store
            .insert_comment(NewComment {
                user_id: self.author,
                post_id,
                content: draft.content,
            })
            .await
            .map_err(|e| {
                error!(%post_id, author = %self.author, error = %e, "Error submitting comment");
                e
            })?;

        // The comment is stored either way; a stale counter heals on the next comment.
        if let Err(e) = self.reconcile_comment_amount(post_id).await {
            warn!(%post_id, error = %e, "comment counter not updated");
        }

        info!(%post_id, comment_id = %comment.id, "comment created");
        Ok(comment)
    }

    async fn reconcile_comment_amount(&self, post_id: Uuid) -> Result<()> {
        let count = self.store.count_comments(post_id).await?;
        self.store.set_comment_amount(post_id, count).await
    }
}
