//! Per-post interaction state: likes, comment visibility and comment list.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::{Comment, CommentRow, Like, Route};
use crate::error::Result;
use crate::repository::SocialStore;
use crate::services::composer::{CommentComposer, CommentDraft};
use crate::services::feed::ANONYMOUS;
use crate::services::TimestampFormatter;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub author_route: Route,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

pub struct PostItem {
    store: Arc<dyn SocialStore>,
    formatter: TimestampFormatter,
    viewer: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    comments_visible: bool,
    comments: Vec<CommentView>,
    liked: bool,
    like_count: i64,
}

impl PostItem {
    pub fn new(
        store: Arc<dyn SocialStore>,
        formatter: TimestampFormatter,
        viewer: Uuid,
        post_id: Uuid,
        author_id: Uuid,
    ) -> Self {
        Self {
            store,
            formatter,
            viewer,
            post_id,
            author_id,
            comments_visible: false,
            comments: Vec::new(),
            liked: false,
            like_count: 0,
        }
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    pub fn like_state(&self) -> LikeState {
        LikeState {
            liked: self.liked,
            like_count: self.like_count,
        }
    }

    pub fn comments_visible(&self) -> bool {
        self.comments_visible
    }

    pub fn comments(&self) -> &[CommentView] {
        &self.comments
    }

    /// Where the author name links to
    pub fn author_route(&self) -> Route {
        Route::for_profile(self.viewer, self.author_id)
    }

    /// Query the like edges; `liked` is whether the viewer holds one
    pub async fn load_likes(&mut self) -> Result<LikeState> {
        let (likes, count) = self.store.list_likes(self.post_id).await.map_err(|e| {
            error!(post_id = %self.post_id, error = %e, "Error fetching likes");
            e
        })?;

        self.liked = likes.iter().any(|like| like.user_id == self.viewer);
        self.like_count = count;
        Ok(self.like_state())
    }

    /// Flip the like state immediately, then persist. A failed write puts
    /// the previous state back.
    pub async fn toggle_like(&mut self) -> Result<LikeState> {
        let was_liked = self.liked;
        self.liked = !was_liked;

        let like = Like {
            post_id: self.post_id,
            user_id: self.viewer,
        };
        let outcome = if was_liked {
            self.store.delete_like(like).await
        } else {
            self.store.insert_like(like).await
        };

        match outcome {
            Ok(()) => {
                self.like_count = if was_liked {
                    (self.like_count - 1).max(0)
                } else {
                    self.like_count + 1
                };
                debug!(post_id = %self.post_id, liked = self.liked, "like toggled");
                Ok(self.like_state())
            }
            Err(e) => {
                self.liked = was_liked;
                error!(post_id = %self.post_id, error = %e, "Error toggling like");
                Err(e)
            }
        }
    }

    /// Show or hide the comment list; showing it always refetches
    pub async fn toggle_comments(&mut self) -> Result<bool> {
        self.comments_visible = !self.comments_visible;
        if self.comments_visible {
            self.fetch_comments().await?;
        }
        Ok(self.comments_visible)
    }

    pub async fn fetch_comments(&mut self) -> Result<&[CommentView]> {
        let rows = self.store.list_comments(self.post_id).await.map_err(|e| {
            error!(post_id = %self.post_id, error = %e, "Error fetching comments");
            e
        })?;

        self.comments = rows.into_iter().map(|row| self.present(row)).collect();
        Ok(&self.comments)
    }

    /// Post a comment as the viewer, then reload the list. The comment is
    /// stored once the insert succeeds; a failed reload keeps the old list.
    pub async fn submit_comment(&mut self, draft: CommentDraft) -> Result<Comment> {
        let comment = CommentComposer::new(self.store.clone(), self.viewer)
            .submit(self.post_id, draft)
            .await?;
        if let Err(e) = self.fetch_comments().await {
            warn!(post_id = %self.post_id, error = %e, "comment list not refreshed");
        }
        Ok(comment)
    }

    fn present(&self, row: CommentRow) -> CommentView {
        let CommentRow { comment, profiles } = row;
        CommentView {
            id: comment.id,
            user_id: comment.user_id,
            author_name: profiles
                .and_then(|p| p.username)
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            author_route: Route::for_profile(self.viewer, comment.user_id),
            content: comment.content,
            created_at: self.formatter.format(comment.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AuthorRef;
    use crate::error::AppError;
    use crate::repository::MockSocialStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn comment_row(post_id: Uuid, user_id: Uuid, username: Option<&str>) -> CommentRow {
        CommentRow {
            comment: Comment {
                id: Uuid::new_v4(),
                post_id,
                user_id,
                content: "hi".to_string(),
                created_at: Utc::now(),
            },
            profiles: Some(AuthorRef {
                id: Some(user_id),
                username: username.map(str::to_string),
            }),
        }
    }

    #[tokio::test]
    async fn test_load_likes_detects_viewer() {
        let viewer = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut store = MockSocialStore::new();
        store
            .expect_list_likes()
            .with(eq(post_id))
            .returning(move |post_id| {
                Ok((
                    vec![
                        Like { post_id, user_id: Uuid::new_v4() },
                        Like { post_id, user_id: viewer },
                    ],
                    2,
                ))
            });

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            viewer,
            post_id,
            Uuid::new_v4(),
        );
        let state = item.load_likes().await.unwrap();
        assert_eq!(state, LikeState { liked: true, like_count: 2 });
    }

    #[tokio::test]
    async fn test_toggle_like_round_trip() {
        let viewer = Uuid::new_v4();
        let post_id = Uuid::new_v4();
        let like = Like { post_id, user_id: viewer };

        let mut store = MockSocialStore::new();
        store
            .expect_list_likes()
            .returning(|_| Ok((Vec::new(), 0)));
        store
            .expect_insert_like()
            .with(eq(like.clone()))
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_delete_like()
            .with(eq(like))
            .times(1)
            .returning(|_| Ok(()));

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            viewer,
            post_id,
            viewer,
        );
        item.load_likes().await.unwrap();

        let state = item.toggle_like().await.unwrap();
        assert_eq!(state, LikeState { liked: true, like_count: 1 });

        let state = item.toggle_like().await.unwrap();
        assert_eq!(state, LikeState { liked: false, like_count: 0 });
    }

    #[tokio::test]
    async fn test_failed_like_rolls_back() {
        let mut store = MockSocialStore::new();
        store
            .expect_list_likes()
            .returning(|_| Ok((Vec::new(), 5)));
        store
            .expect_insert_like()
            .returning(|_| Err(AppError::Internal("network down".into())));

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        item.load_likes().await.unwrap();

        assert!(item.toggle_like().await.is_err());
        assert_eq!(item.like_state(), LikeState { liked: false, like_count: 5 });
    }

    #[tokio::test]
    async fn test_toggle_comments_fetches_when_shown() {
        let viewer = Uuid::new_v4();
        let other = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut store = MockSocialStore::new();
        store
            .expect_list_comments()
            .with(eq(post_id))
            .times(1)
            .returning(move |post_id| {
                Ok(vec![
                    comment_row(post_id, viewer, Some("me")),
                    comment_row(post_id, other, None),
                ])
            });

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            viewer,
            post_id,
            other,
        );

        assert!(item.toggle_comments().await.unwrap());
        let comments = item.comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].author_route, Route::Profile);
        assert_eq!(comments[1].author_name, ANONYMOUS);
        assert_eq!(comments[1].author_route, Route::ProfileViewer(other));

        // Hiding does not fetch again
        assert!(!item.toggle_comments().await.unwrap());
        assert_eq!(item.author_route(), Route::ProfileViewer(other));
    }

    #[tokio::test]
    async fn test_submit_comment_refreshes_list() {
        let viewer = Uuid::new_v4();
        let post_id = Uuid::new_v4();

        let mut store = MockSocialStore::new();
        store.expect_insert_comment().times(1).returning(|c| {
            Ok(Comment {
                id: Uuid::new_v4(),
                post_id: c.post_id,
                user_id: c.user_id,
                content: c.content,
                created_at: Utc::now(),
            })
        });
        store.expect_count_comments().returning(|_| Ok(1));
        store.expect_set_comment_amount().returning(|_, _| Ok(()));
        store
            .expect_list_comments()
            .times(1)
            .returning(move |post_id| Ok(vec![comment_row(post_id, viewer, Some("me"))]));

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            viewer,
            post_id,
            viewer,
        );
        item.submit_comment(CommentDraft::new("hi")).await.unwrap();
        assert_eq!(item.comments().len(), 1);
    }

    #[tokio::test]
    async fn test_comment_kept_when_list_refresh_fails() {
        let mut store = MockSocialStore::new();
        store.expect_insert_comment().times(1).returning(|c| {
            Ok(Comment {
                id: Uuid::new_v4(),
                post_id: c.post_id,
                user_id: c.user_id,
                content: c.content,
                created_at: Utc::now(),
            })
        });
        store.expect_count_comments().returning(|_| Ok(1));
        store.expect_set_comment_amount().returning(|_, _| Ok(()));
        store
            .expect_list_comments()
            .times(1)
            .returning(|_| Err(AppError::Internal("boom".into())));

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        let comment = item
            .submit_comment(CommentDraft::new("saved once"))
            .await
            .unwrap();

        assert_eq!(comment.content, "saved once");
        assert!(item.comments().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_comment_sends_nothing() {
        let mut store = MockSocialStore::new();
        store.expect_insert_comment().times(0);
        store.expect_list_comments().times(0);

        let mut item = PostItem::new(
            Arc::new(store),
            TimestampFormatter::utc(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        let err = item
            .submit_comment(CommentDraft::new("x".repeat(201)))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
