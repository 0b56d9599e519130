//! In-memory SocialStore for integration tests
//!
//! Behaves like the hosted tables closely enough for the interaction
//! services: posts newest first with author and like joins, exact counts,
//! and case-insensitive substring search on usernames.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use social_web::domain::{
    AuthorRef, Comment, CommentRow, FollowEdge, Like, LikeRef, NewComment, NewPost, Post, PostRow,
    Profile,
};
use social_web::repository::{PostAuthors, SocialStore};
use social_web::Result;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<Like>,
    follows: Vec<FollowEdge>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    /// Number of search_profiles calls
    search_calls: Arc<Mutex<usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().profiles.push(Profile {
            id,
            username: Some(username.to_string()),
            full_name: None,
            bio: None,
            website: None,
        });
        id
    }

    /// Post created `age_minutes` ago
    pub fn add_post(&self, author: Uuid, title: &str, age_minutes: i64) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().posts.push(Post {
            id,
            user_id: author,
            title: title.to_string(),
            content: String::new(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            comment_amount: 0,
        });
        id
    }

    pub fn add_like(&self, post_id: Uuid, user_id: Uuid) {
        self.tables
            .lock()
            .unwrap()
            .likes
            .push(Like { post_id, user_id });
    }

    pub fn comment_amount(&self, post_id: Uuid) -> i64 {
        self.tables
            .lock()
            .unwrap()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.comment_amount)
            .unwrap_or_default()
    }

    pub fn search_calls(&self) -> usize {
        *self.search_calls.lock().unwrap()
    }

    fn author(tables: &Tables, user_id: Uuid) -> Option<AuthorRef> {
        tables
            .profiles
            .iter()
            .find(|p| p.id == user_id)
            .map(|p| AuthorRef {
                id: Some(p.id),
                username: p.username.clone(),
            })
    }
}

#[async_trait]
impl SocialStore for InMemoryStore {
    async fn list_posts(&self, authors: PostAuthors) -> Result<Vec<PostRow>> {
        let tables = self.tables.lock().unwrap();
        let mut posts: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|p| match &authors {
                PostAuthors::All => true,
                PostAuthors::AnyOf(ids) => ids.contains(&p.user_id),
                PostAuthors::Only(id) => p.user_id == *id,
            })
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .map(|post| PostRow {
                post: post.clone(),
                profiles: Self::author(&tables, post.user_id),
                likes: tables
                    .likes
                    .iter()
                    .filter(|l| l.post_id == post.id)
                    .map(|l| LikeRef { user_id: l.user_id })
                    .collect(),
            })
            .collect())
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            created_at: Utc::now(),
            comment_amount: 0,
        };
        self.tables.lock().unwrap().posts.push(post.clone());
        Ok(post)
    }

    async fn set_comment_amount(&self, post_id: Uuid, amount: i64) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) {
            post.comment_amount = amount;
        }
        Ok(())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRow>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| CommentRow {
                comment: c.clone(),
                profiles: Self::author(&tables, c.user_id),
            })
            .collect())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().comments.push(comment.clone());
        Ok(comment)
    }

    async fn count_comments(&self, post_id: Uuid) -> Result<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.comments.iter().filter(|c| c.post_id == post_id).count() as i64)
    }

    async fn list_likes(&self, post_id: Uuid) -> Result<(Vec<Like>, i64)> {
        let tables = self.tables.lock().unwrap();
        let likes: Vec<Like> = tables
            .likes
            .iter()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .collect();
        let count = likes.len() as i64;
        Ok((likes, count))
    }

    async fn insert_like(&self, like: Like) -> Result<()> {
        self.tables.lock().unwrap().likes.push(like);
        Ok(())
    }

    async fn delete_like(&self, like: Like) -> Result<()> {
        self.tables.lock().unwrap().likes.retain(|l| *l != like);
        Ok(())
    }

    async fn followed_user_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .follows
            .iter()
            .filter(|f| f.follower_id == follower_id)
            .map(|f| f.user_id)
            .collect())
    }

    async fn follower_count(&self, user_id: Uuid) -> Result<i64> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.follows.iter().filter(|f| f.user_id == user_id).count() as i64)
    }

    async fn is_following(&self, edge: FollowEdge) -> Result<bool> {
        Ok(self.tables.lock().unwrap().follows.contains(&edge))
    }

    async fn insert_follow(&self, edge: FollowEdge) -> Result<()> {
        self.tables.lock().unwrap().follows.push(edge);
        Ok(())
    }

    async fn delete_follow(&self, edge: FollowEdge) -> Result<()> {
        self.tables.lock().unwrap().follows.retain(|f| *f != edge);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn search_profiles(&self, needle: &str, limit: usize) -> Result<Vec<Profile>> {
        *self.search_calls.lock().unwrap() += 1;

        let needle = needle.to_lowercase();
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .filter(|p| {
                p.username
                    .as_deref()
                    .map(|u| u.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
