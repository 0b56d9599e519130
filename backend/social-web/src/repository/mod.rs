//! Remote table access.
//!
//! `SocialStore` is the seam between the interaction logic in `services`
//! and the hosted backend. `SupabaseStore` implements it with one
//! repository per table, all bound to the caller's session.

mod comments;
mod follows;
mod likes;
mod posts;
mod profiles;

pub use comments::CommentRepository;
pub use follows::FollowRepository;
pub use likes::LikeRepository;
pub use posts::PostRepository;
pub use profiles::ProfileRepository;

use async_trait::async_trait;
use supabase_rest::SupabaseClient;
use uuid::Uuid;

use crate::domain::{Comment, CommentRow, FollowEdge, Like, NewComment, NewPost, Post, PostRow, Profile};
use crate::error::Result;

/// Which authors a post listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAuthors {
    All,
    AnyOf(Vec<Uuid>),
    Only(Uuid),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Posts newest first, author name and like edges joined
    async fn list_posts(&self, authors: PostAuthors) -> Result<Vec<PostRow>>;
    async fn insert_post(&self, post: NewPost) -> Result<Post>;
    async fn set_comment_amount(&self, post_id: Uuid, amount: i64) -> Result<()>;

    /// All comments of a post, author joined
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRow>>;
    async fn insert_comment(&self, comment: NewComment) -> Result<Comment>;
    async fn count_comments(&self, post_id: Uuid) -> Result<i64>;

    /// Like edges of a post and their exact count
    async fn list_likes(&self, post_id: Uuid) -> Result<(Vec<Like>, i64)>;
    async fn insert_like(&self, like: Like) -> Result<()>;
    async fn delete_like(&self, like: Like) -> Result<()>;

    /// Ids of the users `follower_id` follows
    async fn followed_user_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>>;
    async fn follower_count(&self, user_id: Uuid) -> Result<i64>;
    async fn is_following(&self, edge: FollowEdge) -> Result<bool>;
    async fn insert_follow(&self, edge: FollowEdge) -> Result<()>;
    async fn delete_follow(&self, edge: FollowEdge) -> Result<()>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;
    /// Case-insensitive substring match on the display name
    async fn search_profiles(&self, needle: &str, limit: usize) -> Result<Vec<Profile>>;
}

/// `SocialStore` over the hosted table API
#[derive(Clone)]
pub struct SupabaseStore {
    posts: PostRepository,
    comments: CommentRepository,
    likes: LikeRepository,
    follows: FollowRepository,
    profiles: ProfileRepository,
}

impl SupabaseStore {
    /// `client` should already carry the session's access token so that
    /// row-level policies see the right user.
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            posts: PostRepository::new(client.clone()),
            comments: CommentRepository::new(client.clone()),
            likes: LikeRepository::new(client.clone()),
            follows: FollowRepository::new(client.clone()),
            profiles: ProfileRepository::new(client),
        }
    }
}

#[async_trait]
impl SocialStore for SupabaseStore {
    async fn list_posts(&self, authors: PostAuthors) -> Result<Vec<PostRow>> {
        self.posts.list_posts(&authors).await
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        self.posts.create_post(&post).await
    }

    async fn set_comment_amount(&self, post_id: Uuid, amount: i64) -> Result<()> {
        self.posts.set_comment_amount(post_id, amount).await
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRow>> {
        self.comments.get_post_comments(post_id).await
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment> {
        self.comments.create_comment(&comment).await
    }

    async fn count_comments(&self, post_id: Uuid) -> Result<i64> {
        self.comments.count_post_comments(post_id).await
    }

    async fn list_likes(&self, post_id: Uuid) -> Result<(Vec<Like>, i64)> {
        self.likes.get_post_likes(post_id).await
    }

    async fn insert_like(&self, like: Like) -> Result<()> {
        self.likes.create_like(&like).await
    }

    async fn delete_like(&self, like: Like) -> Result<()> {
        self.likes.delete_like(like.post_id, like.user_id).await
    }

    async fn followed_user_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        self.follows.get_following_ids(follower_id).await
    }

    async fn follower_count(&self, user_id: Uuid) -> Result<i64> {
        self.follows.get_follower_count(user_id).await
    }

    async fn is_following(&self, edge: FollowEdge) -> Result<bool> {
        self.follows.is_following(&edge).await
    }

    async fn insert_follow(&self, edge: FollowEdge) -> Result<()> {
        self.follows.create_follow(&edge).await
    }

    async fn delete_follow(&self, edge: FollowEdge) -> Result<()> {
        self.follows.delete_follow(&edge).await
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.profiles.get_profile(user_id).await
    }

    async fn search_profiles(&self, needle: &str, limit: usize) -> Result<Vec<Profile>> {
        self.profiles.search_by_username(needle, limit).await
    }
}
