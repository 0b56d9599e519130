//! Interaction logic on top of `SocialStore`.

pub mod composer;
pub mod feed;
pub mod follow;
pub mod post_item;
pub mod search;
pub mod session;
pub mod timestamp;

pub use composer::{CommentComposer, CommentDraft, PostComposer, PostDraft};
pub use feed::{FeedLoader, FeedPost, FeedScope, SortMode};
pub use follow::{FollowController, FollowToggle, ProfileView};
pub use post_item::{CommentView, LikeState, PostItem};
pub use search::{ProfileHit, ProfileSearch, SearchOutcome, SearchRegistry};
pub use session::{AuthService, SessionContext, SignUp};
pub use timestamp::TimestampFormatter;
