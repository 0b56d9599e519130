//! Follow controller and profile view
//!
//! Follow state is never updated optimistically: every toggle writes the
//! edge and then re-reads follower count and status from the backend.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{FollowEdge, Profile};
use crate::error::{AppError, Result};
use crate::repository::SocialStore;
use crate::services::feed::{FeedLoader, FeedPost, FeedScope, SortMode};
use crate::services::TimestampFormatter;

/// Everything shown on a profile page
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile: Profile,
    pub website_link: Option<String>,
    pub follower_count: i64,
    pub posts: Vec<FeedPost>,
    /// `None` on the viewer's own profile, where no follow control exists
    pub following: Option<bool>,
    /// Set right after a follow toggle so the count can be emphasised
    pub highlight_follower_count: bool,
}

/// Result of a follow toggle whose write went through
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FollowToggle {
    /// Re-read after the write
    Refreshed(ProfileView),
    /// The re-read failed; only the new status is known
    Written { following: bool },
}

impl FollowToggle {
    pub fn following(&self) -> bool {
        match self {
            FollowToggle::Refreshed(view) => view.following.unwrap_or(false),
            FollowToggle::Written { following } => *following,
        }
    }

    pub fn into_view(self) -> Option<ProfileView> {
        match self {
            FollowToggle::Refreshed(view) => Some(view),
            FollowToggle::Written { .. } => None,
        }
    }
}

pub struct FollowController {
    store: Arc<dyn SocialStore>,
    formatter: TimestampFormatter,
    viewer: Uuid,
    target: Uuid,
    status: Option<bool>,
}

impl FollowController {
    pub fn new(
        store: Arc<dyn SocialStore>,
        formatter: TimestampFormatter,
        viewer: Uuid,
        target: Uuid,
    ) -> Self {
        Self {
            store,
            formatter,
            viewer,
            target,
            status: None,
        }
    }

    pub fn is_own_profile(&self) -> bool {
        self.viewer == self.target
    }

    fn edge(&self) -> FollowEdge {
        FollowEdge {
            follower_id: self.viewer,
            user_id: self.target,
        }
    }

    /// Load the target's profile, follower count, posts and follow status
    pub async fn refresh(&mut self) -> Result<ProfileView> {
        let profile = self
            .store
            .get_profile(self.target)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("profile {}", self.target)))?;

        let follower_count = self.store.follower_count(self.target).await.map_err(|e| {
            error!(target_id = %self.target, error = %e, "Error fetching follower count");
            e
        })?;

        self.status = if self.is_own_profile() {
            None
        } else {
            Some(self.store.is_following(self.edge()).await.map_err(|e| {
                error!(viewer = %self.viewer, target_id = %self.target, error = %e, "Error checking follow status");
                e
            })?)
        };

        let posts = FeedLoader::new(self.store.clone(), self.formatter, self.viewer)
            .load(FeedScope::Profile(self.target), SortMode::Recent)
            .await?;

        Ok(ProfileView {
            website_link: profile.website_link(),
            profile,
            follower_count,
            posts,
            following: self.status,
            highlight_follower_count: false,
        })
    }

    /// Follow or unfollow depending on the current status, then re-read.
    /// Only a failed write is an error.
    pub async fn toggle(&mut self) -> Result<FollowToggle> {
        if self.is_own_profile() {
            return Err(AppError::BadRequest("cannot follow yourself".to_string()));
        }

        let following = match self.status {
            Some(following) => following,
            None => self.store.is_following(self.edge()).await?,
        };

        let written = if following {
            self.store.delete_follow(self.edge()).await
        } else {
            self.store.insert_follow(self.edge()).await
        };
        written.map_err(|e| {
            error!(viewer = %self.viewer, target_id = %self.target, error = %e, "Error updating follow");
            e
        })?;
        self.status = Some(!following);
        info!(viewer = %self.viewer, target_id = %self.target, now_following = !following, "follow toggled");

        match self.refresh().await {
            Ok(mut view) => {
                view.highlight_follower_count = true;
                Ok(FollowToggle::Refreshed(view))
            }
            Err(e) => {
                warn!(viewer = %self.viewer, target_id = %self.target, error = %e, "profile not refreshed after follow toggle");
                Ok(FollowToggle::Written {
                    following: !following,
                })
            }
        }
    }
}
