//! Read-only client for the community subreddit's public listing API.
//!
//! Fetches recent or searched posts from `r/<subreddit>` over the
//! unauthenticated JSON endpoints. When the upstream fetch fails, the
//! `*_or_sample` methods fall back to bundled sample posts so the feed
//! panel always has content to show.

use serde::{Deserialize, Serialize};

use crate::sample;

/// User agent sent with feed requests; Reddit rejects the default one.
const USER_AGENT: &str = concat!("neighbornudge/", env!("CARGO_PKG_VERSION"));

/// Default number of posts to fetch.
pub const DEFAULT_LIMIT: u32 = 25;

/// A post from the community subreddit feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    /// Reddit's post identifier.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Author username, without the `u/` prefix.
    pub author: String,
    /// Net upvote score.
    pub score: i64,
    /// Number of comments.
    pub num_comments: u64,
    /// Creation time in epoch seconds.
    pub created_utc: f64,
    /// Link target of the post.
    pub url: String,
    /// Self-text body; empty for link posts.
    #[serde(default)]
    pub selftext: String,
    /// Site-relative permalink.
    pub permalink: String,
    /// Subreddit the post belongs to.
    pub subreddit: String,
    /// Post flair, if any.
    #[serde(default)]
    pub flair_text: Option<String>,
}

/// Errors that can occur while fetching the feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The request failed or the response body could not be decoded.
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The listing endpoint returned a non-success status.
    #[error("feed returned status {0}")]
    Status(u16),
}

// ---------------------------------------------------------------------------
// Listing envelope (private): reddit wraps posts in kind/data layers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

/// Client for the community subreddit's public read API.
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    subreddit: String,
}

impl FeedClient {
    /// Creates a feed client for the given subreddit.
    #[must_use]
    pub fn new(subreddit: &str) -> Self {
        Self::with_base_url(subreddit, "https://www.reddit.com")
    }

    /// Creates a feed client with a custom base URL.
    ///
    /// Used by tests to point at an unreachable or local endpoint.
    #[must_use]
    pub fn with_base_url(subreddit: &str, base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            subreddit: subreddit.to_string(),
        }
    }

    /// Returns the subreddit this client reads from.
    #[must_use]
    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }

    /// Fetches the most recent posts from the subreddit.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the request fails, the endpoint returns a
    /// non-success status, or the listing payload cannot be decoded.
    pub async fn fetch_recent(&self, limit: u32) -> Result<Vec<RedditPost>, FeedError> {
        let url = format!("{}/r/{}/new.json", self.base_url, self.subreddit);
        let response = self
            .http
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        Self::decode_listing(response).await
    }

    /// Searches the subreddit's posts for a query string.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the request fails, the endpoint returns a
    /// non-success status, or the listing payload cannot be decoded.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<RedditPost>, FeedError> {
        let url = format!("{}/r/{}/search.json", self.base_url, self.subreddit);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("restrict_sr", "on"),
                ("sort", "new"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await?;
        Self::decode_listing(response).await
    }

    /// Recent posts, falling back to the bundled samples if the fetch fails.
    pub async fn recent_or_sample(&self, limit: u32) -> Vec<RedditPost> {
        match self.fetch_recent(limit).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(
                    subreddit = %self.subreddit,
                    error = %e,
                    "community feed fetch failed, serving sample posts"
                );
                truncated(sample::sample_posts(), limit)
            }
        }
    }

    /// Searched posts, falling back to filtered samples if the fetch fails.
    pub async fn search_or_sample(&self, query: &str, limit: u32) -> Vec<RedditPost> {
        match self.search(query, limit).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(
                    subreddit = %self.subreddit,
                    query = %query,
                    error = %e,
                    "community feed search failed, serving filtered sample posts"
                );
                truncated(sample::filter_posts(sample::sample_posts(), query), limit)
            }
        }
    }

    async fn decode_listing(response: reqwest::Response) -> Result<Vec<RedditPost>, FeedError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let listing: Listing = response.json().await?;
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .collect())
    }
}

fn truncated(mut posts: Vec<RedditPost>, limit: u32) -> Vec<RedditPost> {
    posts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    posts
}
