//! Reddit integration for `NeighborNudge`.
//!
//! Two presentation-only capabilities: a read-only fetch of recent or
//! searched posts from the community subreddit (with a static sample
//! fallback when the network is unavailable), and a pure generator for
//! pre-filled cross-post submission links. Neither feeds back into the
//! task ledger.

pub mod crosspost;
pub mod feed;
pub mod sample;

pub use crosspost::submit_url;
pub use feed::{FeedClient, FeedError, RedditPost};
