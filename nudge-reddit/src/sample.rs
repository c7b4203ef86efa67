//! Bundled sample posts for the feed fallback.
//!
//! Shown when the subreddit listing cannot be fetched, so the community
//! panel is never blank. Timestamps are generated relative to now to keep
//! the posts looking recent.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::feed::RedditPost;

/// Returns the static demonstration posts for the community panel.
#[must_use]
pub fn sample_posts() -> Vec<RedditPost> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();

    vec![
        RedditPost {
            id: "sample1".to_string(),
            title: "Welcome to the NeighborNudge community!".to_string(),
            author: "community_mod".to_string(),
            score: 25,
            num_comments: 8,
            created_utc: now - 3600.0,
            url: "https://reddit.com/r/NeighborNudge".to_string(),
            selftext: "Welcome to our mutual aid community! This is where neighbors help \
                       neighbors. Share your offers to help, find ways to contribute, and \
                       build stronger community connections."
                .to_string(),
            permalink: "/r/NeighborNudge/comments/sample1/".to_string(),
            subreddit: "NeighborNudge".to_string(),
            flair_text: Some("Welcome".to_string()),
        },
        RedditPost {
            id: "sample2".to_string(),
            title: "How to get started with mutual aid".to_string(),
            author: "helpful_neighbor".to_string(),
            score: 18,
            num_comments: 5,
            created_utc: now - 7200.0,
            url: "https://reddit.com/r/NeighborNudge".to_string(),
            selftext: "New to mutual aid? Start small, be consistent, focus on your \
                       immediate community, and remember that every act of kindness \
                       matters."
                .to_string(),
            permalink: "/r/NeighborNudge/comments/sample2/".to_string(),
            subreddit: "NeighborNudge".to_string(),
            flair_text: Some("Guide".to_string()),
        },
        RedditPost {
            id: "sample3".to_string(),
            title: "[OFFER] Free tutoring for kids in math and science".to_string(),
            author: "science_teacher".to_string(),
            score: 12,
            num_comments: 3,
            created_utc: now - 10800.0,
            url: "https://reddit.com/r/NeighborNudge".to_string(),
            selftext: "I'm a retired science teacher offering free tutoring for elementary \
                       and middle school students. Available weekends in the downtown area."
                .to_string(),
            permalink: "/r/NeighborNudge/comments/sample3/".to_string(),
            subreddit: "NeighborNudge".to_string(),
            flair_text: Some("Offer".to_string()),
        },
        RedditPost {
            id: "sample4".to_string(),
            title: "[REQUEST] Need help moving furniture this weekend".to_string(),
            author: "moving_neighbor".to_string(),
            score: 8,
            num_comments: 6,
            created_utc: now - 14400.0,
            url: "https://reddit.com/r/NeighborNudge".to_string(),
            selftext: "Moving to a new apartment this Saturday and could use some help with \
                       heavy furniture. Pizza and drinks provided!"
                .to_string(),
            permalink: "/r/NeighborNudge/comments/sample4/".to_string(),
            subreddit: "NeighborNudge".to_string(),
            flair_text: Some("Request".to_string()),
        },
        RedditPost {
            id: "sample5".to_string(),
            title: "Community garden project update".to_string(),
            author: "green_thumb".to_string(),
            score: 15,
            num_comments: 4,
            created_utc: now - 18000.0,
            url: "https://reddit.com/r/NeighborNudge".to_string(),
            selftext: "Our community garden is thriving! Thanks to everyone who has \
                       contributed time, tools, and expertise. Next workday is this Sunday."
                .to_string(),
            permalink: "/r/NeighborNudge/comments/sample5/".to_string(),
            subreddit: "NeighborNudge".to_string(),
            flair_text: Some("Update".to_string()),
        },
    ]
}

/// Case-insensitive title/body filter used for the search fallback.
#[must_use]
pub fn filter_posts(posts: Vec<RedditPost>, query: &str) -> Vec<RedditPost> {
    let query = query.to_lowercase();
    posts
        .into_iter()
        .filter(|post| {
            post.title.to_lowercase().contains(&query)
                || post.selftext.to_lowercase().contains(&query)
        })
        .collect()
}
