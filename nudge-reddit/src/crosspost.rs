//! Pre-filled cross-post submission links for the community subreddit.
//!
//! Pure URL construction: maps a task's fields onto Reddit's submit page
//! query parameters. No network call, no effect on the task ledger.

use nudge_core::Task;
use url::Url;

/// Builds a pre-filled submission URL for cross-posting a task.
///
/// The title and body are templated from the task's fields and URL-encoded
/// into the subreddit's submit page.
///
/// # Errors
///
/// Returns [`url::ParseError`] if the subreddit name does not form a valid
/// URL path.
pub fn submit_url(subreddit: &str, task: &Task) -> Result<Url, url::ParseError> {
    let title = format!("[OFFER] {} - {}", task.description, task.location);
    let body = format!(
        "Hi r/{subreddit}!\n\n\
         I'm offering to help with: {description}\n\n\
         **Location:** {location}\n\
         **Posted by:** u/{proposer}\n\
         **Contact:** {contact}\n\n\
         This task was posted through NeighborNudge, a platform for community \
         mutual aid. If you're interested in helping or need similar \
         assistance, check out our app!",
        description = task.description,
        location = task.location,
        proposer = task.proposer,
        contact = task.contact_method,
    );

    Url::parse_with_params(
        &format!("https://www.reddit.com/r/{subreddit}/submit"),
        &[("title", title.as_str()), ("text", body.as_str())],
    )
}
