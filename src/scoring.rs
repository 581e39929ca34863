//! Engagement-weighted importance scoring and result ordering.

use std::cmp::Ordering;

use crate::records::{ScoredTweet, TweetRecord};

/// Weighted engagement score with a flat +100 boost for relevant posts.
///
/// quoteCount and bookmarkCount are deliberately absent from the weights:
/// the upstream scheme omits them, and that omission is part of the
/// behavioral contract (see DESIGN.md before "fixing" it).
pub fn importance_score(record: &TweetRecord, is_tb: bool) -> f64 {
    0.4 * record.reply_count as f64
        + 0.3 * record.retweet_count as f64
        + 0.2 * record.like_count as f64
        + 0.1 * record.views as f64
        + if is_tb { 100.0 } else { 0.0 }
}

/// Orders results by importance score, highest first. `sort_by` is stable,
/// so rows with equal scores keep their input order.
pub fn sort_by_importance(results: &mut [ScoredTweet]) {
    results.sort_by(|a, b| {
        b.importance_score
            .partial_cmp(&a.importance_score)
            .unwrap_or(Ordering::Equal)
    });
}
