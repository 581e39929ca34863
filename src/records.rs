//! The CSV boundary: typed rows in, scored records out.
//!
//! Uploaded CSVs are decoded into [`TweetRecord`] at the validation
//! boundary. Header validation is a client error with an actionable
//! message; a cell that cannot be decoded to its expected type is an
//! internal error, and the whole request fails with it.

use serde::{Deserialize, Serialize};

use crate::classifier::SymptomFlags;
use crate::scoring;

/// Columns an uploaded CSV must carry. Extra columns are ignored; order
/// is irrelevant.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "tweetText",
    "tweetURL",
    "tweetAuthor",
    "handle",
    "geo",
    "createdAt",
    "replyCount",
    "quoteCount",
    "retweetCount",
    "likeCount",
    "views",
    "bookmarkCount",
];

/// The 400 message for a header missing any required column. Always lists
/// the full required set.
pub fn required_columns_message() -> String {
    format!(
        "CSV file must contain the following columns: {:?}",
        REQUIRED_COLUMNS
    )
}

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    /// Header is missing at least one required column. Client error.
    #[error("{0}")]
    MissingColumns(String),
    /// A row failed to decode. Internal error.
    #[error(transparent)]
    Decode(#[from] csv::Error),
}

/// One row of the uploaded table. Text-like cells decode to `None` when
/// empty so they serialize as JSON `null`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetRecord {
    #[serde(rename = "tweetText")]
    pub tweet_text: Option<String>,
    #[serde(rename = "tweetURL")]
    pub tweet_url: Option<String>,
    #[serde(rename = "tweetAuthor")]
    pub tweet_author: Option<String>,
    pub handle: Option<String>,
    pub geo: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "replyCount")]
    pub reply_count: i64,
    #[serde(rename = "quoteCount")]
    pub quote_count: i64,
    #[serde(rename = "retweetCount")]
    pub retweet_count: i64,
    #[serde(rename = "likeCount")]
    pub like_count: i64,
    pub views: i64,
    #[serde(rename = "bookmarkCount")]
    pub bookmark_count: i64,
}

/// A scored output record: every input field plus the detection results.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredTweet {
    #[serde(flatten)]
    pub record: TweetRecord,
    pub is_tb: bool,
    pub detected_symptoms: Vec<String>,
    pub importance_score: f64,
}

impl ScoredTweet {
    pub fn new(mut record: TweetRecord, flags: &SymptomFlags) -> Self {
        let detected_symptoms = flags.detected();
        let is_tb = !detected_symptoms.is_empty();
        let importance_score = scoring::importance_score(&record, is_tb);
        record.geo = normalize_geo(record.geo);
        Self {
            record,
            is_tb,
            detected_symptoms,
            importance_score,
        }
    }
}

/// Falsy geo values (empty, missing, zero) become null; anything else
/// passes through verbatim.
fn normalize_geo(geo: Option<String>) -> Option<String> {
    match geo {
        Some(g) if g.is_empty() || g == "0" || g == "0.0" => None,
        other => other,
    }
}

/// Parses uploaded CSV bytes into typed rows after validating the header.
pub fn read_records(data: &[u8]) -> Result<Vec<TweetRecord>, CsvError> {
    let mut reader = csv::Reader::from_reader(data);

    let all_present = {
        let headers = reader.headers()?;
        REQUIRED_COLUMNS
            .iter()
            .all(|column| headers.iter().any(|h| h == *column))
    };
    if !all_present {
        return Err(CsvError::MissingColumns(required_columns_message()));
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
