//! POST /analyze — the whole pipeline in one handler.
//!
//! CSV upload in, scored JSON array out. The request succeeds or fails as
//! a unit; no partial results.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::records::{self, CsvError, ScoredTweet};
use crate::scoring;
use crate::server::error::ApiError;
use crate::server::state::SharedState;

pub async fn analyze(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let data = read_upload(multipart).await?;

    let records = records::read_records(&data).map_err(|e| match e {
        CsvError::MissingColumns(message) => ApiError::InvalidRequest(message),
        CsvError::Decode(err) => ApiError::Internal(err.into()),
    })?;

    // A missing text cell reaches the classifier as empty input and fails
    // there, taking the whole request with it.
    let texts: Vec<&str> = records
        .iter()
        .map(|r| r.tweet_text.as_deref().unwrap_or(""))
        .collect();
    let flags = state.model.predict_batch(&texts)?;

    let mut results: Vec<ScoredTweet> = records
        .into_iter()
        .zip(flags)
        .map(|(record, flags)| ScoredTweet::new(record, &flags))
        .collect();
    scoring::sort_by_importance(&mut results);

    let body = serde_json::to_string(&results)?;
    debug!("Response payload: {}", body);

    Ok((
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

/// Pulls the uploaded file out of the multipart body. Anything that keeps
/// us from reaching a field named `file` reads, to the caller, as a
/// missing file.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Bytes, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(no_file());
    };

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                return field.bytes().await.map_err(|_| no_file());
            }
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return Err(no_file()),
        }
    }
}

fn no_file() -> ApiError {
    ApiError::InvalidRequest("No file provided".to_string())
}
