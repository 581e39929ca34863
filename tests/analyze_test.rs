//! End-to-end tests for POST /analyze, driven through the router with a
//! keyword-matching stand-in for the ONNX classifier.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use symptomscan::{
    build_router, AppState, ClassifierError, SymptomFlags, SymptomModel, SYMPTOM_LABELS,
};

/// Flags a symptom whenever the text mentions its label. Rejects empty
/// text exactly like the real classifier.
struct KeywordModel;

impl SymptomModel for KeywordModel {
    fn predict_batch(&self, texts: &[&str]) -> Result<Vec<SymptomFlags>, ClassifierError> {
        texts
            .iter()
            .map(|text| {
                if text.is_empty() {
                    return Err(ClassifierError::ValidationError(
                        "Input text cannot be empty".into(),
                    ));
                }
                let mut bits = [false; SYMPTOM_LABELS.len()];
                for (bit, label) in bits.iter_mut().zip(SYMPTOM_LABELS) {
                    *bit = text.contains(label);
                }
                Ok(SymptomFlags::new(bits))
            })
            .collect()
    }
}

fn app() -> Router {
    build_router(AppState::new(Arc::new(KeywordModel)))
}

const BOUNDARY: &str = "X-SYMPTOMSCAN-TEST";

const HEADER_ROW: &str = "tweetText,tweetURL,tweetAuthor,handle,geo,createdAt,\
                          replyCount,quoteCount,retweetCount,likeCount,views,bookmarkCount";

fn multipart_body(field_name: &str, csv: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field_name}\"; filename=\"tweets.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

fn upload_request(field_name: &str, csv: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field_name, csv)))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn csv_with_rows(rows: &[&str]) -> String {
    let mut csv = String::from(HEADER_ROW);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv
}

#[tokio::test]
async fn analyze_scores_and_sorts_the_batch() {
    // Row A: relevant, reply=10, retweet=5, like=20, views=100 -> 119.5.
    // Row B: not relevant, all zero -> 0.0. Output order must be [A, B]
    // even though B comes first in the upload.
    let csv = csv_with_rows(&[
        "just a sunny day,https://x.com/b,Bob,@bob,Lagos,2024-01-02,0,0,0,0,0,0",
        "fever and fatigue today,https://x.com/a,Ann,@ann,,2024-01-01,10,7,5,20,100,3",
    ]);
    let (status, json) = send(upload_request("file", &csv)).await;

    assert_eq!(status, StatusCode::OK);
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first["tweetText"], "fever and fatigue today");
    assert_eq!(first["is_tb"], true);
    assert_eq!(
        first["detected_symptoms"],
        serde_json::json!(["fever", "fatigue"])
    );
    assert_eq!(first["importance_score"].as_f64().unwrap(), 119.5);
    // Unscored counters are still echoed back.
    assert_eq!(first["quoteCount"], 7);
    assert_eq!(first["bookmarkCount"], 3);
    // Empty geo cell comes back as null, not "".
    assert_eq!(first["geo"], Value::Null);

    let second = &results[1];
    assert_eq!(second["tweetText"], "just a sunny day");
    assert_eq!(second["is_tb"], false);
    assert_eq!(second["detected_symptoms"], serde_json::json!([]));
    assert_eq!(second["importance_score"].as_f64().unwrap(), 0.0);
    assert_eq!(second["geo"], "Lagos");
}

#[tokio::test]
async fn analyze_declares_utf8_json_content_type() {
    let csv = csv_with_rows(&["pain everywhere,u,a,h,,2024-01-01,1,0,1,1,10,0"]);
    let response = app().oneshot(upload_request("file", &csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
}

#[tokio::test]
async fn quote_and_bookmark_counts_do_not_affect_ordering() {
    // Identical scored engagement; huge quote/bookmark numbers on the
    // second row must not reorder anything (stable tie).
    let csv = csv_with_rows(&[
        "morning run,u,a,h,,2024-01-01,2,0,1,3,40,0",
        "evening walk,u,b,h,,2024-01-02,2,99999,1,3,40,99999",
    ]);
    let (status, json) = send(upload_request("file", &csv)).await;

    assert_eq!(status, StatusCode::OK);
    let results = json.as_array().unwrap();
    assert_eq!(results[0]["tweetText"], "morning run");
    assert_eq!(results[1]["tweetText"], "evening walk");
    assert_eq!(
        results[0]["importance_score"].as_f64().unwrap(),
        results[1]["importance_score"].as_f64().unwrap()
    );
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let csv = csv_with_rows(&[]);
    let (status, json) = send(upload_request("attachment", &csv)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({ "error": "No file provided" }));
}

#[tokio::test]
async fn non_multipart_request_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, serde_json::json!({ "error": "No file provided" }));
}

#[tokio::test]
async fn missing_column_is_rejected_with_the_full_column_list() {
    // geo column dropped
    let csv = "tweetText,tweetURL,tweetAuthor,handle,createdAt,\
               replyCount,quoteCount,retweetCount,likeCount,views,bookmarkCount\n\
               hello,u,a,h,2024-01-01,0,0,0,0,0,0";
    let (status, json) = send(upload_request("file", csv)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("CSV file must contain the following columns:"));
    for column in [
        "tweetText",
        "tweetURL",
        "geo",
        "views",
        "bookmarkCount",
    ] {
        assert!(message.contains(column), "message should list {column}");
    }
}

#[tokio::test]
async fn headers_only_csv_yields_an_empty_array() {
    let (status, json) = send(upload_request("file", &csv_with_rows(&[]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn unparseable_counter_cell_is_an_opaque_internal_error() {
    let csv = csv_with_rows(&["hello,u,a,h,,2024-01-01,not-a-number,0,0,0,0,0"]);
    let (status, json) = send(upload_request("file", &csv)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn empty_text_cell_fails_the_whole_request() {
    let csv = csv_with_rows(&[
        "fever spike,u,a,h,,2024-01-01,1,0,1,1,10,0",
        ",u,b,h,,2024-01-02,0,0,0,0,0,0",
    ]);
    let (status, json) = send(upload_request("file", &csv)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, serde_json::json!({ "error": "Internal server error" }));
}
