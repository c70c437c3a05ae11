mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};

use crate::common::{json_body, send, test_router};

async fn post_keywords(payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/text/keywords")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = send(test_router(), request).await;
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn test_keyword_frequencies() {
    let (status, json) = post_keywords(json!({
        "text": "Bitcoin bitcoin BTC prix prix prix",
        "topN": 5
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["wordCount"], 6);
    assert_eq!(json["cleanedText"], "bitcoin bitcoin btc prix prix prix");

    let terms = json["topTerms"].as_array().unwrap();
    assert_eq!(terms.len(), 3);
    assert_eq!(terms[0]["term"], "prix");
    assert_eq!(terms[0]["count"], 3);
    assert_eq!(terms[0]["weight"], 1.0);
    assert_eq!(terms[1]["term"], "bitcoin");
    assert_eq!(terms[1]["count"], 2);
    assert_eq!(terms[2]["term"], "btc");

    assert_eq!(json["dominantTerms"], json!(["prix", "bitcoin", "btc"]));
    assert_eq!(json["stopwordsSource"], "embedded:french");
}

#[tokio::test]
async fn test_keywords_drop_stopwords_and_short_tokens() {
    let (status, json) = post_keywords(json!({
        "text": "Les marchés et les cryptos: le BTC à 100 000 $ !"
    }))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleanedText"], "marchés cryptos btc");
}

#[tokio::test]
async fn test_dominant_terms_capped_at_seven() {
    let text = "alpha beta gamma delta epsilon zeta theta iota kappa lambda";
    let (_, json) = post_keywords(json!({ "text": text, "topN": 30 })).await;
    assert_eq!(json["topTerms"].as_array().unwrap().len(), 10);
    assert_eq!(json["dominantTerms"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let (status, json) = post_keywords(json!({ "text": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "EMPTY_TEXT");
}
