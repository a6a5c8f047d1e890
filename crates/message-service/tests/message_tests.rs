//! Message endpoint integration tests.
//!
//! Tests the `/v1/messages` endpoints using the `TestMessageServer`
//! harness over the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ms_test_utils::TestMessageServer;
use serde_json::{json, Value};

/// Test that creating a message returns the record with a derived
/// palindrome flag.
#[tokio::test]
async fn test_create_message_returns_record() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({
            "content": "A man, a plan, a canal, Panama!",
            "author": "William Shakespeare"
        }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body["id"], "1");
    assert_eq!(body["content"], "A man, a plan, a canal, Panama!");
    assert_eq!(body["author"], "William Shakespeare");
    assert_eq!(body["palindrome"], true);

    Ok(())
}

/// Test create-then-find round trip equality.
#[tokio::test]
async fn test_create_then_find_round_trip() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({
            "content": "To be, or not to be: that is the question",
            "createdAt": "1599-01-03T07:30:30.457Z"
        }))
        .send()
        .await?
        .json()
        .await?;

    let found: Value = client
        .get(format!("{}/v1/messages/{}", server.url(), created["id"].as_str().unwrap()))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(found, created);

    Ok(())
}

/// Test that create requires content.
#[tokio::test]
async fn test_create_without_content_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({ "author": "anonymous" }))
        .send()
        .await?;

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    Ok(())
}

/// Test that overlong content is rejected with a validation error.
#[tokio::test]
async fn test_create_with_overlong_content_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({ "content": "a".repeat(257) }))
        .send()
        .await?;

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("between 1 and 256 characters"));

    Ok(())
}

/// Test that an empty repository lists as an empty JSON array.
#[tokio::test]
async fn test_list_empty_repository() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/v1/messages", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body, json!([]));

    Ok(())
}

/// Test that list returns every created message.
#[tokio::test]
async fn test_list_returns_all_messages() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    for content in ["madam", "racecar"] {
        client
            .post(format!("{}/v1/messages", server.url()))
            .json(&json!({ "content": content }))
            .send()
            .await?;
    }

    let body: Value = client
        .get(format!("{}/v1/messages", server.url()))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body.as_array().unwrap().len(), 2);

    Ok(())
}

/// Test that an author-only update leaves content and palindrome
/// unchanged.
#[tokio::test]
async fn test_update_author_only_preserves_content() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({ "content": "racecar" }))
        .send()
        .await?
        .json()
        .await?;

    let updated: Value = client
        .put(format!("{}/v1/messages/{}", server.url(), created["id"].as_str().unwrap()))
        .json(&json!({ "author": "anonymous" }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(updated["content"], "racecar");
    assert_eq!(updated["palindrome"], true);
    assert_eq!(updated["author"], "anonymous");

    Ok(())
}

/// Test that updating content recomputes the palindrome flag.
#[tokio::test]
async fn test_update_content_flips_palindrome() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({ "content": "this is not a palindrome" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(created["palindrome"], false);

    let id = created["id"].as_str().unwrap();

    let updated: Value = client
        .put(format!("{}/v1/messages/{}", server.url(), id))
        .json(&json!({ "content": "Was it a car or a cat I saw?" }))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(updated["palindrome"], true);

    // The stored record reflects the new flag as well.
    let found: Value = client
        .get(format!("{}/v1/messages/{}", server.url(), id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(found["palindrome"], true);

    Ok(())
}

/// Test that updating content to an empty string clears the field.
#[tokio::test]
async fn test_update_with_empty_content_clears_field() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({ "content": "madam" }))
        .send()
        .await?
        .json()
        .await?;

    let response = client
        .put(format!("{}/v1/messages/{}", server.url(), created["id"].as_str().unwrap()))
        .json(&json!({ "content": "" }))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await?;
    // Cleared fields are omitted from output, not rendered as null.
    assert!(updated.get("content").is_none());

    Ok(())
}

/// Test that updating an unknown id returns 404.
#[tokio::test]
async fn test_update_unknown_id_returns_404() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{}/v1/messages/42", server.url()))
        .json(&json!({ "content": "madam" }))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await?;
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    Ok(())
}

/// Test that delete returns 204 and a subsequent find returns 404.
#[tokio::test]
async fn test_delete_then_find_returns_404() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{}/v1/messages", server.url()))
        .json(&json!({ "content": "madam" }))
        .send()
        .await?
        .json()
        .await?;

    let id = created["id"].as_str().unwrap();

    let response = client
        .delete(format!("{}/v1/messages/{}", server.url(), id))
        .send()
        .await?;
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/v1/messages/{}", server.url(), id))
        .send()
        .await?;
    assert_eq!(response.status(), 404);

    Ok(())
}

/// Test that deleting an unknown id returns 404.
#[tokio::test]
async fn test_delete_unknown_id_returns_404() -> Result<(), anyhow::Error> {
    let server = TestMessageServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .delete(format!("{}/v1/messages/42", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}
