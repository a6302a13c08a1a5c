use anyhow::Result;
use mockito::Matcher;
use serde_json::json;

use super::TracWiseApi;
use crate::domain::models::AnswerProvider;
use crate::domain::models::AnswerRequest;
use crate::domain::models::Message;
use crate::domain::models::Sender;

impl TracWiseApi {
    fn with_url(url: String) -> TracWiseApi {
        return TracWiseApi {
            url,
            timeout: "200".to_string(),
        };
    }
}

fn request() -> AnswerRequest {
    let transcript = vec![
        Message::new("1", Sender::Assistant, "Hello!"),
        Message::new("2", Sender::User, "Is diesel ok in winter?"),
        Message::new("3", Sender::Assistant, "Use winter grade diesel."),
    ];

    return AnswerRequest::new("How do I change the oil?", "General", &transcript);
}

#[tokio::test]
async fn it_successfully_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/qa/")
        .with_status(405)
        .create_async()
        .await;

    let api = TracWiseApi::with_url(format!("{}/api/qa/", server.url()));
    let res = api.health_check().await;

    assert!(res.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/qa/")
        .with_status(503)
        .create_async()
        .await;

    let api = TracWiseApi::with_url(format!("{}/api/qa/", server.url()));
    let res = api.health_check().await;

    assert!(res.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn it_fails_health_checks_without_url() {
    let api = TracWiseApi::with_url("".to_string());
    let err = api.health_check().await.unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"TracWise answer URL is not defined");
}

#[tokio::test]
async fn it_gets_answers() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/qa/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "question": "How do I change the oil?",
            "model": "General",
            "conversation_history": [
                { "text": "Is diesel ok in winter?", "sender": "user" },
                { "text": "Use winter grade diesel.", "sender": "ai" },
            ],
        })))
        .with_status(200)
        .with_body(json!({ "answer": "Check the manual, section 4." }).to_string())
        .create_async()
        .await;

    let api = TracWiseApi::with_url(format!("{}/api/qa/", server.url()));
    let answer = api.ask(&request()).await?;

    mock.assert_async().await;
    assert_eq!(answer, "Check the manual, section 4.");

    return Ok(());
}

#[tokio::test]
async fn it_fails_on_error_status() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/qa/")
        .with_status(500)
        .with_body(json!({ "answer": "ignored" }).to_string())
        .create_async()
        .await;

    let api = TracWiseApi::with_url(format!("{}/api/qa/", server.url()));
    let err = api.ask(&request()).await.unwrap_err();

    mock.assert_async().await;
    insta::assert_snapshot!(err.to_string(), @"Failed to make question request to TracWise");
}

#[tokio::test]
async fn it_fails_on_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/qa/")
        .with_status(200)
        .with_body(json!({ "response": "wrong field" }).to_string())
        .create_async()
        .await;

    let api = TracWiseApi::with_url(format!("{}/api/qa/", server.url()));
    let res = api.ask(&request()).await;

    mock.assert_async().await;
    assert!(res.is_err());
}

#[tokio::test]
async fn it_fails_when_unreachable() {
    let api = TracWiseApi::with_url("http://127.0.0.1:1/api/qa/".to_string());
    let res = api.ask(&request()).await;

    assert!(res.is_err());
}
