use super::AnswerRequest;
use super::AnswerResponse;
use crate::domain::models::Message;
use crate::domain::models::Sender;

fn transcript() -> Vec<Message> {
    return vec![
        Message::new("1", Sender::Assistant, "Hello! I'm TracWise."),
        Message::new("2", Sender::User, "How do I check tyre pressure?"),
        Message::new("3", Sender::Assistant, "Use a low pressure gauge."),
    ];
}

#[test]
fn it_skips_the_greeting() {
    let req = AnswerRequest::new("And the fronts?", "General", &transcript());

    assert_eq!(req.question, "And the fronts?");
    assert_eq!(req.model, "General");
    assert_eq!(req.conversation_history.len(), 2);
    assert_eq!(
        req.conversation_history[0].text,
        "How do I check tyre pressure?"
    );
    assert_eq!(req.conversation_history[1].sender, Sender::Assistant);
}

#[test]
fn it_sends_empty_history_for_a_fresh_session() {
    let req = AnswerRequest::new("Hi", "General", &transcript()[..1]);
    assert!(req.conversation_history.is_empty());

    let req = AnswerRequest::new("Hi", "General", &[]);
    assert!(req.conversation_history.is_empty());
}

#[test]
fn it_serializes_the_wire_shape() -> anyhow::Result<()> {
    let req = AnswerRequest::new("Hi", "General", &transcript());
    let value = serde_json::to_value(&req)?;

    assert_eq!(value["question"], "Hi");
    assert_eq!(value["model"], "General");
    let history = value["conversation_history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["sender"], "user");
    assert_eq!(history[1]["sender"], "ai");
    assert!(history[0]["timestamp"].is_string());

    return Ok(());
}

#[test]
fn it_rejects_responses_without_answer() {
    let res = serde_json::from_str::<AnswerResponse>(r#"{"detail": "not found"}"#);
    assert!(res.is_err());

    let res = serde_json::from_str::<AnswerResponse>(r#"{"answer": "Check the manual.", "sources": []}"#);
    assert_eq!(res.unwrap().answer, "Check the manual.");
}
