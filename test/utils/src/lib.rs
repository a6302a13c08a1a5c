/// A persisted transcript as it lands in the storage slot after one
/// exchange with the assistant.
pub fn transcript_fixture() -> &'static str {
    return r#"
[
  {
    "id": "1700000000000",
    "text": "Hello! I'm TracWise, your AI assistant for tractor operations. Ask me anything about maintenance, troubleshooting, or operation procedures.",
    "sender": "ai",
    "timestamp": "2023-11-14T22:13:20Z"
  },
  {
    "id": "1700000005000",
    "text": "How often should I grease the front axle?",
    "sender": "user",
    "timestamp": "2023-11-14T22:13:25Z"
  },
  {
    "id": "1700000009000",
    "text": "Grease the **front axle pivot** every 10 operating hours.\n\n- Clean the fitting first\n- Pump until fresh grease shows",
    "sender": "ai",
    "timestamp": "2023-11-14T22:13:29Z"
  }
]
"#
    .trim();
}
