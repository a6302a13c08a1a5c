use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Who wrote a message. The answer service calls the assistant `ai`, so that
/// is what goes over the wire and into the storage slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "ai")]
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sender::User => return write!(f, "user"),
            Sender::Assistant => return write!(f, "ai"),
        }
    }
}
