mod action;
mod answer;
mod event;
mod identity;
mod loading;
mod message;
mod sender;
mod slash_commands;
mod speech;
mod storage;
mod textarea;

pub use action::*;
pub use answer::*;
pub use event::*;
pub use identity::*;
pub use loading::*;
pub use message::*;
pub use sender::*;
pub use slash_commands::*;
pub use speech::*;
pub use storage::*;
pub use textarea::*;
