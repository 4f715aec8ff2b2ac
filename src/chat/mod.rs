pub mod gemini;
pub mod interface;

pub use interface::{ChatModel, ChatReply, ChatSession, ChatTurn, Role, TurnPart};
