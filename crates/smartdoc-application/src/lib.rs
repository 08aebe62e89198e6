pub mod interview;
pub mod reflection;
pub mod restore;

pub use interview::{AppliedChatTurn, apply_chat_response};
pub use restore::{ReplaySink, RestorationSummary, SessionSnapshot, restore_session};
