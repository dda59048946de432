//! The MindcareAI companion core.
//!
//! Two independent components sit behind one application object:
//!
//! 1. **Conversation assembler**: persona + prior turns + new message become
//!    one request to the chat provider; the reply text comes back verbatim.
//! 2. **Mood log**: timestamped entries appended in memory and rendered
//!    most-recent-first.
//!
//! [`MindcareApp`] owns both for the lifetime of the process. When startup
//! cannot find a credential it runs in degraded mode and answers every call
//! with a fixed error string instead.

pub mod app;
pub mod assembler;
pub mod bootstrap;
pub mod mood;
pub mod persona;
pub mod resources;

#[cfg(test)]
mod test_helpers;

pub use app::{AppStatus, MindcareApp};
pub use assembler::{ChatReply, ConversationAssembler, assemble_messages};
pub use bootstrap::build_app;
pub use mood::{MoodEntry, MoodLabel, MoodLog, MoodSnapshot};
pub use resources::CrisisResource;
