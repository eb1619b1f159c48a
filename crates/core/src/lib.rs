pub mod agent;
pub mod fast_path;
pub mod interpreter;
pub mod persona;
pub mod prompt;
pub mod types;

pub use agent::{Agent, AgentSettings};
pub use interpreter::interpret_completion;
pub use types::AgentEvent;
