//! Agent orchestration: the reasoning loop, the response parser, the
//! five pattern strategies, and the factory that builds them.

pub mod engine;
pub mod factory;
pub mod parser;
pub mod patterns;

pub use engine::{PromptTemplate, ReasoningLoop};
pub use factory::{build_strategy, Collaborators, SessionAgent};
pub use parser::{parse_response, Parsed};
pub use patterns::Strategy;
