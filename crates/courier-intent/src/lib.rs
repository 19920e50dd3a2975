//! Intent resolution: deterministic matching, prompting and parsing of
//! language model output into validated instructions.

pub mod error;
pub mod llm;
pub mod matcher;
pub mod ollama;
pub mod parse;
pub mod prompt;
pub mod resolver;

pub use error::{LlmError, ResolveError};
pub use llm::{DisabledClient, LanguageModelClient, ScriptedClient, TimeoutClient};
pub use matcher::{Candidate, DeterministicMatcher};
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
pub use resolver::IntentResolver;
