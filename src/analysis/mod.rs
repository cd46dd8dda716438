//! Natural-language verdicts for a market snapshot.

pub mod gemini;
pub mod prompt;
pub mod verdict;

pub use gemini::{BackendError, GeminiClient, VerdictBackend};
pub use prompt::build_prompt;
pub use verdict::{local_verdict, Verdict, VerdictService, VerdictSource};
