// Resume analysis: request building, the LLM-backed requester, role
// catalogue and the printable report.
// All LLM calls go through llm_client, never directly from here.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod report;
pub mod requester;
pub mod roles;

pub use models::{AnalysisRequest, AnalysisResult, ExperienceLevel};
pub use requester::{AnalysisError, AnalysisRequester, LlmAnalysisRequester};
