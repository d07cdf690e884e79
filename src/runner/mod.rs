mod executor;
mod orchestrator;
mod retry;
mod sections;

pub use executor::{SectionFailure, SectionOutcome, TaskBudget, TaskExecutor};
pub use orchestrator::Orchestrator;
