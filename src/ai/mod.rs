mod demo;
mod drafter;

pub use demo::{generate_summary, SummaryHistory};
pub use drafter::{DraftRequest, Drafter, GeneratedContent};
