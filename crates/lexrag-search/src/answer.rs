use lexrag_core::config::{AnswerConfig, AnswerMode};
use lexrag_core::types::RetrievalResult;

pub const NO_ANSWER: &str = "No answer (relevance below threshold).";

const SUMMARY_FOOTER: &str = "Answer composed strictly from retrieved fragments.";

/// How many top hits feed the answer text.
const ANSWER_CONTEXT: usize = 3;

/// Builds display text from retrieved chunks without inventing content.
#[derive(Debug, Clone)]
pub struct AnswerGenerator {
    mode: AnswerMode,
    model_name: String,
}

impl AnswerGenerator {
    pub fn new(config: &AnswerConfig) -> Self {
        Self { mode: config.mode, model_name: config.model_name.clone() }
    }

    pub fn generate(&self, _query: &str, results: &[RetrievalResult]) -> String {
        if results.is_empty() {
            return NO_ANSWER.to_string();
        }
        let top = &results[..results.len().min(ANSWER_CONTEXT)];
        match self.mode {
            AnswerMode::Extractive => {
                let lines: Vec<String> =
                    top.iter().map(|r| format!("- {}: {}", r.citation, r.chunk.text)).collect();
                format!("Found fragments:\n{}", lines.join("\n"))
            }
            AnswerMode::Summary => {
                let joined =
                    top.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join(" ");
                format!(
                    "Summary for query (model={}):\n{}\n\n{}",
                    self.model_name, joined, SUMMARY_FOOTER
                )
            }
        }
    }
}
