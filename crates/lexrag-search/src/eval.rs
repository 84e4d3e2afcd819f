//! Accuracy over a gold question set.
//!
//! Questions are JSON Lines: `{"question": "...", "gold_phrases": ["..."]}`.
//! A question counts as answered when any gold phrase appears in the answer
//! text, ignoring case.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::answer::AnswerGenerator;
use crate::retriever::Retriever;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub gold_phrases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub question: Question,
    pub answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub outcomes: Vec<QuestionOutcome>,
}

impl EvalReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn correct(&self) -> usize {
        self.outcomes.iter().filter(|o| o.correct).count()
    }

    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.correct() as f64 / self.total() as f64
        }
    }
}

pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions from {}", path.display()))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("{}:{}: invalid question record", path.display(), n + 1))
        })
        .collect()
}

pub fn evaluate(
    retriever: &Retriever,
    generator: &AnswerGenerator,
    questions: &[Question],
) -> EvalReport {
    let outcomes: Vec<QuestionOutcome> = questions
        .iter()
        .map(|q| {
            let answer = match retriever.retrieve(&q.question).into_results() {
                Some(results) => generator.generate(&q.question, &results),
                None => String::new(),
            };
            let lowered = answer.to_lowercase();
            let correct = q.gold_phrases.iter().any(|p| lowered.contains(&p.to_lowercase()));
            QuestionOutcome { question: q.clone(), answer, correct }
        })
        .collect();
    let report = EvalReport { outcomes };
    info!("Evaluated {} questions: {} correct", report.total(), report.correct());
    report
}
