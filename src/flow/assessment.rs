//! Assessment scoring

use serde::Serialize;

use crate::catalog::Assessment;
use crate::error::{JourneyError, Result};

/// What the learner submitted on an assessment screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answers {
    /// One chosen option index per question, in question order
    Quiz(Vec<usize>),
    /// One flag per checklist item
    Checklist(Vec<bool>),
    /// Confirmation for generic modules
    Acknowledge,
}

impl Answers {
    fn kind(&self) -> &'static str {
        match self {
            Answers::Quiz(_) => "quiz answers",
            Answers::Checklist(_) => "checklist flags",
            Answers::Acknowledge => "an acknowledgement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssessmentOutcome {
    pub passed: bool,
    pub correct: usize,
    pub total: usize,
    pub percent: u8,
}

/// Score `answers` against `assessment`.
///
/// A quiz passes when at least `threshold_percent` of its questions are
/// right; an empty quiz passes. A checklist needs every item acknowledged.
pub fn score(assessment: &Assessment, answers: &Answers, threshold_percent: u8) -> Result<AssessmentOutcome> {
    let (correct, total, passed) = match (assessment, answers) {
        (Assessment::Quiz { questions }, Answers::Quiz(chosen)) => {
            if chosen.len() != questions.len() {
                return Err(JourneyError::InvalidAnswers(format!(
                    "expected {} answers, got {}",
                    questions.len(),
                    chosen.len()
                )));
            }
            let mut correct = 0;
            for (n, (q, &c)) in questions.iter().zip(chosen).enumerate() {
                if c >= q.options.len() {
                    return Err(JourneyError::InvalidAnswers(format!(
                        "question {} has {} options, got choice {}",
                        n + 1,
                        q.options.len(),
                        c
                    )));
                }
                if c == q.answer {
                    correct += 1;
                }
            }
            let total = questions.len();
            let passed = correct * 100 >= threshold_percent as usize * total;
            (correct, total, passed)
        }
        (Assessment::Checklist { items }, Answers::Checklist(flags)) => {
            if flags.len() != items.len() {
                return Err(JourneyError::InvalidAnswers(format!(
                    "expected {} checklist flags, got {}",
                    items.len(),
                    flags.len()
                )));
            }
            let acknowledged = flags.iter().filter(|&&f| f).count();
            (acknowledged, items.len(), acknowledged == items.len())
        }
        (Assessment::Acknowledge, Answers::Acknowledge) => (1, 1, true),
        (assessment, answers) => {
            return Err(JourneyError::InvalidAnswers(format!(
                "{} do not fit a {} assessment",
                answers.kind(),
                match assessment {
                    Assessment::Quiz { .. } => "quiz",
                    Assessment::Checklist { .. } => "checklist",
                    Assessment::Acknowledge => "generic",
                }
            )));
        }
    };

    let percent = if total == 0 { 100 } else { (correct * 100 / total) as u8 };

    Ok(AssessmentOutcome {
        passed,
        correct,
        total,
        percent,
    })
}
