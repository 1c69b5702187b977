//! Module lesson flow
//!
//! Per-module state machine:
//!
//! ```text
//! NotStarted -> InProgress -> AwaitingAssessment -> Completed
//!                   ^                 |
//!                   +---- failed -----+
//! ```
//!
//! Failed assessments return the learner to the last lesson; retries are
//! unlimited.

pub mod assessment;
pub mod screen;

use serde::Serialize;
use tracing::debug;

use crate::catalog::Module;
use crate::error::{JourneyError, Result};

pub use assessment::{score, Answers, AssessmentOutcome};
pub use screen::{render, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModuleState {
    NotStarted,
    InProgress,
    AwaitingAssessment,
    Completed,
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleState::NotStarted => write!(f, "not started"),
            ModuleState::InProgress => write!(f, "in progress"),
            ModuleState::AwaitingAssessment => write!(f, "awaiting assessment"),
            ModuleState::Completed => write!(f, "completed"),
        }
    }
}

/// Where a learner is inside one module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleFlow {
    state: ModuleState,
    lesson: usize,
}

impl ModuleFlow {
    pub fn new() -> Self {
        Self {
            state: ModuleState::NotStarted,
            lesson: 0,
        }
    }

    pub fn completed() -> Self {
        Self {
            state: ModuleState::Completed,
            lesson: 0,
        }
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Index of the lesson being read
    pub fn lesson(&self) -> usize {
        self.lesson
    }

    /// Start the module. Reopening keeps the lesson cursor; completed
    /// modules stay completed and are opened for review.
    pub fn open(&mut self) {
        if self.state == ModuleState::NotStarted {
            self.state = ModuleState::InProgress;
            self.lesson = 0;
        }
    }

    /// Advance one lesson; past the last lesson the assessment opens.
    pub fn next_lesson(&mut self, module: &Module) -> Result<ModuleState> {
        match self.state {
            ModuleState::InProgress => {
                if self.lesson + 1 < module.lessons.len() {
                    self.lesson += 1;
                } else {
                    self.state = ModuleState::AwaitingAssessment;
                }
            }
            ModuleState::Completed => {
                if self.lesson + 1 < module.lessons.len() {
                    self.lesson += 1;
                }
            }
            state => return Err(invalid("advance", state)),
        }
        Ok(self.state)
    }

    pub fn previous_lesson(&mut self, module: &Module) -> Result<ModuleState> {
        match self.state {
            ModuleState::InProgress | ModuleState::Completed => {
                self.lesson = self.lesson.saturating_sub(1);
            }
            ModuleState::AwaitingAssessment => {
                self.state = ModuleState::InProgress;
                self.lesson = module.lessons.len().saturating_sub(1);
            }
            state => return Err(invalid("go back", state)),
        }
        Ok(self.state)
    }

    /// Skip to the assessment screen
    pub fn begin_assessment(&mut self) -> Result<()> {
        match self.state {
            ModuleState::InProgress | ModuleState::AwaitingAssessment => {
                self.state = ModuleState::AwaitingAssessment;
                Ok(())
            }
            state => Err(invalid("begin assessment", state)),
        }
    }

    /// Score a submission. Passing completes the module; failing returns to
    /// the last lesson so the assessment can be re-entered.
    pub fn submit(&mut self, module: &Module, answers: &Answers, threshold_percent: u8) -> Result<AssessmentOutcome> {
        if self.state != ModuleState::AwaitingAssessment {
            return Err(invalid("submit", self.state));
        }

        let outcome = score(&module.assessment, answers, threshold_percent)?;
        if outcome.passed {
            self.state = ModuleState::Completed;
            self.lesson = 0;
        } else {
            self.state = ModuleState::InProgress;
            self.lesson = module.lessons.len().saturating_sub(1);
        }

        debug!(
            module = %module.id,
            correct = outcome.correct,
            total = outcome.total,
            passed = outcome.passed,
            "Assessment scored"
        );
        Ok(outcome)
    }
}

impl Default for ModuleFlow {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(action: &'static str, state: ModuleState) -> JourneyError {
    JourneyError::InvalidTransition {
        action,
        state: state.to_string(),
    }
}
