//! study-journey: progress tracking for the Bible Study Journey curriculum
//!
//! - **catalog**: ordered curriculum modules, fetched remotely with a
//!   built-in fallback
//! - **progress**: completed-module set persisted to a key-value backend
//! - **gate**: which modules are unlocked
//! - **rank**: display rank and knowledge points
//! - **flow**: per-module lesson and assessment state machine
//! - **journey**: a learner session tying the above together

pub mod catalog;
pub mod config;
pub mod error;
pub mod flow;
pub mod gate;
pub mod journey;
pub mod progress;
pub mod rank;

pub use catalog::{load_catalog, Catalog, Module};
pub use config::Config;
pub use error::{JourneyError, Result};
pub use flow::{Answers, AssessmentOutcome, ModuleState};
pub use journey::{Journey, SubmissionReport};
pub use progress::{CompletionSet, ProgressBackend, ProgressStore};
pub use rank::{RankProjection, RankTable};
