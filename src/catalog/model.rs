//! Curriculum data model
//!
//! These are the normalized shapes the rest of the crate works with.
//! Remote payloads are mapped into them in `remote::normalize`.

use serde::{Deserialize, Serialize};

/// A unit of curriculum: ordered lessons and a terminal assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Stable string code
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Advertised lesson count; may differ from `lessons.len()` when the
    /// server only ships a preview of the lessons
    pub lessons_count: u32,

    /// Knowledge points awarded on completion
    pub points_value: u32,

    pub lessons: Vec<Lesson>,

    /// Catalog indices that must be complete before this module unlocks
    pub prerequisites: Vec<usize>,

    pub flow: FlowKind,

    pub assessment: Assessment,
}

/// A single lesson owned by one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub focus: String,
    pub summary: String,
    pub scripture: String,
    pub content: String,
}

/// Which lesson-flow presentation a module uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Lessons followed by a scored quiz
    Quiz,
    /// Lessons followed by a checklist that must be fully acknowledged
    Checklist,
    /// Lessons followed by a single confirmation
    #[default]
    Generic,
}

impl FlowKind {
    /// Map a remote `componentKey` to a flow. Unknown keys are generic.
    pub fn from_component_key(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("quiz") => FlowKind::Quiz,
            Some("checklist") => FlowKind::Checklist,
            _ => FlowKind::Generic,
        }
    }
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowKind::Quiz => write!(f, "quiz"),
            FlowKind::Checklist => write!(f, "checklist"),
            FlowKind::Generic => write!(f, "generic"),
        }
    }
}

/// The terminal screen of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Assessment {
    Quiz { questions: Vec<QuizQuestion> },
    Checklist { items: Vec<String> },
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub answer: usize,
}

impl Assessment {
    /// Number of items the learner has to answer or acknowledge
    pub fn item_count(&self) -> usize {
        match self {
            Assessment::Quiz { questions } => questions.len(),
            Assessment::Checklist { items } => items.len(),
            Assessment::Acknowledge => 1,
        }
    }
}

/// Where a catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Remote,
    Builtin,
}

/// The ordered collection of modules for a session
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    modules: Vec<Module>,
    origin: CatalogOrigin,
}

impl Catalog {
    pub fn new(modules: Vec<Module>, origin: CatalogOrigin) -> Self {
        Self { modules, origin }
    }

    pub fn builtin() -> Self {
        Self::new(super::builtin::builtin_modules(), CatalogOrigin::Builtin)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn get(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == id)
    }
}
