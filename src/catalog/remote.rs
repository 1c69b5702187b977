//! Remote catalog format and sources
//!
//! The content API serves `GET {base}/modules` as a JSON array of module
//! descriptors. Fields are optional on the wire; `normalize` is the one
//! place where defaults are applied and references are resolved.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::model::{Assessment, FlowKind, Lesson, Module, QuizQuestion};
use crate::error::{JourneyError, Result};

/// Module descriptor as served by the content API
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Selects the lesson flow (`quiz`, `checklist`, anything else is generic)
    #[serde(default)]
    pub component_key: Option<String>,

    #[serde(default)]
    pub lessons_count: Option<u32>,

    #[serde(default, alias = "pointsValue")]
    pub points: Option<u32>,

    /// Explicit ordering; takes precedence over array order
    #[serde(default)]
    pub sort_key: Option<i64>,

    /// Ids of modules that must be complete first
    #[serde(default)]
    pub prerequisites: Option<Vec<String>>,

    #[serde(default)]
    pub lessons: Vec<LessonDescriptor>,

    #[serde(default)]
    pub quiz: Vec<QuestionDescriptor>,

    #[serde(default)]
    pub checklist: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LessonDescriptor {
    pub id: String,
    pub title: String,
    pub focus: String,
    pub summary: String,
    pub scripture: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDescriptor {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: usize,
}

/// Turn wire descriptors into ordered modules.
///
/// Rejects the whole payload if any descriptor is unusable, since dropping
/// one would shift every later index.
pub fn normalize(mut descriptors: Vec<ModuleDescriptor>) -> Result<Vec<Module>> {
    if descriptors.is_empty() {
        return Err(JourneyError::Catalog("catalog is empty".into()));
    }

    // Keyed descriptors first by key, unkeyed after; stable within each group
    descriptors.sort_by_key(|d| match d.sort_key {
        Some(key) => (0, key),
        None => (1, 0),
    });

    let mut seen = HashSet::new();
    for d in &descriptors {
        if d.id.trim().is_empty() {
            return Err(JourneyError::Catalog("module without id".into()));
        }
        if d.title.trim().is_empty() {
            return Err(JourneyError::Catalog(format!("module '{}' has no title", d.id)));
        }
        if !seen.insert(d.id.as_str()) {
            return Err(JourneyError::Catalog(format!("duplicate module id '{}'", d.id)));
        }
    }

    let ids: Vec<String> = descriptors.iter().map(|d| d.id.clone()).collect();

    descriptors
        .into_iter()
        .enumerate()
        .map(|(index, d)| normalize_one(index, d, &ids))
        .collect()
}

fn normalize_one(index: usize, d: ModuleDescriptor, ids: &[String]) -> Result<Module> {
    let prerequisites = match &d.prerequisites {
        None if index == 0 => vec![],
        None => vec![index - 1],
        Some(required) => required
            .iter()
            .map(|req| {
                let pos = ids.iter().position(|id| id == req).ok_or_else(|| {
                    JourneyError::Catalog(format!("module '{}' requires unknown '{}'", d.id, req))
                })?;
                if pos >= index {
                    return Err(JourneyError::Catalog(format!(
                        "module '{}' requires '{}' which is not ordered before it",
                        d.id, req
                    )));
                }
                Ok(pos)
            })
            .collect::<Result<Vec<_>>>()?,
    };

    let flow = FlowKind::from_component_key(d.component_key.as_deref());

    let assessment = match flow {
        FlowKind::Quiz => Assessment::Quiz {
            questions: d
                .quiz
                .into_iter()
                .map(|q| {
                    if q.answer >= q.options.len() {
                        return Err(JourneyError::Catalog(format!(
                            "module '{}': answer {} out of range for '{}'",
                            d.id, q.answer, q.prompt
                        )));
                    }
                    Ok(QuizQuestion {
                        prompt: q.prompt,
                        options: q.options,
                        answer: q.answer,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        },
        FlowKind::Checklist => Assessment::Checklist { items: d.checklist },
        FlowKind::Generic => Assessment::Acknowledge,
    };

    let lessons: Vec<Lesson> = d
        .lessons
        .into_iter()
        .enumerate()
        .map(|(n, l)| Lesson {
            id: if l.id.is_empty() { format!("{}-{}", d.id, n + 1) } else { l.id },
            title: l.title,
            focus: l.focus,
            summary: l.summary,
            scripture: l.scripture,
            content: l.content,
        })
        .collect();

    Ok(Module {
        lessons_count: d.lessons_count.unwrap_or(lessons.len() as u32),
        points_value: d.points.unwrap_or(0),
        description: d.description.unwrap_or_default(),
        id: d.id,
        title: d.title,
        lessons,
        prerequisites,
        flow,
        assessment,
    })
}

/// Something that can produce module descriptors
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<ModuleDescriptor>>;

    /// Human-readable origin for logs
    fn describe(&self) -> String;
}

/// Fetches descriptors from the content API
pub struct HttpCatalogSource {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpCatalogSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
            client: reqwest::Client::new(),
        }
    }

    pub fn modules_url(&self) -> String {
        format!("{}/modules", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<Vec<ModuleDescriptor>> {
        let url = self.modules_url();
        debug!(%url, "Fetching module catalog");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| JourneyError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JourneyError::Network(format!(
                "Failed to fetch catalog: {}",
                response.status()
            )));
        }

        response
            .json::<Vec<ModuleDescriptor>>()
            .await
            .map_err(|e| JourneyError::Catalog(e.to_string()))
    }

    fn describe(&self) -> String {
        self.modules_url()
    }
}

/// Serves descriptors from a JSON document held in memory
pub struct StaticCatalogSource {
    body: String,
}

impl StaticCatalogSource {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> Result<Vec<ModuleDescriptor>> {
        Ok(serde_json::from_str(&self.body)?)
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
