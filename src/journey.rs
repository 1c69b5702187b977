//! Journey session
//!
//! Owns the catalog, the progress store and the learner's position, and
//! applies the gate on navigation. Passing a module's assessment marks it
//! complete and moves on to the next module.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{load_catalog, Catalog, CatalogOrigin, HttpCatalogSource, Module};
use crate::config::Config;
use crate::error::{JourneyError, Result};
use crate::flow::{render, Answers, AssessmentOutcome, ModuleFlow, ModuleState, Screen};
use crate::gate;
use crate::progress::{self, ProgressStore};
use crate::rank::{self, RankProjection, RankTable};

/// Result of submitting the active module's assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    /// Index of the module that was assessed
    pub module: usize,
    pub outcome: AssessmentOutcome,
    /// Module the session moved on to, if any
    pub advanced_to: Option<usize>,
    /// True only on the submission that completed the last open module
    pub catalog_finished: bool,
}

pub struct Journey {
    catalog: Catalog,
    store: ProgressStore,
    ranks: RankTable,
    threshold_percent: u8,
    active: usize,
    flows: Vec<ModuleFlow>,
}

impl Journey {
    pub fn new(catalog: Catalog, mut store: ProgressStore, ranks: RankTable, threshold_percent: u8) -> Self {
        fit_to_catalog(&mut store, &catalog);
        let flows = initial_flows(&catalog, &store);
        info!(
            modules = catalog.len(),
            completed = store.completed_count(),
            "Journey started"
        );
        Self {
            catalog,
            store,
            ranks,
            threshold_percent,
            active: 0,
            flows,
        }
    }

    /// Default rank table and a 70% pass mark
    pub fn with_defaults(catalog: Catalog, store: ProgressStore) -> Self {
        Self::new(catalog, store, RankTable::default(), 70)
    }

    /// Load the catalog and open the progress store described by `config`
    pub async fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let catalog = match &config.catalog.url {
            Some(url) => {
                let source =
                    HttpCatalogSource::new(url.clone(), Duration::from_secs(config.catalog.timeout_secs));
                load_catalog(&source).await
            }
            None => Catalog::builtin(),
        };

        let backend = progress::open_backend(&config.storage)?;
        let store = ProgressStore::open(backend, config.storage.key.clone());

        let ranks = RankTable::new(config.rank.names.clone())
            .ok_or_else(|| JourneyError::Config("rank.names must not be empty".into()))?;

        Ok(Self::new(catalog, store, ranks, config.assessment.pass_threshold_percent))
    }

    /// Swap in a freshly loaded catalog, dropping progress for modules that
    /// no longer exist.
    pub fn reload_catalog(&mut self, catalog: Catalog) {
        fit_to_catalog(&mut self.store, &catalog);
        self.active = gate::clamp_active(self.active, catalog.len());
        self.flows = initial_flows(&catalog, &self.store);
        self.catalog = catalog;
        debug!(modules = self.catalog.len(), active = self.active, "Catalog reloaded");
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn active_module(&self) -> Option<&Module> {
        self.catalog.get(self.active)
    }

    pub fn is_complete(&self, index: usize) -> bool {
        self.store.is_complete(index)
    }

    pub fn is_unlocked(&self, index: usize) -> bool {
        gate::is_unlocked(&self.catalog, self.store.completed(), index)
    }

    pub fn module_state(&self, index: usize) -> Option<ModuleState> {
        self.flows.get(index).map(|f| f.state())
    }

    pub fn projection(&self) -> RankProjection {
        rank::project(&self.ranks, &self.catalog, self.store.completed())
    }

    /// First unlocked module that still needs completing
    pub fn next_open_module(&self) -> Option<usize> {
        gate::next_open_module(&self.catalog, self.store.completed())
    }

    pub fn is_catalog_finished(&self) -> bool {
        !self.catalog.is_empty() && (0..self.catalog.len()).all(|i| self.store.is_complete(i))
    }

    /// Make `index` the active module and open it
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if !self.is_unlocked(index) {
            return Err(JourneyError::Locked { index });
        }
        self.active = index;
        self.flows[index].open();
        debug!(index, "Module selected");
        Ok(())
    }

    /// What the active module should show
    pub fn screen(&self) -> Option<Screen<'_>> {
        let module = self.catalog.get(self.active)?;
        Some(render(module, &self.flows[self.active]))
    }

    pub fn next_lesson(&mut self) -> Result<ModuleState> {
        let index = self.active;
        self.check_index(index)?;
        self.flows[index].next_lesson(&self.catalog.modules()[index])
    }

    pub fn previous_lesson(&mut self) -> Result<ModuleState> {
        let index = self.active;
        self.check_index(index)?;
        self.flows[index].previous_lesson(&self.catalog.modules()[index])
    }

    pub fn begin_assessment(&mut self) -> Result<()> {
        let index = self.active;
        self.check_index(index)?;
        self.flows[index].begin_assessment()
    }

    /// Submit the active module's assessment
    pub fn submit(&mut self, answers: &Answers) -> Result<SubmissionReport> {
        let index = self.active;
        self.check_index(index)?;

        let was_finished = self.is_catalog_finished();
        let module = &self.catalog.modules()[index];
        let outcome = self.flows[index].submit(module, answers, self.threshold_percent)?;

        let mut report = SubmissionReport {
            module: index,
            outcome,
            advanced_to: None,
            catalog_finished: false,
        };

        if !outcome.passed {
            info!(index, percent = outcome.percent, "Assessment not passed, retry available");
            return Ok(report);
        }

        self.store.mark_complete(index);

        let next = index + 1;
        if next < self.catalog.len() && self.is_unlocked(next) {
            self.active = next;
            self.flows[next].open();
            report.advanced_to = Some(next);
        }

        report.catalog_finished = !was_finished && self.is_catalog_finished();
        if report.catalog_finished {
            info!(modules = self.catalog.len(), "All modules complete");
        }

        Ok(report)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.catalog.len() {
            return Err(JourneyError::UnknownModule {
                index,
                len: self.catalog.len(),
            });
        }
        Ok(())
    }
}

/// Only a served catalog may delete stored progress. The built-in one is
/// shorter than most real catalogs, so indices past it are shelved.
fn fit_to_catalog(store: &mut ProgressStore, catalog: &Catalog) {
    match catalog.origin() {
        CatalogOrigin::Remote => {
            store.prune_to_catalog_size(catalog.len());
        }
        CatalogOrigin::Builtin => {
            store.shelve_beyond(catalog.len());
        }
    }
}

fn initial_flows(catalog: &Catalog, store: &ProgressStore) -> Vec<ModuleFlow> {
    (0..catalog.len())
        .map(|i| {
            if store.is_complete(i) {
                ModuleFlow::completed()
            } else {
                ModuleFlow::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{MemoryBackend, ProgressBackend, DEFAULT_PROGRESS_KEY};

    fn journey() -> Journey {
        Journey::with_defaults(Catalog::builtin(), ProgressStore::in_memory())
    }

    fn pass(journey: &mut Journey) -> SubmissionReport {
        journey.begin_assessment().unwrap();
        let answers = match journey.active() {
            0 => Answers::Quiz(vec![1, 1, 1, 1]),
            1 => Answers::Quiz(vec![0, 1, 0, 2, 2]),
            _ => Answers::Checklist(vec![true, true, true]),
        };
        journey.submit(&answers).unwrap()
    }

    #[test]
    fn test_locked_selection() {
        let mut journey = journey();
        let err = journey.select(1).unwrap_err();
        assert!(matches!(err, JourneyError::Locked { index: 1 }));
        assert!(matches!(journey.select(7), Err(JourneyError::UnknownModule { .. })));
        assert_eq!(journey.active(), 0);
    }

    #[test]
    fn test_pass_advances_and_opens_next() {
        let mut journey = journey();
        journey.select(0).unwrap();

        let report = pass(&mut journey);
        assert!(report.outcome.passed);
        assert_eq!(report.advanced_to, Some(1));
        assert_eq!(journey.active(), 1);
        assert_eq!(journey.module_state(0), Some(ModuleState::Completed));
        assert_eq!(journey.module_state(1), Some(ModuleState::InProgress));
    }

    #[test]
    fn test_last_module_does_not_advance() {
        let mut journey = journey();
        journey.select(0).unwrap();
        pass(&mut journey);
        pass(&mut journey);
        let last = pass(&mut journey);

        assert_eq!(last.module, 2);
        assert_eq!(last.advanced_to, None);
        assert!(last.catalog_finished);
        assert_eq!(journey.active(), 2);
    }

    #[test]
    fn test_reload_shorter_catalog() {
        let mut journey = journey();
        journey.select(0).unwrap();
        pass(&mut journey);
        pass(&mut journey);
        assert_eq!(journey.active(), 2);

        let short = Catalog::new(Catalog::builtin().modules()[..1].to_vec(), CatalogOrigin::Remote);
        journey.reload_catalog(short);

        assert_eq!(journey.active(), 0);
        assert!(journey.is_complete(0));
        assert!(!journey.is_complete(1));
        assert_eq!(journey.store().completed_count(), 1);
    }

    #[test]
    fn test_reload_to_builtin_shelves_instead_of_pruning() {
        let backend = MemoryBackend::new();
        backend.write(DEFAULT_PROGRESS_KEY, "[0,1,2,3,4]").unwrap();
        let store = ProgressStore::open(Box::new(backend.clone()), DEFAULT_PROGRESS_KEY);

        let mut modules = Catalog::builtin().modules().to_vec();
        modules.extend(Catalog::builtin().modules().iter().cloned());
        let mut journey = Journey::with_defaults(Catalog::new(modules, CatalogOrigin::Remote), store);
        assert_eq!(journey.store().completed_count(), 5);

        journey.reload_catalog(Catalog::builtin());

        assert_eq!(journey.store().completed_count(), 3);
        assert!(journey.is_catalog_finished());
        assert_eq!(
            backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(),
            Some("[0,1,2,3,4]")
        );
    }

    #[test]
    fn test_screen_follows_active_module() {
        let mut journey = journey();
        assert!(matches!(journey.screen(), Some(Screen::Overview { .. })));
        journey.select(0).unwrap();
        assert!(matches!(journey.screen(), Some(Screen::Lesson { position: 1, .. })));
        journey.begin_assessment().unwrap();
        assert!(matches!(journey.screen(), Some(Screen::Quiz { .. })));
    }
}
