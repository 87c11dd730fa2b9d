//! The immutable, load-once sales dataset.
//!
//! A [`Dataset`] is read from disk once and then shared through [`Arc`]
//! by every session. [`Dataset::shared`] additionally keeps one instance in
//! a process-wide slot so repeated callers never reload the file.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::NaiveDate;
use dashboard_core::error::Result;
use dashboard_core::models::{DateRange, FilterCriteria, Record};
use dashboard_data::filters::{city_options, date_bounds, state_options};
use dashboard_data::reader::load_dataset;

static SHARED: OnceLock<Arc<Dataset>> = OnceLock::new();

// ── Dataset ───────────────────────────────────────────────────────────────────

/// Loaded order lines plus the option lists derived from them.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File the records came from; `None` for in-memory datasets.
    source: Option<PathBuf>,
    records: Vec<Record>,
    states: Vec<String>,
    bounds: Option<DateRange>,
}

impl Dataset {
    /// Read and validate the CSV at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let started = Instant::now();
        let records = load_dataset(path)?;
        let mut dataset = Self::from_records(records);
        dataset.source = Some(path.to_path_buf());
        tracing::info!(
            records = dataset.len(),
            states = dataset.states.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded from {}",
            path.display()
        );
        Ok(dataset)
    }

    /// Wrap records that are already in memory.
    pub fn from_records(records: Vec<Record>) -> Self {
        let states = state_options(&records);
        let bounds = date_bounds(&records);
        Self {
            source: None,
            records,
            states,
            bounds,
        }
    }

    /// Load `path` into the process-wide slot on first use and return it.
    ///
    /// Later calls return the same instance without touching the disk. A
    /// later call naming a different file still gets the first dataset.
    pub fn shared(path: &Path) -> Result<Arc<Dataset>> {
        if let Some(existing) = SHARED.get() {
            if existing.source.as_deref() != Some(path) {
                tracing::warn!(
                    "dataset already loaded from {:?}; ignoring request for {}",
                    existing.source,
                    path.display()
                );
            }
            return Ok(Arc::clone(existing));
        }

        let loaded = Arc::new(Self::load(path)?);
        match SHARED.set(Arc::clone(&loaded)) {
            Ok(()) => Ok(loaded),
            // Another caller won the race; hand out theirs.
            Err(_) => Ok(SHARED.get().cloned().unwrap_or(loaded)),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// States in first-seen order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Cities of `state`, or of every state when `None`.
    pub fn cities(&self, state: Option<&str>) -> Vec<String> {
        city_options(&self.records, state)
    }

    /// Earliest and latest order date.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// Criteria covering the whole dataset: full date span, all states and
    /// cities.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.bounds.unwrap_or_else(DateRange::unbounded))
    }

    /// Default criteria with any explicit overrides applied.
    pub fn initial_criteria(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        state: Option<String>,
        city: Option<String>,
    ) -> FilterCriteria {
        let defaults = self.default_criteria().date_range;
        let range = DateRange::new(start.unwrap_or(defaults.start), end.unwrap_or(defaults.end));
        FilterCriteria::new(range).with_state(state).with_city(city)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
