//! Request → [`RenderModel`] handlers behind the UI.
//!
//! Each call is a self-contained request: resolve the class, check the
//! identifier, load (cached), resolve columns, find the row, evaluate. Every
//! failure is turned into a render model here; nothing escapes as an error.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::data::columns::{resolve_columns, ColumnCategory};
use crate::data::loader::{Fetch, HttpFetcher, Loader};
use crate::data::lookup::find_student;
use crate::data::model::Table;
use crate::error::{LoadError, LookupError};
use crate::grading::{evaluate, PresentationState};
use crate::registry::{ClassEntry, Registry};

/// A found student, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentResult {
    pub class_label: String,
    pub id: i64,
    pub name: String,
    pub state: PresentationState,
    pub fetched_at: DateTime<Local>,
}

/// What the UI should show after a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderModel {
    /// No class selected yet.
    SelectClass,
    /// The class is unknown or has no configured locator.
    Unavailable { label: String },
    ClassLoaded {
        label: String,
        rows: usize,
        fetched_at: DateTime<Local>,
    },
    LoadFailed { message: String },
    /// A shared sheet has no `TURMA` column to split classes on.
    MissingClassColumn,
    ColumnsUnresolved {
        missing: Vec<ColumnCategory>,
        available: Vec<String>,
    },
    EmptyIdentifier,
    InvalidIdentifier { input: String },
    NotFound { id: i64 },
    Found(StudentResult),
    CacheCleared,
}

impl From<LookupError> for RenderModel {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Load(LoadError::MissingFilterColumn) => RenderModel::MissingClassColumn,
            LookupError::Load(e) => RenderModel::LoadFailed {
                message: e.to_string(),
            },
            LookupError::UnresolvedColumns { missing, available } => {
                RenderModel::ColumnsUnresolved { missing, available }
            }
            LookupError::InvalidIdentifier(input) => RenderModel::InvalidIdentifier { input },
            LookupError::NotFound(id) => RenderModel::NotFound { id },
        }
    }
}

/// Parse a typed identifier. Surrounding whitespace is ignored; anything
/// that is not a positive integer is rejected.
pub fn parse_identifier(raw: &str) -> Result<i64, LookupError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(LookupError::InvalidIdentifier(raw.trim().to_string())),
    }
}

/// Registry plus cached loader; shared by every request of the process.
pub struct GradeService<F: Fetch = HttpFetcher> {
    registry: Registry,
    loader: Loader<F>,
}

impl<F: Fetch> GradeService<F> {
    pub fn new(registry: Registry, loader: Loader<F>) -> Self {
        Self { registry, loader }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// A class was picked: load its sheet so the user sees it is reachable.
    pub fn select(&self, label: Option<&str>) -> RenderModel {
        let entry = match self.available_entry(label) {
            Ok(entry) => entry,
            Err(model) => return model,
        };
        match self.load(entry) {
            Ok(table) => RenderModel::ClassLoaded {
                label: entry.label.clone(),
                rows: table.len(),
                fetched_at: table.fetched_at,
            },
            Err(e) => e.into(),
        }
    }

    /// Look up `raw_id` in the selected class.
    pub fn lookup(&self, label: Option<&str>, raw_id: &str) -> RenderModel {
        let entry = match self.available_entry(label) {
            Ok(entry) => entry,
            Err(model) => return model,
        };
        if raw_id.trim().is_empty() {
            return RenderModel::EmptyIdentifier;
        }
        match self.find(entry, raw_id) {
            Ok(result) => RenderModel::Found(result),
            Err(e) => {
                log::info!("Lookup in '{}' ended with: {e}", entry.label);
                e.into()
            }
        }
    }

    /// Drop every cached sheet so the next request fetches fresh data.
    pub fn refresh(&self) -> RenderModel {
        self.loader.invalidate_all();
        RenderModel::CacheCleared
    }

    fn available_entry(&self, label: Option<&str>) -> Result<&ClassEntry, RenderModel> {
        let label = label.ok_or(RenderModel::SelectClass)?;
        match self.registry.resolve(label) {
            Some(entry) if entry.is_available() => Ok(entry),
            _ => Err(RenderModel::Unavailable {
                label: label.to_string(),
            }),
        }
    }

    fn load(&self, entry: &ClassEntry) -> Result<Arc<Table>, LookupError> {
        self.loader
            .load(&entry.locator, entry.filter_key.as_deref())
            .map_err(|e: LoadError| {
                log::error!("Failed to load '{}': {e}", entry.label);
                LookupError::Load(e)
            })
    }

    fn find(&self, entry: &ClassEntry, raw_id: &str) -> Result<StudentResult, LookupError> {
        let id = parse_identifier(raw_id)?;
        let table = self.load(entry)?;
        let columns = resolve_columns(&table)?;
        let record = find_student(&table, &columns, id).ok_or(LookupError::NotFound(id))?;

        Ok(StudentResult {
            class_label: entry.label.clone(),
            id: record.id,
            name: record.name,
            state: evaluate(&record.score1, &record.score2, record.average.as_ref()),
            fetched_at: table.fetched_at,
        })
    }
}
