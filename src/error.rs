use crate::data::columns::ColumnCategory;

/// Failure to produce a table for a `(locator, filter)` pair.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Network, transport or parse failure; the chain is kept for display.
    #[error("{0:#}")]
    Failure(anyhow::Error),

    #[error("column 'TURMA' not found in the sheet")]
    MissingFilterColumn,
}

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        LoadError::Failure(err)
    }
}

/// Everything that can stop a lookup before a result is shown.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("columns not found: {}", join_categories(.missing))]
    UnresolvedColumns {
        missing: Vec<ColumnCategory>,
        available: Vec<String>,
    },

    #[error("identifier '{0}' is not a number")]
    InvalidIdentifier(String),

    #[error("identifier {0} not found")]
    NotFound(i64),
}

fn join_categories(categories: &[ColumnCategory]) -> String {
    categories
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}
