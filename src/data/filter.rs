use super::model::Table;
use crate::error::LoadError;

/// Column that splits a shared sheet into classes.
pub const CLASS_COLUMN: &str = "TURMA";

/// Keep only the rows whose class marker equals `class_key`.
///
/// Row order is preserved and the source table is left untouched. Fails with
/// [`LoadError::MissingFilterColumn`] when the sheet has no `TURMA` column.
pub fn filter_by_class(table: &Table, class_key: &str) -> Result<Table, LoadError> {
    if !table.has_column(CLASS_COLUMN) {
        return Err(LoadError::MissingFilterColumn);
    }

    let rows = table
        .rows
        .iter()
        .filter(|row| {
            !table.cell(row, CLASS_COLUMN).is_null() && table.text(row, CLASS_COLUMN) == class_key
        })
        .cloned()
        .collect();

    Ok(Table {
        columns: table.columns.clone(),
        rows,
        fetched_at: table.fetched_at,
    })
}
