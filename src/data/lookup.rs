use super::columns::ColumnMap;
use super::model::{CellValue, Table};

/// One student's row, pulled out of a resolved table.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub score1: CellValue,
    pub score2: CellValue,
    /// Only present when the sheet has an average column.
    pub average: Option<CellValue>,
}

/// Whether an identifier cell holds exactly `id`.
///
/// Only numeric cells compare; a text cell `"1234567"` is not a match.
fn id_matches(cell: &CellValue, id: i64) -> bool {
    match cell {
        CellValue::Integer(i) => *i == id,
        CellValue::Float(f) => *f == id as f64,
        _ => false,
    }
}

/// Return the first row whose identifier equals `id`. Later duplicates are
/// ignored.
pub fn find_student(table: &Table, columns: &ColumnMap, id: i64) -> Option<StudentRecord> {
    let row = table
        .rows
        .iter()
        .find(|row| id_matches(table.cell(row, &columns.id), id))?;

    Some(StudentRecord {
        id,
        name: table.text(row, &columns.name).to_string(),
        score1: table.cell(row, &columns.score1).clone(),
        score2: table.cell(row, &columns.score2).clone(),
        average: columns
            .average
            .as_deref()
            .map(|col| table.cell(row, col).clone()),
    })
}
