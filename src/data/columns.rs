use std::fmt;

use super::model::Table;
use crate::error::LookupError;

// ---------------------------------------------------------------------------
// Column categories and matching rules
// ---------------------------------------------------------------------------

/// The role a sheet column plays in a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCategory {
    Identifier,
    Name,
    Score1,
    Score2,
    Average,
}

impl ColumnCategory {
    pub const REQUIRED: [ColumnCategory; 4] = [
        ColumnCategory::Identifier,
        ColumnCategory::Name,
        ColumnCategory::Score1,
        ColumnCategory::Score2,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColumnCategory::Identifier => "matrícula",
            ColumnCategory::Name => "nome",
            ColumnCategory::Score1 => "AV 01",
            ColumnCategory::Score2 => "AV 02",
            ColumnCategory::Average => "média",
        }
    }
}

impl fmt::Display for ColumnCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered `(category, predicate)` rules. Predicates see folded headers
/// (see [`fold_header`]) and are evaluated independently of each other.
pub const RULES: &[(ColumnCategory, fn(&str) -> bool)] = &[
    (ColumnCategory::Identifier, is_identifier),
    (ColumnCategory::Name, is_name),
    (ColumnCategory::Score1, is_score1),
    (ColumnCategory::Score2, is_score2),
    (ColumnCategory::Average, is_average),
];

fn is_identifier(h: &str) -> bool {
    h.contains("MATRICULA")
}

fn is_name(h: &str) -> bool {
    h.contains("NOME") || h.contains("ALUNO")
}

fn is_score1(h: &str) -> bool {
    h.contains("AV") && h.contains("01")
}

fn is_score2(h: &str) -> bool {
    h.contains("AV") && h.contains("02")
}

fn is_average(h: &str) -> bool {
    h.contains("MEDIA")
}

/// Uppercase a header and strip the Portuguese diacritics, so `Média`,
/// `MÉDIA` and `media` all read as `MEDIA`.
pub fn fold_header(header: &str) -> String {
    header
        .to_uppercase()
        .chars()
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ColumnMap
// ---------------------------------------------------------------------------

/// Which sheet column holds each piece of a student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: String,
    pub name: String,
    pub score1: String,
    pub score2: String,
    pub average: Option<String>,
}

/// First header (in table order) accepted by the rule for `category`.
fn first_match(folded: &[(String, &String)], category: ColumnCategory) -> Option<String> {
    let (_, predicate) = RULES.iter().find(|(c, _)| *c == category)?;
    folded
        .iter()
        .find(|(h, _)| predicate(h.as_str()))
        .map(|(_, original)| (*original).clone())
}

/// Identify the identifier, name, score and average columns of `table`.
pub fn resolve_columns(table: &Table) -> Result<ColumnMap, LookupError> {
    let folded: Vec<(String, &String)> = table
        .columns
        .iter()
        .map(|c| (fold_header(c), c))
        .collect();

    let resolve = |category| first_match(&folded, category);

    match (
        resolve(ColumnCategory::Identifier),
        resolve(ColumnCategory::Name),
        resolve(ColumnCategory::Score1),
        resolve(ColumnCategory::Score2),
    ) {
        (Some(id), Some(name), Some(score1), Some(score2)) => Ok(ColumnMap {
            id,
            name,
            score1,
            score2,
            average: resolve(ColumnCategory::Average),
        }),
        _ => {
            let missing: Vec<ColumnCategory> = ColumnCategory::REQUIRED
                .into_iter()
                .filter(|&category| resolve(category).is_none())
                .collect();
            log::warn!(
                "Unresolved columns {:?}; available: {:?}",
                missing,
                table.columns
            );
            Err(LookupError::UnresolvedColumns {
                missing,
                available: table.columns.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), vec![])
    }

    #[test]
    fn resolves_accented_headers() {
        let map = resolve_columns(&table(&["MATRÍCULA", "Aluno", "AV. 01", "AV. 02"])).unwrap();
        assert_eq!(map.id, "MATRÍCULA");
        assert_eq!(map.name, "Aluno");
        assert_eq!(map.score1, "AV. 01");
        assert_eq!(map.score2, "AV. 02");
        assert_eq!(map.average, None);
    }

    #[test]
    fn resolves_optional_average_in_any_order() {
        let map = resolve_columns(&table(&[
            "TURMA", "Média", "av_02", "av_01", "Nome Completo", "Matricula",
        ]))
        .unwrap();
        assert_eq!(map.id, "Matricula");
        assert_eq!(map.name, "Nome Completo");
        assert_eq!(map.score1, "av_01");
        assert_eq!(map.score2, "av_02");
        assert_eq!(map.average.as_deref(), Some("Média"));
    }

    #[test]
    fn first_matching_header_wins() {
        let map = resolve_columns(&table(&["MATRICULA", "NOME", "ALUNO", "AV 01", "AV 02"])).unwrap();
        assert_eq!(map.name, "NOME");
    }

    #[test]
    fn reports_every_missing_category() {
        let err = resolve_columns(&table(&["MATRICULA", "Turma", "AV 01"])).unwrap_err();
        match err {
            LookupError::UnresolvedColumns { missing, available } => {
                assert_eq!(missing, vec![ColumnCategory::Name, ColumnCategory::Score2]);
                assert_eq!(available, vec!["MATRICULA", "Turma", "AV 01"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn fold_strips_accents() {
        assert_eq!(fold_header("Matrícula"), "MATRICULA");
        assert_eq!(fold_header("média final"), "MEDIA FINAL");
    }
}
