use crate::data::model::CellValue;

/// Minimum average for a direct pass.
pub const PASSING_AVERAGE: f64 = 7.0;

/// Text the sheets use for a score that was never entered.
pub const NOT_AVAILABLE: &str = "#N/A";

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Render a score with one fractional digit.
///
/// Rounding follows Rust's float formatting: the nearest one-decimal value
/// to the exact binary number, exact ties going to even (`6.95` → `7.0`,
/// `8.04` → `8.0`, `0.25` → `0.2`). Values that are not numbers pass through
/// unchanged, so sentinels like `#N/A` display verbatim.
pub fn format_score(value: &CellValue) -> String {
    match value.as_f64() {
        Some(v) => format!("{v:.1}"),
        None => value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Status evaluation
// ---------------------------------------------------------------------------

/// Which of the two assessments a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    First,
    Second,
}

/// Formatted scores shown on a result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scores {
    pub score1: String,
    pub score2: String,
    pub average: String,
}

/// One-shot classification of a student's scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationState {
    BothMissing,
    /// Only the present score is shown; no average.
    OneMissing {
        missing: Assessment,
        shown: String,
    },
    Passed(Scores),
    NeedsFinal(Scores),
    /// The average is not a number; no pass/fail claim is made.
    UnknownStatus(Scores),
}

/// Whether a score counts as not taken.
///
/// Blank, `#N/A` and a literal zero all count as missing, so a real grade of
/// zero cannot be told apart from an absent one.
pub fn is_missing(score: &CellValue) -> bool {
    match score {
        CellValue::Null => true,
        CellValue::Integer(0) => true,
        CellValue::Float(f) => *f == 0.0,
        CellValue::Integer(_) => false,
        CellValue::String(s) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case(NOT_AVAILABLE)
        }
    }
}

/// Classify two scores and an optional average taken from the sheet.
pub fn evaluate(
    score1: &CellValue,
    score2: &CellValue,
    average: Option<&CellValue>,
) -> PresentationState {
    match (is_missing(score1), is_missing(score2)) {
        (true, true) => PresentationState::BothMissing,
        (true, false) => PresentationState::OneMissing {
            missing: Assessment::First,
            shown: format_score(score2),
        },
        (false, true) => PresentationState::OneMissing {
            missing: Assessment::Second,
            shown: format_score(score1),
        },
        (false, false) => classify(score1, score2, average),
    }
}

fn classify(score1: &CellValue, score2: &CellValue, average: Option<&CellValue>) -> PresentationState {
    let average = match average {
        Some(supplied) if !supplied.is_null() => supplied.clone(),
        _ => {
            let a = score1.as_f64().unwrap_or(0.0);
            let b = score2.as_f64().unwrap_or(0.0);
            CellValue::Float((a + b) / 2.0)
        }
    };

    let scores = |average: String| Scores {
        score1: format_score(score1),
        score2: format_score(score2),
        average,
    };

    match average.as_f64().filter(|v| v.is_finite()) {
        Some(v) if v >= PASSING_AVERAGE => PresentationState::Passed(scores(format_score(&average))),
        Some(_) => PresentationState::NeedsFinal(scores(format_score(&average))),
        None => {
            log::warn!("Average {average:?} is not a number");
            PresentationState::UnknownStatus(scores(format_score(&CellValue::Float(0.0))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(score1: &str, score2: &str, average: &str) -> Scores {
        Scores {
            score1: score1.into(),
            score2: score2.into(),
            average: average.into(),
        }
    }

    #[test]
    fn formats_one_decimal() {
        assert_eq!(format_score(&CellValue::Integer(7)), "7.0");
        assert_eq!(format_score(&CellValue::Float(6.95)), "7.0");
        assert_eq!(format_score(&CellValue::Float(8.04)), "8.0");
        assert_eq!(format_score(&CellValue::from("6.95")), "7.0");
        assert_eq!(format_score(&CellValue::Float(0.25)), "0.2");
    }

    #[test]
    fn non_numbers_pass_through() {
        assert_eq!(format_score(&CellValue::from("#N/A")), "#N/A");
        assert_eq!(format_score(&CellValue::from("")), "");
        assert_eq!(format_score(&CellValue::Null), "");
        assert_eq!(format_score(&CellValue::from("Faltou")), "Faltou");
    }

    #[test]
    fn missing_markers() {
        assert!(is_missing(&CellValue::Null));
        assert!(is_missing(&CellValue::Integer(0)));
        assert!(is_missing(&CellValue::Float(0.0)));
        assert!(is_missing(&CellValue::from("  ")));
        assert!(is_missing(&CellValue::from("#n/a")));
        assert!(!is_missing(&CellValue::Float(0.5)));
        assert!(!is_missing(&CellValue::from("F")));
    }

    #[test]
    fn zero_is_treated_as_not_taken() {
        let state = evaluate(&CellValue::Integer(0), &CellValue::Float(8.0), None);
        assert_eq!(
            state,
            PresentationState::OneMissing {
                missing: Assessment::First,
                shown: "8.0".into(),
            }
        );
    }

    #[test]
    fn both_missing() {
        let state = evaluate(&CellValue::Null, &CellValue::from("#N/A"), None);
        assert_eq!(state, PresentationState::BothMissing);
    }

    #[test]
    fn second_missing_shows_first() {
        let state = evaluate(&CellValue::Float(9.3), &CellValue::Null, Some(&CellValue::Float(4.6)));
        assert_eq!(
            state,
            PresentationState::OneMissing {
                missing: Assessment::Second,
                shown: "9.3".into(),
            }
        );
    }

    #[test]
    fn pass_boundary_is_inclusive() {
        let passed = evaluate(&CellValue::Integer(8), &CellValue::Integer(6), None);
        assert_eq!(passed, PresentationState::Passed(scores("8.0", "6.0", "7.0")));

        let below = evaluate(&CellValue::Integer(8), &CellValue::Integer(6), Some(&CellValue::Float(6.99)));
        assert_eq!(below, PresentationState::NeedsFinal(scores("8.0", "6.0", "7.0")));
    }

    #[test]
    fn supplied_average_wins_over_computed() {
        let state = evaluate(&CellValue::Integer(10), &CellValue::Integer(10), Some(&CellValue::Float(5.5)));
        assert_eq!(state, PresentationState::NeedsFinal(scores("10.0", "10.0", "5.5")));
    }

    #[test]
    fn blank_supplied_average_is_computed() {
        let state = evaluate(&CellValue::Integer(7), &CellValue::Integer(8), Some(&CellValue::Null));
        assert_eq!(state, PresentationState::Passed(scores("7.0", "8.0", "7.5")));
    }

    #[test]
    fn non_numeric_score_counts_as_zero_in_mean() {
        let state = evaluate(&CellValue::from("F"), &CellValue::Integer(9), None);
        assert_eq!(state, PresentationState::NeedsFinal(scores("F", "9.0", "4.5")));
    }

    #[test]
    fn unparseable_average_is_unknown() {
        let state = evaluate(&CellValue::Integer(8), &CellValue::Integer(9), Some(&CellValue::from("#REF!")));
        assert_eq!(state, PresentationState::UnknownStatus(scores("8.0", "9.0", "0.0")));
    }
}
