//! Status aggregation
//!
//! Pure transforms over the period -> indicator -> status grid embedded in
//! each job. All traversal follows the insertion order of the maps, which is
//! the document order of the decoded payload.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::job::{CellState, IndicatorStatuses, PeriodStatuses};

/// Share of cells that have finished calculating
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub numerator: usize,
    pub denominator: usize,
    /// Percentage with exactly two decimals, e.g. `"25.00"`
    pub ratio: String,
}

impl Completion {
    /// False when the grid had no cells at all and `ratio` carries no information
    pub fn has_cells(&self) -> bool {
        self.denominator > 0
    }
}

/// Coordinates of one cell in the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellRef {
    pub period: String,
    pub indicator: String,
}

/// Decode the JSON text carried in `calculation_status`
///
/// Blank text and JSON `null` both mean the backend has not reported any
/// cells yet.
pub fn decode(text: &str) -> serde_json::Result<Option<PeriodStatuses>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
}

/// Re-nest a period-first grid indicator-first
///
/// Indicators appear in the order they are first seen; each indicator keeps
/// the period order of the input. Cells missing from the input stay missing.
pub fn transpose(period_then_indicator: &PeriodStatuses) -> IndicatorStatuses {
    let mut indicator_then_period: IndicatorStatuses = IndexMap::new();

    for (period, indicators) in period_then_indicator {
        for (indicator, cell) in indicators {
            indicator_then_period
                .entry(indicator.clone())
                .or_default()
                .insert(period.clone(), *cell);
        }
    }

    indicator_then_period
}

pub fn completion_ratio(period_then_indicator: &PeriodStatuses) -> Completion {
    let cells = period_then_indicator.values().flat_map(|indicators| indicators.values());

    let (numerator, denominator) = cells.fold((0, 0), |(done, total), cell| {
        let done = done + usize::from(cell.status == CellState::Complete);
        (done, total + 1)
    });

    // An empty grid reports 0.00 instead of NaN
    let ratio = if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    };

    Completion {
        numerator,
        denominator,
        ratio: format!("{:.2}", ratio),
    }
}

/// First cell in `processing` state, scanning periods then indicators
pub fn currently_processing(period_then_indicator: &PeriodStatuses) -> Option<CellRef> {
    period_then_indicator
        .iter()
        .find_map(|(period, indicators)| {
            indicators
                .iter()
                .find(|(_, cell)| cell.status == CellState::Processing)
                .map(|(indicator, _)| CellRef {
                    period: period.clone(),
                    indicator: indicator.clone(),
                })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::CellStatus;
    use std::collections::BTreeSet;

    fn grid(rows: &[(&str, &[(&str, CellState)])]) -> PeriodStatuses {
        rows.iter()
            .map(|(period, cells)| {
                let cells = cells
                    .iter()
                    .map(|(indicator, state)| (indicator.to_string(), CellStatus::new(*state)))
                    .collect();
                (period.to_string(), cells)
            })
            .collect()
    }

    fn triples(
        map: &IndexMap<String, IndexMap<String, CellStatus>>,
        swap: bool,
    ) -> BTreeSet<(String, String, String)> {
        map.iter()
            .flat_map(|(outer, inner)| {
                inner.iter().map(move |(key, cell)| {
                    let state = format!("{:?}", cell.status);
                    if swap {
                        (key.clone(), outer.clone(), state)
                    } else {
                        (outer.clone(), key.clone(), state)
                    }
                })
            })
            .collect()
    }

    #[test]
    fn test_transpose_preserves_every_cell() {
        let input = grid(&[
            ("morning", &[("coverage", CellState::Complete), ("fare", CellState::Processing)]),
            ("evening", &[("coverage", CellState::Queued), ("fare", CellState::Queued)]),
            ("weekend", &[("coverage", CellState::Error)]),
        ]);

        let output = transpose(&input);

        assert_eq!(triples(&input, false), triples(&output, true));
        assert_eq!(output.keys().collect::<Vec<_>>(), vec!["coverage", "fare"]);
        assert_eq!(
            output["coverage"].keys().collect::<Vec<_>>(),
            vec!["morning", "evening", "weekend"]
        );
        // Missing cells are not synthesized
        assert!(!output["fare"].contains_key("weekend"));
    }

    #[test]
    fn test_transpose_collects_indicators_missing_from_first_period() {
        let input = grid(&[
            ("am", &[("coverage", CellState::Complete)]),
            ("pm", &[("coverage", CellState::Complete), ("job_access", CellState::Queued)]),
        ]);

        let output = transpose(&input);

        assert_eq!(output.keys().collect::<Vec<_>>(), vec!["coverage", "job_access"]);
        assert_eq!(output["job_access"].len(), 1);
    }

    #[test]
    fn test_transpose_empty() {
        assert!(transpose(&PeriodStatuses::new()).is_empty());
    }

    #[test]
    fn test_completion_ratio_quarter() {
        let input = grid(&[
            ("am", &[("coverage", CellState::Complete), ("fare", CellState::Processing)]),
            ("pm", &[("coverage", CellState::Queued), ("fare", CellState::Queued)]),
        ]);

        let completion = completion_ratio(&input);

        assert_eq!(completion.numerator, 1);
        assert_eq!(completion.denominator, 4);
        assert_eq!(completion.ratio, "25.00");
        assert!(completion.has_cells());
    }

    #[test]
    fn test_completion_ratio_rounds_to_two_places() {
        let input = grid(&[(
            "am",
            &[
                ("a", CellState::Complete),
                ("b", CellState::Error),
                ("c", CellState::Queued),
            ],
        )]);

        assert_eq!(completion_ratio(&input).ratio, "33.33");
    }

    #[test]
    fn test_completion_ratio_empty_grid() {
        let completion = completion_ratio(&PeriodStatuses::new());

        assert_eq!(completion.numerator, 0);
        assert_eq!(completion.denominator, 0);
        assert_eq!(completion.ratio, "0.00");
        assert!(!completion.has_cells());

        let mut empty_period = PeriodStatuses::new();
        empty_period.insert("am".to_string(), IndexMap::new());
        assert!(!completion_ratio(&empty_period).has_cells());
    }

    #[test]
    fn test_currently_processing_first_in_order() {
        let input = grid(&[
            ("am", &[("access_times", CellState::Complete), ("fare", CellState::Processing)]),
            ("pm", &[("access_times", CellState::Complete), ("fare", CellState::Processing)]),
        ]);

        assert_eq!(
            currently_processing(&input),
            Some(CellRef {
                period: "am".to_string(),
                indicator: "fare".to_string(),
            })
        );
    }

    #[test]
    fn test_currently_processing_none() {
        let input = grid(&[(
            "am",
            &[("fare", CellState::Complete), ("coverage", CellState::Queued)],
        )]);
        assert_eq!(currently_processing(&input), None);
    }

    #[test]
    fn test_decode_keeps_document_order() {
        let text = r#"{
            "weekend": {"num_stops": {"status": "queued"}, "coverage": {"status": "processing"}},
            "morning": {"coverage": {"status": "complete"}, "num_stops": {"status": "processing"}}
        }"#;

        let decoded = decode(text).unwrap().unwrap();

        assert_eq!(decoded.keys().collect::<Vec<_>>(), vec!["weekend", "morning"]);
        assert_eq!(
            decoded["weekend"].keys().collect::<Vec<_>>(),
            vec!["num_stops", "coverage"]
        );
        assert_eq!(
            currently_processing(&decoded),
            Some(CellRef {
                period: "weekend".to_string(),
                indicator: "coverage".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_blank_and_null() {
        assert_eq!(decode("").unwrap(), None);
        assert_eq!(decode("  ").unwrap(), None);
        assert_eq!(decode("null").unwrap(), None);
        assert!(decode("{not json").is_err());
    }
}
