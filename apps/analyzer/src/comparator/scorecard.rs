//! Traffic-light grading of one or many comparison reports.

use serde::Serialize;

use crate::comparator::report::{pct, ComparisonReport};
use crate::config::ComparatorConfig;
use crate::domain::Mode;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Green,
    Yellow,
    Red,
    /// Nothing to grade.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub name: &'static str,
    pub passed: usize,
    pub total: usize,
    pub pct: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub sessions: usize,
    pub categories: Vec<CategoryScore>,
}

impl Scorecard {
    pub fn from_report(report: &ComparisonReport, config: &ComparatorConfig) -> Self {
        Self::from_reports(std::slice::from_ref(report), config)
    }

    pub fn from_reports(reports: &[ComparisonReport], config: &ComparatorConfig) -> Self {
        let mut tricks = (0, 0);
        let mut points = (0, 0);
        let mut sun = (0, 0);
        let mut hokum = (0, 0);

        for report in reports {
            for c in &report.comparisons {
                let bucket = match c.mode {
                    Some(Mode::Sun) => Some(&mut sun),
                    Some(Mode::Hokum) => Some(&mut hokum),
                    None => None,
                };
                let ok = usize::from(c.agrees);
                if let Some(b) = bucket {
                    b.0 += ok;
                    b.1 += 1;
                }
                tricks.0 += ok;
                tricks.1 += 1;
            }
            for check in &report.round_checks {
                for verdict in [check.consistent, check.recorded_matches].into_iter().flatten() {
                    points.0 += usize::from(verdict);
                    points.1 += 1;
                }
            }
        }

        let category = |name, (passed, total): (usize, usize)| {
            let pct = pct(passed, total);
            CategoryScore {
                name,
                passed,
                total,
                pct,
                grade: grade(pct, total, config),
            }
        };
        Self {
            sessions: reports.len(),
            categories: vec![
                category("trick_resolution", tricks),
                category("point_calculation", points),
                category("mode_sun", sun),
                category("mode_hokum", hokum),
            ],
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.name == name)
    }
}

fn grade(pct: f64, total: usize, config: &ComparatorConfig) -> Grade {
    if total == 0 {
        Grade::NoData
    } else if pct >= config.green_pct {
        Grade::Green
    } else if pct >= config.yellow_pct {
        Grade::Yellow
    } else {
        Grade::Red
    }
}
