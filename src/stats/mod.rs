//! Stats module - Descriptive statistics

mod calculator;

pub use calculator::{BoxStats, StatsCalculator, Summary, STATISTIC_LABELS};
