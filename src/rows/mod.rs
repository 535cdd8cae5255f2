// Copyright (c) 2024 Mike Tsao

//! Static parameter rows. When a rule detects something, each row it loads
//! pushes one jittered value to one parameter.
//!
//! A row file has exactly five comma-separated columns:
//!
//! ```text
//! volume, parameter, value, minRandomRange, maxRandomRange
//! Loud,   Impact_Gain, 1.5,  0,              0.5
//! ```
//!
//! The value `0.000000`, written exactly that way, means "zero, and don't push
//! anything."

use crate::{error::Diagnostic, types::ParameterName, util::Rng};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// The most commonly used imports.
pub mod prelude {
    pub use super::{CsvRow, CsvRowLoader, ParsedRows, RowValue};
}

/// The value column of a [CsvRow].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowValue {
    /// The literal `0.000000`. Never pushed to the audio engine.
    Zero,
    /// A number that will be jittered and pushed.
    Number(f64),
    /// Text that isn't a number. The row is kept for reference but pushes
    /// nothing.
    Unparsed(String),
}

/// One parsed row. See the [module documentation](self) for the format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CsvRow {
    /// First column. A free-form bucket label such as a volume tier.
    pub label: String,
    /// Second column. The RTPC to set.
    pub parameter: ParameterName,
    /// Third column.
    pub value: RowValue,
    /// Fourth column, added to the value to get the low end of the jitter
    /// range.
    pub min_jitter: f64,
    /// Fifth column, added to the value to get the high end of the jitter
    /// range.
    pub max_jitter: f64,
}
impl CsvRow {
    /// The row's base value as a number. Rows that push nothing read as zero.
    pub fn value(&self) -> f64 {
        match self.value {
            RowValue::Number(v) => v,
            RowValue::Zero | RowValue::Unparsed(_) => 0.0,
        }
    }

    /// The base value, if this row should push anything at all.
    pub fn postable_value(&self) -> Option<f64> {
        match self.value {
            RowValue::Number(v) => Some(v),
            RowValue::Zero | RowValue::Unparsed(_) => None,
        }
    }

    /// Picks a value uniformly between `value + min_jitter` and `value +
    /// max_jitter`, rounded to six decimal places. [None] if the row doesn't
    /// push.
    pub fn jittered_value(&self, rng: &mut Rng) -> Option<f64> {
        let value = self.postable_value()?;
        let raw = rng.rand_between(value + self.min_jitter, value + self.max_jitter);
        Some(round_to_six_places(raw))
    }
}

/// Rounds through a six-decimal fixed-point rendering, which is the precision
/// the audio engine is given.
pub fn round_to_six_places(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(value)
}

/// The result of [CsvRowLoader::parse()].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRows {
    /// Rows in source order.
    pub rows: Vec<CsvRow>,
    /// One entry for each non-blank line that didn't yield a row, and for each
    /// row whose value column wasn't a number.
    pub diagnostics: Vec<Diagnostic>,
}

/// Reads static parameter row files.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvRowLoader {
    is_verbose: bool,
}
impl CsvRowLoader {
    /// The number of columns every row must have.
    pub const FIELD_COUNT: usize = 5;

    /// This exact spelling of the value column means "don't push."
    pub const ZERO_LITERAL: &'static str = "0.000000";

    #[allow(missing_docs)]
    pub fn new_with(is_verbose: bool) -> Self {
        Self { is_verbose }
    }

    /// Parses every row in `text`. Never fails.
    pub fn parse(&self, text: &str) -> ParsedRows {
        let mut parsed = ParsedRows::default();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match self.parse_row(line) {
                Ok((row, value_problem)) => {
                    if let Some(reason) = value_problem {
                        let diagnostic = Diagnostic::new(index + 1, line, reason);
                        warn!("Failed to parse value: {diagnostic}");
                        parsed.diagnostics.push(diagnostic);
                    }
                    if self.is_verbose {
                        debug!("Loaded row {row:?}");
                    }
                    parsed.rows.push(row);
                }
                Err(reason) => {
                    let diagnostic = Diagnostic::new(index + 1, line, reason);
                    warn!("Row format is incorrect: {diagnostic}");
                    parsed.diagnostics.push(diagnostic);
                }
            }
        }
        parsed
    }

    // A bad value column still yields a row, along with the reason it won't
    // push. Anything else wrong rejects the row.
    fn parse_row(&self, line: &str) -> Result<(CsvRow, Option<String>), String> {
        let columns: Vec<&str> = line.split(',').map(str::trim).collect();
        if columns.len() != Self::FIELD_COUNT {
            return Err(format!(
                "expected {} columns, found {}",
                Self::FIELD_COUNT,
                columns.len()
            ));
        }
        let min_jitter = Self::parse_number(columns[3], "minRandomRange")?;
        let max_jitter = Self::parse_number(columns[4], "maxRandomRange")?;

        let (value, value_problem) = if columns[2] == Self::ZERO_LITERAL {
            (RowValue::Zero, None)
        } else {
            match columns[2].parse::<f64>() {
                Ok(v) => (RowValue::Number(v), None),
                Err(_) => (
                    RowValue::Unparsed(columns[2].to_string()),
                    Some(format!("value {:?} isn't a number", columns[2])),
                ),
            }
        };

        Ok((
            CsvRow {
                label: columns[0].to_string(),
                parameter: ParameterName(columns[1].to_string()),
                value,
                min_jitter,
                max_jitter,
            },
            value_problem,
        ))
    }

    fn parse_number(field: &str, name: &str) -> Result<f64, String> {
        field
            .parse::<f64>()
            .map_err(|_| format!("{name} {field:?} isn't a number"))
    }
}
