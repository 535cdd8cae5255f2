// Copyright (c) 2024 Mike Tsao

use super::Keyframe;
use crate::error::Diagnostic;
use log::{debug, warn};

/// The result of [CurveParser::parse()].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedCurve {
    /// Keyframes in the order their lines appeared in the source.
    pub keyframes: Vec<Keyframe>,
    /// One entry for each non-blank line that didn't yield a keyframe.
    pub diagnostics: Vec<Diagnostic>,
}

/// Reads RTPC curve files.
///
/// A curve file has one keyframe per line, with fields separated by an
/// underscore: `time_value`, for example `0.25_-3.5`. Fields after the second
/// are ignored. Numbers use `.` as the decimal separator regardless of locale.
///
/// Parsing never fails. Blank lines are ignored, and malformed lines are
/// reported as [Diagnostic]s and skipped.
#[derive(Clone, Copy, Debug)]
pub struct CurveParser {
    delimiter: char,
    is_verbose: bool,
}
impl Default for CurveParser {
    fn default() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER,
            is_verbose: false,
        }
    }
}
impl CurveParser {
    /// Separates the time and value fields.
    pub const DEFAULT_DELIMITER: char = '_';

    /// Creates a parser with a custom field delimiter. `is_verbose` traces
    /// every line at debug level.
    pub fn new_with(delimiter: char, is_verbose: bool) -> Self {
        Self {
            delimiter,
            is_verbose,
        }
    }

    #[allow(missing_docs)]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parses `text` into keyframes.
    pub fn parse(&self, text: &str) -> ParsedCurve {
        let mut parsed = ParsedCurve::default();
        for (index, line) in text.split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if self.is_verbose {
                debug!("Reading line: {}", line.trim());
            }
            match self.parse_line(line) {
                Ok(keyframe) => {
                    if self.is_verbose {
                        debug!(
                            "Loaded curve line - time: {}, value: {}",
                            keyframe.time, keyframe.value
                        );
                    }
                    parsed.keyframes.push(keyframe);
                }
                Err(reason) => {
                    let diagnostic = Diagnostic::new(index + 1, line, reason);
                    warn!("Skipping curve {diagnostic}");
                    parsed.diagnostics.push(diagnostic);
                }
            }
        }
        if self.is_verbose {
            debug!("Total lines loaded: {}", parsed.keyframes.len());
        }
        parsed
    }

    fn parse_line(&self, line: &str) -> Result<Keyframe, String> {
        let mut fields = line.trim().split(self.delimiter);
        let (Some(time), Some(value)) = (fields.next(), fields.next()) else {
            return Err(format!(
                "expected at least 2 fields separated by '{}'",
                self.delimiter
            ));
        };
        match (time.trim().parse::<f64>(), value.trim().parse::<f64>()) {
            (Ok(time), Ok(value)) => Ok(Keyframe { time, value }),
            _ => Err(format!(
                "failed to parse values - time: {time:?}, value: {value:?}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_lines_become_keyframes_in_order() {
        let parsed = CurveParser::default().parse("0_0\n0.5_1.25\n1_-3\n");
        assert_eq!(
            parsed.keyframes,
            vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.5, 1.25),
                Keyframe::new(1.0, -3.0)
            ]
        );
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped_with_diagnostics() {
        let text = "0_1\njunk\n1_2\n2_abc\n\n   \n3_4_extra\nx_5\n4_5\r\n";
        let parsed = CurveParser::default().parse(text);
        assert_eq!(
            parsed.keyframes,
            vec![
                Keyframe::new(0.0, 1.0),
                Keyframe::new(1.0, 2.0),
                Keyframe::new(3.0, 4.0),
                Keyframe::new(4.0, 5.0)
            ],
            "good lines survive, in source order, and extra fields are ignored"
        );
        let bad_lines: Vec<usize> = parsed.diagnostics.iter().map(|d| d.line_number).collect();
        assert_eq!(bad_lines, vec![2, 4, 8], "blank lines aren't diagnostics");
    }

    #[test]
    fn order_is_preserved_even_when_time_goes_backward() {
        let parsed = CurveParser::default().parse("2_1\n1_2\n0_3");
        let times: Vec<f64> = parsed.keyframes.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let parsed = CurveParser::default().parse("");
        assert!(parsed.keyframes.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let parsed = CurveParser::new_with(',', false).parse("0,1\n1_2");
        assert_eq!(parsed.keyframes, vec![Keyframe::new(0.0, 1.0)]);
        assert_eq!(parsed.diagnostics.len(), 1);
    }
}
