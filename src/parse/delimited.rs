//! Delimited-text readers (convergence tables, L-BFGS histories, regression
//! data, coefficient files)

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::{open_input, origin_of, parse_cell};
use crate::record::{HistoryRecord, Observation, PlaneFit, RegressionDataset, ResultRecord};
use crate::{Error, Result};

/// Columns a convergence table must carry, in canonical order.
pub const CONVERGENCE_COLUMNS: [&str; 4] = ["method", "lr", "iter", "fval"];

const HISTORY_FIELDS: [&str; 3] = ["iteration", "loss", "grad_norm"];

/// 1-based source line of a record, falling back to its enumeration index.
fn line_of(record: &StringRecord, fallback: usize) -> usize {
    record
        .position()
        .and_then(|p| usize::try_from(p.line()).ok())
        .unwrap_or(fallback)
}

fn comma_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Parse a convergence table with header `method,lr,iter,fval` (any column
/// order, extra columns ignored).
///
/// # Errors
///
/// - [`Error::EmptyInput`] if the input has no header or no data rows
/// - [`Error::Schema`] naming every required column that is absent
/// - [`Error::MalformedValue`] naming the row and column of a bad number
pub fn read_convergence<R: Read>(reader: R, origin: &str) -> Result<Vec<ResultRecord>> {
    let mut reader = comma_reader(reader);
    let headers = reader.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(Error::EmptyInput {
            origin: origin.to_string(),
        });
    }

    let missing: Vec<&str> = CONVERGENCE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        return Err(Error::missing_column(origin, &missing.join("`, `")));
    }

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::missing_column(origin, name))
    };
    let method_idx = column("method")?;
    let lr_idx = column("lr")?;
    let iter_idx = column("iter")?;
    let fval_idx = column("fval")?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let line = line_of(&row, i + 2);
        let method = row.get(method_idx).unwrap_or("").trim();
        if method.is_empty() {
            return Err(Error::malformed_field(origin, line, "method", method));
        }
        let lr: f64 = parse_cell(origin, line, "lr", row.get(lr_idx))?;
        let iter: u64 = parse_cell(origin, line, "iter", row.get(iter_idx))?;
        let fval: f64 = parse_cell(origin, line, "fval", row.get(fval_idx))?;
        records.push(ResultRecord::new(method, lr, iter, fval));
    }

    if records.is_empty() {
        return Err(Error::EmptyInput {
            origin: origin.to_string(),
        });
    }
    debug!(origin, rows = records.len(), "parsed convergence table");
    Ok(records)
}

/// Parse an L-BFGS history. The first row is skipped without checking its
/// names; every other row must be `iteration,loss,grad_norm`.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if there are no data rows
/// - [`Error::MalformedValue`] for a row without exactly three fields or
///   with a non-numeric field
pub fn read_history<R: Read>(reader: R, origin: &str) -> Result<Vec<HistoryRecord>> {
    let mut reader = comma_reader(reader);
    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let line = line_of(&row, i + 2);
        if row.len() != HISTORY_FIELDS.len() {
            return Err(Error::MalformedValue {
                origin: origin.to_string(),
                location: format!("row {line} (expected {} fields)", HISTORY_FIELDS.len()),
                value: row.iter().collect::<Vec<_>>().join(","),
            });
        }
        let iteration: u64 = parse_cell(origin, line, HISTORY_FIELDS[0], row.get(0))?;
        let loss: f64 = parse_cell(origin, line, HISTORY_FIELDS[1], row.get(1))?;
        let grad_norm: f64 = parse_cell(origin, line, HISTORY_FIELDS[2], row.get(2))?;
        records.push(HistoryRecord::new(iteration, loss, grad_norm));
    }

    if records.is_empty() {
        return Err(Error::EmptyInput {
            origin: origin.to_string(),
        });
    }
    debug!(origin, rows = records.len(), "parsed L-BFGS history");
    Ok(records)
}

fn is_numeric_row(row: &StringRecord) -> bool {
    row.iter().take(3).all(|f| f.trim().parse::<f64>().is_ok())
}

/// Parse tab-separated `x1\tx2\ty` observations.
///
/// The first row is treated as a header when its first three fields are not
/// all numeric. Rows with fewer than three fields are skipped silently.
/// An input with no observations parses to an empty dataset; callers that
/// need a range reject it.
///
/// # Errors
///
/// Returns [`Error::MalformedValue`] for a non-numeric field in a data row.
pub fn read_regression<R: Read>(reader: R, origin: &str) -> Result<RegressionDataset> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut observations = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        if row.len() < 3 {
            continue;
        }
        if i == 0 && !is_numeric_row(&row) {
            debug!(origin, "skipping regression header row");
            continue;
        }
        let line = line_of(&row, i + 1);
        let x1 = parse_cell(origin, line, "x1", row.get(0))?;
        let x2 = parse_cell(origin, line, "x2", row.get(1))?;
        let y = parse_cell(origin, line, "y", row.get(2))?;
        observations.push(Observation::new(x1, x2, y));
    }

    debug!(origin, rows = observations.len(), "parsed regression dataset");
    Ok(RegressionDataset::new(observations))
}

/// Parse a coefficient file: the first two non-blank lines are `beta0` and
/// `beta1`; anything after them is ignored.
///
/// # Errors
///
/// - [`Error::Schema`] if fewer than two non-blank lines are present
/// - [`Error::MalformedValue`] if either coefficient is not a number
pub fn read_plane_fit<R: Read>(mut reader: R, origin: &str) -> Result<PlaneFit> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();

    match lines.as_slice() {
        [(row0, beta0), (row1, beta1), ..] => Ok(PlaneFit::new(
            parse_cell(origin, *row0, "beta0", Some(beta0))?,
            parse_cell(origin, *row1, "beta1", Some(beta1))?,
        )),
        _ => Err(Error::Schema {
            origin: origin.to_string(),
            detail: format!(
                "expected at least two coefficient lines (beta0 and beta1), got {}",
                lines.len()
            ),
        }),
    }
}

/// [`read_convergence`] from a file path.
///
/// # Errors
///
/// [`Error::FileNotFound`] if `path` is not a file, otherwise as
/// [`read_convergence`].
pub fn load_convergence(path: &Path) -> Result<Vec<ResultRecord>> {
    read_convergence(open_input(path)?, &origin_of(path))
}

/// [`read_history`] from a file path.
///
/// # Errors
///
/// [`Error::FileNotFound`] if `path` is not a file, otherwise as
/// [`read_history`].
pub fn load_history(path: &Path) -> Result<Vec<HistoryRecord>> {
    read_history(open_input(path)?, &origin_of(path))
}

/// [`read_regression`] from a file path.
///
/// # Errors
///
/// [`Error::FileNotFound`] if `path` is not a file, otherwise as
/// [`read_regression`].
pub fn load_regression(path: &Path) -> Result<RegressionDataset> {
    read_regression(open_input(path)?, &origin_of(path))
}

/// [`read_plane_fit`] from a file path.
///
/// # Errors
///
/// [`Error::FileNotFound`] if `path` is not a file, otherwise as
/// [`read_plane_fit`].
pub fn load_plane_fit(path: &Path) -> Result<PlaneFit> {
    read_plane_fit(open_input(path)?, &origin_of(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convergence_any_column_order() {
        let csv = "iter,fval,method,lr\n0,4.5,GD,0.1\n1,2.0,GD,0.1\n";
        let records = read_convergence(csv.as_bytes(), "mem").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].method(), "GD");
        assert_eq!(records[1].iteration(), 1);
        assert!((records[1].value() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convergence_missing_columns_listed() {
        let csv = "method,iter\nGD,0\n";
        let err = read_convergence(csv.as_bytes(), "conv.csv").unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, Error::Schema { .. }));
        assert!(msg.contains("lr"));
        assert!(msg.contains("fval"));
        assert!(msg.contains("conv.csv"));
    }

    #[test]
    fn test_convergence_header_only_is_empty() {
        let err = read_convergence("method,lr,iter,fval\n".as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, Error::EmptyInput { .. }));
    }

    #[test]
    fn test_convergence_empty_file_is_empty() {
        let err = read_convergence("".as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, Error::EmptyInput { .. }));
    }

    #[test]
    fn test_convergence_malformed_names_row_and_field() {
        let csv = "method,lr,iter,fval\nGD,0.1,0,1.0\nGD,0.1,1,abc\n";
        let err = read_convergence(csv.as_bytes(), "mem").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 3"), "{msg}");
        assert!(msg.contains("fval"), "{msg}");
        assert!(msg.contains("abc"), "{msg}");
    }

    #[test]
    fn test_history_skips_first_row_without_name_check() {
        let csv = "a,b,c\n0,10.0,3.0\n1,5.0,1.5\n";
        let records = read_history(csv.as_bytes(), "mem").unwrap();
        assert_eq!(records, vec![
            HistoryRecord::new(0, 10.0, 3.0),
            HistoryRecord::new(1, 5.0, 1.5),
        ]);
    }

    #[test]
    fn test_history_wrong_field_count() {
        let csv = "iter,loss,grad_norm\n0,10.0\n";
        let err = read_history(csv.as_bytes(), "mem").unwrap_err();
        assert!(matches!(err, Error::MalformedValue { .. }));
    }

    #[test]
    fn test_regression_header_detected_and_short_rows_skipped() {
        let tsv = "x1\tx2\ty\n1\t2\t3\n4\t5\n6\t7\t8\n";
        let data = read_regression(tsv.as_bytes(), "mem").unwrap();
        assert_eq!(data.observations(), &[
            Observation::new(1.0, 2.0, 3.0),
            Observation::new(6.0, 7.0, 8.0),
        ]);
    }

    #[test]
    fn test_regression_without_header_keeps_first_row() {
        let tsv = "1\t2\t3\n4\t5\t6\n";
        let data = read_regression(tsv.as_bytes(), "mem").unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_regression_malformed_data_row() {
        let tsv = "1\t2\t3\n4\tfive\t6\n";
        let err = read_regression(tsv.as_bytes(), "mem").unwrap_err();
        assert!(err.to_string().contains("x2"));
    }

    #[test]
    fn test_plane_fit_skips_blank_lines() {
        let fit = read_plane_fit("\n 1.5 \n\n-0.25\n".as_bytes(), "beta.txt").unwrap();
        assert_eq!(fit, PlaneFit::new(1.5, -0.25));
    }

    #[test]
    fn test_plane_fit_needs_two_lines() {
        let err = read_plane_fit("1.5\n".as_bytes(), "beta.txt").unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
        assert!(err.to_string().contains("got 1"));
    }
}
