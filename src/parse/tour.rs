//! Tour solution reader (JSON)

use std::io::{self, Read};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use super::{open_input, origin_of};
use crate::record::TourSolution;
use crate::{Error, Result};

/// Path argument that selects standard input.
pub const STDIN_PATH: &str = "-";

fn required<'a>(object: &'a Map<String, Value>, origin: &str, key: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| Error::missing_key(origin, key))
}

fn number(value: &Value, origin: &str, key: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::malformed_key(origin, key, value.to_string()))
}

/// Parse a tour solution object `{"N": .., "cost": .., "tour": [..], "length": ..}`.
///
/// `N`, `cost` and `tour` are required and checked one by one; `length` is
/// optional and may be `null`. Whether `tour` is a permutation of `0..N` is
/// left to [`crate::layout::TourLayout::new`].
///
/// # Errors
///
/// - [`Error::Json`] if the input is not valid JSON
/// - [`Error::Schema`] if the top level is not an object or a required key
///   is absent
/// - [`Error::MalformedValue`] if `N` is not a non-negative integer, `cost`
///   or `length` is not a number, `length` is negative, or a tour entry is
///   not an integer
pub fn read_tour<R: Read>(reader: R, origin: &str) -> Result<TourSolution> {
    let value: Value = serde_json::from_reader(reader)?;
    let object = value.as_object().ok_or_else(|| Error::Schema {
        origin: origin.to_string(),
        detail: "expected a JSON object at the top level".to_string(),
    })?;

    let n_value = required(object, origin, "N")?;
    let node_count = n_value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| Error::malformed_key(origin, "N", n_value.to_string()))?;

    let cost = number(required(object, origin, "cost")?, origin, "cost")?;

    let tour = required(object, origin, "tour")?
        .as_array()
        .ok_or_else(|| Error::malformed_key(origin, "tour", "expected a list of node indices"))?
        .iter()
        .enumerate()
        .map(|(k, v)| {
            v.as_i64()
                .ok_or_else(|| Error::malformed_key(origin, &format!("tour[{k}]"), v.to_string()))
        })
        .collect::<Result<Vec<i64>>>()?;

    let length = match object.get("length") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let length = number(v, origin, "length")?;
            if length < 0.0 {
                return Err(Error::malformed_key(origin, "length", v.to_string()));
            }
            Some(length)
        }
    };

    debug!(origin, node_count, tour_len = tour.len(), "parsed tour solution");
    Ok(TourSolution::new(node_count, cost, tour, length))
}

/// [`read_tour`] from a file path, or from stdin when `path` is `-`.
///
/// # Errors
///
/// [`Error::FileNotFound`] if `path` is neither `-` nor a file, otherwise as
/// [`read_tour`].
pub fn load_tour(path: &Path) -> Result<TourSolution> {
    if path.as_os_str() == STDIN_PATH {
        return read_tour(io::stdin().lock(), "<stdin>");
    }
    read_tour(open_input(path)?, &origin_of(path))
}
