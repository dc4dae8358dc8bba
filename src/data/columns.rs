//! Column Access Helpers
//! Presence checks and typed extraction of DataFrame columns.

use polars::prelude::*;
use std::collections::BTreeSet;

/// Check whether a column exists.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Check whether every listed column exists.
pub fn has_columns(df: &DataFrame, names: &[&str]) -> bool {
    names.iter().all(|name| has_column(df, name))
}

/// Get list of column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Get list of numeric column names.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Float32
                    | DataType::Float64
                    | DataType::Int8
                    | DataType::Int16
                    | DataType::Int32
                    | DataType::Int64
                    | DataType::UInt8
                    | DataType::UInt16
                    | DataType::UInt32
                    | DataType::UInt64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Read a column as nullable floats, casting numeric and textual columns.
pub fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let cast = df.column(name)?.cast(&DataType::Float64)?;
    let values = cast.f64()?.into_iter().collect();
    Ok(values)
}

/// Read a column as nullable strings. Integers render as `0`, `1`, ...
pub fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let cast = df.column(name)?.cast(&DataType::String)?;
    let values = cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Distinct non-null values in lexical order.
pub fn categories(values: &[Option<String>]) -> Vec<String> {
    values
        .iter()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
