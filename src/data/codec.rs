//! Split Codec Module
//! Encodes a table as split-oriented JSON: column names, index values and a
//! row-major 2D array of values, plus optional dtype hints.

use super::table::{Column, ColumnData, DType, Index, Table};
use super::DataError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
struct SplitFrame {
    columns: Vec<String>,
    index: Vec<Value>,
    data: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dtypes: Option<Vec<DType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_dtype: Option<DType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_name: Option<String>,
}

/// Serialize a table to split JSON.
pub fn encode_table(table: &Table) -> Result<String, DataError> {
    let columns = table.columns();
    let data = (0..table.height())
        .map(|row| columns.iter().map(|c| value_at(&c.data, row)).collect())
        .collect();
    let index = &table.index().data;

    let frame = SplitFrame {
        columns: table.column_names(),
        index: (0..index.len()).map(|row| value_at(index, row)).collect(),
        data,
        dtypes: Some(columns.iter().map(|c| c.data.dtype()).collect()),
        index_dtype: Some(index.dtype()),
        index_name: table.index().name.clone(),
    };

    Ok(serde_json::to_string(&frame)?)
}

/// Parse split JSON back into a table.
///
/// Column types come from the `dtypes` hint when present, otherwise they are
/// inferred from the JSON values.
pub fn decode_table(json: &str) -> Result<Table, DataError> {
    let frame: SplitFrame = serde_json::from_str(json)?;
    let rows = frame.data.len();

    if frame.index.len() != rows {
        return Err(DataError::FormatError(format!(
            "index has {} labels for {} rows",
            frame.index.len(),
            rows
        )));
    }
    if let Some(row) = frame.data.iter().position(|r| r.len() != frame.columns.len()) {
        return Err(DataError::FormatError(format!(
            "row {} has {} values, expected {}",
            row,
            frame.data[row].len(),
            frame.columns.len()
        )));
    }
    if let Some(dtypes) = &frame.dtypes {
        if dtypes.len() != frame.columns.len() {
            return Err(DataError::FormatError(format!(
                "{} dtypes given for {} columns",
                dtypes.len(),
                frame.columns.len()
            )));
        }
    }

    let mut columns = Vec::with_capacity(frame.columns.len());
    for (j, name) in frame.columns.iter().enumerate() {
        let values: Vec<&Value> = frame.data.iter().map(|r| &r[j]).collect();
        let dtype = match &frame.dtypes {
            Some(dtypes) => dtypes[j],
            None => infer_dtype(&values, name)?,
        };
        columns.push(Column::new(name.clone(), decode_values(&values, dtype, name)?));
    }

    let labels: Vec<&Value> = frame.index.iter().collect();
    let index_dtype = match frame.index_dtype {
        Some(dtype) => dtype,
        None => infer_dtype(&labels, "index")?,
    };
    let index = Index {
        name: frame.index_name,
        data: decode_values(&labels, index_dtype, "index")?,
    };

    Table::with_index(index, columns)
}

fn value_at(data: &ColumnData, row: usize) -> Value {
    let value = match data {
        ColumnData::Int(v) | ColumnData::Timestamp(v) => v[row].map(Value::from),
        ColumnData::Float(v) => v[row].map(float_value),
        ColumnData::Bool(v) => v[row].map(Value::from),
        ColumnData::Str(v) => v[row].clone().map(Value::from),
    };
    value.unwrap_or(Value::Null)
}

const POS_INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

/// JSON numbers cannot hold infinities, so they travel as strings.
fn float_value(x: f64) -> Value {
    if x == f64::INFINITY {
        Value::from(POS_INFINITY)
    } else if x == f64::NEG_INFINITY {
        Value::from(NEG_INFINITY)
    } else {
        Value::from(x)
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value.as_str() {
        Some(POS_INFINITY) => Some(f64::INFINITY),
        Some(NEG_INFINITY) => Some(f64::NEG_INFINITY),
        Some(_) => None,
        None => value.as_f64(),
    }
}

fn kind_of(value: &Value, name: &str) -> Result<Option<DType>, DataError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(_) => Ok(Some(DType::Bool)),
        Value::Number(n) if n.is_i64() => Ok(Some(DType::Int64)),
        Value::Number(_) => Ok(Some(DType::Float64)),
        Value::String(_) => Ok(Some(DType::Str)),
        _ => Err(DataError::FormatError(format!(
            "column '{}' holds a nested value",
            name
        ))),
    }
}

fn infer_dtype(values: &[&Value], name: &str) -> Result<DType, DataError> {
    let mut inferred: Option<DType> = None;

    for value in values {
        let Some(kind) = kind_of(value, name)? else {
            continue;
        };
        inferred = match (inferred, kind) {
            (None, k) => Some(k),
            (Some(a), b) if a == b => Some(a),
            (Some(DType::Int64), DType::Float64) | (Some(DType::Float64), DType::Int64) => {
                Some(DType::Float64)
            }
            (Some(a), b) => {
                return Err(DataError::FormatError(format!(
                    "column '{}' mixes {:?} and {:?} values",
                    name, a, b
                )))
            }
        };
    }

    Ok(inferred.unwrap_or(DType::Str))
}

fn collect<T>(
    values: &[&Value],
    name: &str,
    dtype: DType,
    convert: impl Fn(&Value) -> Option<T>,
) -> Result<Vec<Option<T>>, DataError> {
    values
        .iter()
        .map(|value| match value {
            Value::Null => Ok(None),
            v => convert(*v).map(Some).ok_or_else(|| {
                DataError::FormatError(format!(
                    "column '{}' expects {:?}, found {}",
                    name, dtype, v
                ))
            }),
        })
        .collect()
}

fn decode_values(values: &[&Value], dtype: DType, name: &str) -> Result<ColumnData, DataError> {
    Ok(match dtype {
        DType::Int64 => ColumnData::Int(collect(values, name, dtype, Value::as_i64)?),
        DType::Timestamp => ColumnData::Timestamp(collect(values, name, dtype, Value::as_i64)?),
        DType::Float64 => ColumnData::Float(collect(values, name, dtype, as_float)?),
        DType::Bool => ColumnData::Bool(collect(values, name, dtype, Value::as_bool)?),
        DType::Str => ColumnData::Str(collect(values, name, dtype, |v| {
            v.as_str().map(str::to_string)
        })?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let index = Index {
            name: Some("Date".to_string()),
            data: ColumnData::Timestamp(vec![Some(1_577_836_800_000), Some(1_577_923_200_000)]),
        };
        Table::with_index(
            index,
            vec![
                Column::new("Value", ColumnData::Float(vec![Some(1.5), None])),
                Column::new("Count", ColumnData::Int(vec![Some(3), Some(-4)])),
                Column::new(
                    "Label",
                    ColumnData::Str(vec![Some("a".to_string()), None]),
                ),
                Column::new("Flag", ColumnData::Bool(vec![Some(true), Some(false)])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn encoded_form_is_split_oriented() {
        let json = encode_table(&sample()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value["columns"],
            serde_json::json!(["Value", "Count", "Label", "Flag"])
        );
        assert_eq!(
            value["index"],
            serde_json::json!([1_577_836_800_000_i64, 1_577_923_200_000_i64])
        );
        assert_eq!(value["data"][0], serde_json::json!([1.5, 3, "a", true]));
        assert_eq!(value["data"][1], serde_json::json!([null, -4, null, false]));
    }

    #[test]
    fn decode_restores_types_from_hints() {
        let table = sample();
        let decoded = decode_table(&encode_table(&table).unwrap()).unwrap();
        assert_eq!(decoded, table);
    }

    #[test]
    fn decode_infers_types_without_hints() {
        let json = r#"{
            "columns": ["A", "B", "C"],
            "index": [0, 1, 2],
            "data": [[1, 1.5, "x"], [2, 2, null], [null, 3, "z"]]
        }"#;
        let table = decode_table(json).unwrap();

        assert_eq!(
            table.column("A").unwrap().data,
            ColumnData::Int(vec![Some(1), Some(2), None])
        );
        assert_eq!(
            table.column("B").unwrap().data,
            ColumnData::Float(vec![Some(1.5), Some(2.0), Some(3.0)])
        );
        assert_eq!(table.column("C").unwrap().data.dtype(), DType::Str);
        assert_eq!(table.index().data, ColumnData::range(3));
    }

    #[test]
    fn infinities_survive_a_round_trip() {
        let table = Table::new(vec![Column::new(
            "v",
            ColumnData::Float(vec![Some(1.5), Some(f64::INFINITY), Some(f64::NEG_INFINITY), None]),
        )])
        .unwrap();

        let json = encode_table(&table).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["data"],
            serde_json::json!([[1.5], ["Infinity"], ["-Infinity"], [null]])
        );
        assert_eq!(decode_table(&json).unwrap(), table);
    }

    #[test]
    fn decode_rejects_other_strings_in_float_columns() {
        let json = r#"{"columns": ["A"], "index": [0], "data": [["NaN"]], "dtypes": ["float64"]}"#;
        assert!(matches!(decode_table(json), Err(DataError::FormatError(_))));
    }

    #[test]
    fn decode_rejects_ragged_rows() {
        let json = r#"{"columns": ["A", "B"], "index": [0], "data": [[1]]}"#;
        assert!(matches!(decode_table(json), Err(DataError::FormatError(_))));
    }

    #[test]
    fn decode_rejects_index_length_mismatch() {
        let json = r#"{"columns": ["A"], "index": [0, 1], "data": [[1]]}"#;
        assert!(matches!(decode_table(json), Err(DataError::FormatError(_))));
    }

    #[test]
    fn decode_rejects_mixed_columns() {
        let json = r#"{"columns": ["A"], "index": [0, 1], "data": [[1], ["one"]]}"#;
        assert!(matches!(decode_table(json), Err(DataError::FormatError(_))));
    }

    #[test]
    fn decode_rejects_values_contradicting_hint() {
        let json = r#"{"columns": ["A"], "index": [0], "data": [["x"]], "dtypes": ["int64"]}"#;
        assert!(matches!(decode_table(json), Err(DataError::FormatError(_))));
    }

    #[test]
    fn decode_rejects_non_table_json() {
        assert!(matches!(
            decode_table("[1, 2, 3]"),
            Err(DataError::FormatError(_))
        ));
        assert!(matches!(
            decode_table("not json"),
            Err(DataError::FormatError(_))
        ));
    }
}
