//! Observation schema validation.
//!
//! A request body is either one record or a batch of records. Each record
//! must carry the six schema fields with values of an accepted kind. Valid
//! records are projected, in declared field order, into [`ValidatedRow`]s.

use serde_json::{Map, Value};
use windpower_common::{DateField, SchemaError};

/// Accepted value kinds for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A `YYYYMMDDHH` string. Timestamps are only accepted from typed
    /// callers through [`DateField::Timestamp`].
    Date,
    /// Any integer
    Integer,
    /// Any real number (integers included)
    Real,
}

impl FieldKind {
    /// Human-readable list of the accepted kinds.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Date => "string (YYYYMMDDHH)",
            FieldKind::Integer => "integer",
            FieldKind::Real => "real number",
        }
    }
}

/// Required fields in declared order.
pub const SCHEMA: [(&str, FieldKind); 6] = [
    ("date", FieldKind::Date),
    ("hors", FieldKind::Integer),
    ("u", FieldKind::Real),
    ("v", FieldKind::Real),
    ("ws", FieldKind::Real),
    ("wd", FieldKind::Real),
];

/// A request body classified as one record or a batch of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    Single(&'a Map<String, Value>),
    Batch(&'a [Value]),
}

impl<'a> Payload<'a> {
    /// Classify a JSON value: objects are single records, arrays are batches.
    pub fn from_value(value: &'a Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(map) => Ok(Payload::Single(map)),
            Value::Array(items) => Ok(Payload::Batch(items)),
            other => Err(SchemaError::NotARecord {
                found: describe(other),
            }),
        }
    }
}

impl<'a> TryFrom<&'a Value> for Payload<'a> {
    type Error = SchemaError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        Payload::from_value(value)
    }
}

/// One observation with its six fields in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub date: DateField,
    pub hors: i64,
    pub u: f64,
    pub v: f64,
    pub ws: f64,
    pub wd: f64,
}

impl ValidatedRow {
    pub fn new(date: impl Into<DateField>, hors: i64, u: f64, v: f64, ws: f64, wd: f64) -> Self {
        Self {
            date: date.into(),
            hors,
            u,
            v,
            ws,
            wd,
        }
    }

    /// The numeric fields after `date`, in schema order: `[hors, u, v, ws, wd]`.
    pub fn numeric_fields(&self) -> [f64; 5] {
        [self.hors as f64, self.u, self.v, self.ws, self.wd]
    }
}

/// Validator output: a single row or an order-preserving batch of rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedInput {
    Single(ValidatedRow),
    Batch(Vec<ValidatedRow>),
}

impl ValidatedInput {
    /// All rows, in input order.
    pub fn rows(&self) -> &[ValidatedRow] {
        match self {
            ValidatedInput::Single(row) => std::slice::from_ref(row),
            ValidatedInput::Batch(rows) => rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

/// Checks records against [`SCHEMA`].
///
/// Validation only reads the payload; the caller's values are never
/// rewritten.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a raw JSON body.
    pub fn validate_value(&self, value: &Value) -> Result<ValidatedInput, SchemaError> {
        self.validate(Payload::try_from(value)?)
    }

    /// Validate a classified payload.
    pub fn validate(&self, payload: Payload<'_>) -> Result<ValidatedInput, SchemaError> {
        match payload {
            Payload::Single(map) => self.validate_record(map).map(ValidatedInput::Single),
            Payload::Batch(items) => self.validate_batch(items).map(ValidatedInput::Batch),
        }
    }

    /// Validate one record, checking fields in declared order.
    pub fn validate_record(&self, record: &Map<String, Value>) -> Result<ValidatedRow, SchemaError> {
        let [date, hors, u, v, ws, wd] = SCHEMA;
        Ok(ValidatedRow {
            date: DateField::Text(extract(record, date, Value::as_str)?.to_string()),
            hors: extract(record, hors, Value::as_i64)?,
            u: extract(record, u, Value::as_f64)?,
            v: extract(record, v, Value::as_f64)?,
            ws: extract(record, ws, Value::as_f64)?,
            wd: extract(record, wd, Value::as_f64)?,
        })
    }

    fn validate_batch(&self, items: &[Value]) -> Result<Vec<ValidatedRow>, SchemaError> {
        if items.is_empty() {
            return Err(SchemaError::EmptyBatch);
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(map) => self.validate_record(map).map_err(|e| e.in_batch(index)),
                other => Err(SchemaError::NotARecord {
                    found: describe(other),
                }
                .in_batch(index)),
            })
            .collect()
    }
}

/// Read one field, reporting it as missing or of the wrong kind.
fn extract<'a, T>(
    record: &'a Map<String, Value>,
    (field, kind): (&'static str, FieldKind),
    get: impl FnOnce(&'a Value) -> Option<T>,
) -> Result<T, SchemaError> {
    let value = record.get(field).ok_or(SchemaError::MissingField { field })?;
    get(value).ok_or_else(|| SchemaError::WrongKind {
        field,
        found: value.to_string(),
        expected: kind.expected(),
    })
}

/// Short description of a JSON value's kind for error messages.
fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("{} {}", kind, value)
}
