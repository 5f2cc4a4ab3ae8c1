//! Common test fixtures for wind power forecast tests.
//!
//! This module provides pre-defined observation records that represent
//! common scenarios, including the reference cases the production model is
//! checked against.

use serde_json::{json, Value};

/// A reference observation and the prediction the production model gives.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceCase {
    pub date: &'static str,
    pub hors: i64,
    pub u: f64,
    pub v: f64,
    pub ws: f64,
    pub wd: f64,
    pub expected: f64,
}

impl ReferenceCase {
    /// The observation as a JSON record.
    pub fn record(&self) -> Value {
        json!({
            "date": self.date,
            "hors": self.hors,
            "u": self.u,
            "v": self.v,
            "ws": self.ws,
            "wd": self.wd,
        })
    }
}

/// Known-good predictions of the production model.
pub const REFERENCE_CASES: [ReferenceCase; 5] = [
    ReferenceCase {
        date: "2009070100",
        hors: 1,
        u: 2.34,
        v: -0.79,
        ws: 2.47,
        wd: 108.68,
        expected: 0.0811,
    },
    ReferenceCase {
        date: "2009070800",
        hors: 1,
        u: 1.34,
        v: -0.79,
        ws: 3.47,
        wd: 12.68,
        expected: 0.1856,
    },
    ReferenceCase {
        date: "2009070400",
        hors: 1,
        u: 4.21,
        v: -1.45,
        ws: 4.47,
        wd: 1.68,
        expected: 0.3046,
    },
    ReferenceCase {
        date: "2009070120",
        hors: 1,
        u: 2.1,
        v: 0.6,
        ws: 2.47,
        wd: 311.3,
        expected: 0.1031,
    },
    ReferenceCase {
        date: "2009070110",
        hors: 1,
        u: 9.34,
        v: -1.1,
        ws: 2.17,
        wd: 9.68,
        expected: 0.1934,
    },
];

/// A single well-formed record.
pub fn valid_record() -> Value {
    REFERENCE_CASES[0].record()
}

/// A batch of well-formed records.
pub fn valid_batch() -> Value {
    Value::Array(REFERENCE_CASES.iter().map(ReferenceCase::record).collect())
}

/// Records that must be rejected, paired with the field they fail on.
pub fn invalid_records() -> Vec<(&'static str, Value)> {
    vec![
        (
            "date",
            json!({
                "date": 91919191,
                "u": "fsdkfjh",
                "v": 1029,
                "wd": -100,
                "ws": 0.00123123
            }),
        ),
        (
            "u",
            json!({
                "date": "2009070100",
                "hors": 1,
                "u": "should be float",
                "v": 1029,
                "wd": 0.4,
                "ws": 0.00123123
            }),
        ),
        (
            "v",
            json!({
                "date": "2009070100",
                "hors": 1,
                "u": 0.1,
                "v": "should be float",
                "wd": 0.4,
                "ws": 0.0123
            }),
        ),
        (
            "wd",
            json!({
                "date": "2009070100",
                "hors": 1,
                "u": 0.1,
                "v": 0.22,
                "wd": "should be float",
                "ws": 0.0123
            }),
        ),
        (
            "ws",
            json!({
                "date": "2009070100",
                "hors": 1,
                "u": 0.1,
                "v": 0.3,
                "wd": 0.4,
                "ws": "should be float"
            }),
        ),
        (
            "hors",
            json!({
                "date": "2009070100",
                "u": 0.1,
                "v": 0.3,
                "wd": 0.4,
                "ws": 1.2
            }),
        ),
    ]
}
