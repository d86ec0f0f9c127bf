use serde::{Deserialize, Deserializer, Serialize};

use crate::space::RealPoint;

/// A stream element: coordinates and an optional ground-truth label.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    pub point: RealPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Record {
    pub fn new(point: RealPoint, label: impl Into<String>) -> Self {
        Self {
            point,
            label: Some(label.into()),
        }
    }

    pub fn unlabeled(point: RealPoint) -> Self {
        Self { point, label: None }
    }
}

/// Accepted line formats: a bare coordinate array or a labeled object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Bare(RealPoint),
    Labeled {
        point: RealPoint,
        #[serde(default)]
        label: Option<RawLabel>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<RawLabel> for String {
    fn from(label: RawLabel) -> Self {
        match label {
            RawLabel::Text(s) => s,
            RawLabel::Integer(i) => i.to_string(),
            RawLabel::Real(x) => x.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawRecord::deserialize(deserializer)? {
            RawRecord::Bare(point) => Record::unlabeled(point),
            RawRecord::Labeled { point, label } => Record {
                point,
                label: label.map(String::from),
            },
        })
    }
}
