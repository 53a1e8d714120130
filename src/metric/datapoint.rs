use chrono::{DateTime, Utc};
use metric::TagMap;
use serde::ser::{Serialize, Serializer};
use std::fmt;

/// The numeric value carried by a `Datapoint`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// Integral value
    Int(i64),
    /// Floating point value
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Value::Int(i) => serializer.serialize_i64(i),
            Value::Float(x) => serializer.serialize_f64(x),
        }
    }
}

/// How the ingestion side should interpret a series of datapoints. Every
/// datapoint the exporter makes is a gauge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetricType {
    /// An instantaneous reading
    Gauge,
}

impl MetricType {
    /// The key this type is filed under in a SignalFx datapoint document.
    pub fn as_str(&self) -> &'static str {
        match *self {
            MetricType::Gauge => "gauge",
        }
    }
}

/// A single named, single-valued point bound for SignalFx.
///
/// Datapoints only live for the duration of one write. They are built from a
/// `Measurement` by the exporter and dropped once the sink call returns.
#[derive(Clone, Debug, PartialEq)]
pub struct Datapoint {
    /// The metric name
    pub metric: String,
    /// Dimensions, SignalFx's name for tags
    pub dimensions: TagMap,
    /// The value
    pub value: Value,
    /// The interpretation of the value
    pub kind: MetricType,
    /// When the value was observed
    pub timestamp: DateTime<Utc>,
}

impl Datapoint {
    /// Create a new Datapoint
    pub fn new<S>(
        metric: S,
        dimensions: TagMap,
        value: Value,
        kind: MetricType,
        timestamp: DateTime<Utc>,
    ) -> Datapoint
    where
        S: Into<String>,
    {
        Datapoint {
            metric: metric.into(),
            dimensions: dimensions,
            value: value,
            kind: kind,
            timestamp: timestamp,
        }
    }
}

impl fmt::Display for Datapoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.metric)?;
        for &(ref k, ref v) in self.dimensions.iter() {
            write!(f, " {}={}", k, v)?;
        }
        write!(
            f,
            " {} {} {}",
            self.kind.as_str(),
            self.value,
            self.timestamp.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn value_display() {
        assert_eq!("10", Value::Int(10).to_string());
        assert_eq!("-3", Value::Int(-3).to_string());
        assert_eq!("4", Value::Float(4.0).to_string());
        assert_eq!("0.25", Value::Float(0.25).to_string());
    }

    #[test]
    fn datapoint_display() {
        let mut dims = TagMap::default();
        dims.insert("host".into(), "h1".into());
        let dp = Datapoint::new(
            "cpu.idle",
            dims,
            Value::Float(97.5),
            MetricType::Gauge,
            Utc.with_ymd_and_hms(2009, 11, 10, 23, 0, 0).unwrap(),
        );
        assert_eq!(
            "cpu.idle host=h1 gauge 97.5 2009-11-10T23:00:00+00:00",
            dp.to_string()
        );
    }
}
