use chrono::{DateTime, Utc};
use metric::{FieldMap, FieldValue, TagMap};

/// A named, tagged, timestamped event carrying one or more fields.
///
/// Measurements are built by the collection side with the consuming builder
/// methods below and are not modified afterwards. The exporter only ever
/// borrows them.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    name: String,
    tags: TagMap,
    fields: FieldMap,
    time: DateTime<Utc>,
}

impl Measurement {
    /// Make a new Measurement with no tags or fields, stamped with the
    /// current time.
    pub fn new<S>(name: S) -> Measurement
    where
        S: Into<String>,
    {
        Measurement {
            name: name.into(),
            tags: TagMap::default(),
            fields: FieldMap::default(),
            time: Utc::now(),
        }
    }

    /// Set the time of the Measurement
    pub fn time(mut self, time: DateTime<Utc>) -> Measurement {
        self.time = time;
        self
    }

    /// Insert a tag, replacing any previous value under the same key.
    pub fn overlay_tag<S>(mut self, key: S, val: S) -> Measurement
    where
        S: Into<String>,
    {
        self.tags.insert(key.into(), val.into());
        self
    }

    /// Insert a field, replacing any previous value under the same key.
    pub fn field<S, V>(mut self, key: S, val: V) -> Measurement
    where
        S: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), val.into());
        self
    }

    /// The name of the Measurement
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tags of the Measurement
    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// The fields of the Measurement, in key order
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// When the Measurement was taken
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }
}
