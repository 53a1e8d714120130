//! `metric` is the data model: the `Measurement` a collector hands us, the
//! `Datapoint` SignalFx receives, and the coercion between their values.

mod datapoint;
mod field;
mod measurement;
mod tagmap;

pub use self::datapoint::{Datapoint, MetricType, Value};
pub use self::field::{coerce, FieldValue};
pub use self::measurement::Measurement;

/// String to string map of tags, also the dimensions of a `Datapoint`.
pub type TagMap = self::tagmap::TagMap<String, String>;
/// Named field values of a `Measurement`.
pub type FieldMap = self::tagmap::TagMap<String, FieldValue>;
