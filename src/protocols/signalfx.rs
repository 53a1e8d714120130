//! The SignalFx v2 JSON datapoint document.
//!
//! Datapoints are grouped under their metric type:
//!
//! ```text
//! {"gauge":[{"metric":"m","value":1,"dimensions":{"k":"v"},"timestamp":1257894000000}]}
//! ```
//!
//! Only types with at least one datapoint appear. The timestamp is
//! milliseconds since the Unix epoch.

use metric::{Datapoint, TagMap, Value};
use serde_json;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct JsonDatapoint<'a> {
    metric: &'a str,
    value: Value,
    dimensions: &'a TagMap,
    timestamp: i64,
}

/// Encode `points` as a SignalFx v2 JSON datapoint document. The relative
/// order of datapoints of the same type is kept.
pub fn encode(points: &[Datapoint]) -> Result<Vec<u8>, serde_json::Error> {
    let mut doc: BTreeMap<&'static str, Vec<JsonDatapoint>> = BTreeMap::new();
    for dp in points {
        doc.entry(dp.kind.as_str())
            .or_insert_with(Vec::new)
            .push(JsonDatapoint {
                metric: &dp.metric,
                value: dp.value,
                dimensions: &dp.dimensions,
                timestamp: dp.timestamp.timestamp_millis(),
            });
    }
    serde_json::to_vec(&doc)
}
