//! The wire protocols sfx-export speaks. `influx` is what we read, `signalfx`
//! is what we write.

pub mod influx;
pub mod signalfx;
