//! sfx-export ships locally collected telemetry to SignalFx. It takes batches
//! of tagged, multi-field measurements, flattens every field into its own
//! single-valued datapoint and submits the whole batch to the SignalFx
//! ingestion endpoint in one bounded HTTP call.
//!
//! The pieces:
//!
//!  * `metric` holds the measurement and datapoint types, and the coercion of
//!    dynamically typed field values into numeric datapoint values.
//!  * `signalfx` is the export session: connect, write, close.
//!  * `sink` is where flattened datapoints go. HTTP for real, console for dry
//!    runs, memory for tests.
//!  * `protocols` holds the SignalFx JSON encoding and an InfluxDB
//!    line-protocol parser for text input.
//!  * `config` parses the command line and the TOML configuration file.
#![allow(unknown_lints)]
#![deny(missing_docs, trivial_numeric_casts, unstable_features, unused_import_braces)]
extern crate chrono;
extern crate clap;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate thiserror;
extern crate toml;

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
extern crate tempdir;

pub mod config;
pub mod error;
pub mod metric;
pub mod protocols;
pub mod signalfx;
pub mod sink;
