//! Provides the CLI option parser
//!
//! Used to parse the argv/config file into a struct that
//! the executable can consume and use as configuration data.

use clap::{App, Arg};
use error::Error;
use signalfx::SignalFxConfig;
use std::fs::File;
use std::io::Read;
use std::str::FromStr;
use std::time::Duration;
use toml;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Big configuration struct for the sfx-export executable
///
/// This struct is what we construct from parsing the command line and the
/// configuration file. Please see documentation on `parse_config_file` in
/// this module for the file format.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The verbosity setting. The higher the value the more chatty we get.
    pub verbose: u64,
    /// Version string. This is set automatically.
    pub version: String,
    /// Print datapoints to stdout instead of sending them.
    pub dry_run: bool,
    /// How many measurements are read from input before a write.
    pub batch_size: usize,
    /// See `signalfx::SignalFx` for more.
    pub signalfx: SignalFxConfig,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            verbose: 0,
            version: VERSION.unwrap_or("unknown").to_string(),
            dry_run: false,
            batch_size: 1_000,
            signalfx: SignalFxConfig::default(),
        }
    }
}

/// Parse the command line and the configuration file it names.
pub fn parse_args() -> Result<Args, Error> {
    let args = App::new("sfx-export")
        .version(VERSION.unwrap_or("unknown"))
        .author("Brian L. Troutwine <blt@postmates.com>")
        .about("flattens line protocol measurements into SignalFx datapoints")
        .arg(
            Arg::with_name("config-file")
                .long("config")
                .short("C")
                .value_name("config")
                .required(true)
                .help("The config file to feed in.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("dry-run")
                .long("dry-run")
                .help("Print datapoints to stdout instead of sending them."),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Turn on verbose output."),
        )
        .get_matches();

    let verb = if args.is_present("verbose") {
        args.occurrences_of("verbose")
    } else {
        0
    };

    let filename = args.value_of("config-file")
        .ok_or_else(|| Error::Config("no config file given".to_string()))?;
    let mut parsed = load_config_file(filename, verb)?;
    parsed.dry_run = args.is_present("dry-run");
    Ok(parsed)
}

/// Read and parse the configuration file at `path`.
pub fn load_config_file(path: &str, verbosity: u64) -> Result<Args, Error> {
    let mut fp = File::open(path)?;
    let mut buffer = String::new();
    fp.read_to_string(&mut buffer)?;
    parse_config_file(&buffer, verbosity)
}

/// Parse a duration written as `"250ms"`, `"5s"`, `"2m"`, `"1h"` or a bare
/// number of seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (num, unit) = s.split_at(split);
    let n = u64::from_str(num).ok()?;
    match unit.trim() {
        "ms" => Some(Duration::from_millis(n)),
        "" | "s" => Some(Duration::from_secs(n)),
        "m" => n.checked_mul(60).map(Duration::from_secs),
        "h" => n.checked_mul(3_600).map(Duration::from_secs),
        _ => None,
    }
}

fn config_error<S: Into<String>>(msg: S) -> Error {
    Error::Config(msg.into())
}

fn parse_signalfx(tbl: &toml::Value) -> Result<SignalFxConfig, Error> {
    let mut config = SignalFxConfig::default();

    if let Some(token) = tbl.get("token") {
        config.token = token
            .as_str()
            .ok_or_else(|| config_error("token must be a string"))?
            .to_string();
    }

    if let Some(timeout) = tbl.get("timeout") {
        config.timeout = match *timeout {
            toml::Value::String(ref s) => parse_duration(s)
                .ok_or_else(|| config_error(format!("could not parse timeout {:?}", s)))?,
            toml::Value::Integer(i) if i >= 0 => Duration::from_secs(i as u64),
            _ => return Err(config_error("timeout must be a duration string or seconds")),
        };
    }

    if let Some(endpoint) = tbl.get("endpoint") {
        config.endpoint = endpoint
            .as_str()
            .ok_or_else(|| config_error("endpoint must be a string"))?
            .to_string();
    }

    if let Some(debug) = tbl.get("debug") {
        config.debug = debug
            .as_bool()
            .ok_or_else(|| config_error("debug must be a boolean"))?;
    }

    Ok(config)
}

/// Parse the sfx-export configuration file.
///
/// ```toml
/// [sources.stdin]
/// batch-size = 1000
///
/// [sinks.signalfx]
/// token = "XYZ-ABC"
/// timeout = "5s"
/// endpoint = "https://ingest.signalfx.com/v2/datapoint"
/// debug = false
/// ```
///
/// Every key is optional here. A missing token is caught when the export
/// session connects.
pub fn parse_config_file(buffer: &str, verbosity: u64) -> Result<Args, Error> {
    let mut args = Args::default();
    let value: toml::Value = toml::from_str(buffer)
        .map_err(|e| config_error(format!("could not parse config file: {}", e)))?;

    args.verbose = verbosity;

    if let Some(stdin) = value.get("sources").and_then(|s| s.get("stdin")) {
        if let Some(bs) = stdin.get("batch-size") {
            args.batch_size = match bs.as_integer() {
                Some(i) if i > 0 => i as usize,
                _ => return Err(config_error("batch-size must be a positive integer")),
            };
        }
    }

    if let Some(tbl) = value.get("sinks").and_then(|s| s.get("signalfx")) {
        args.signalfx = parse_signalfx(tbl)?;
    }

    Ok(args)
}
