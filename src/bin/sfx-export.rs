#![allow(unknown_lints)]

extern crate chrono;
extern crate fern;
extern crate sfx_export;

#[macro_use]
extern crate log;

use chrono::Utc;
use sfx_export::config;
use sfx_export::error::Error;
use sfx_export::metric::Measurement;
use sfx_export::protocols::influx;
use sfx_export::signalfx::SignalFx;
use sfx_export::sink;
use std::io::{self, BufRead};
use std::process;
use std::str;

fn flush(sfx: &SignalFx, batch: &mut Vec<Measurement>) {
    if let Err(e) = sfx.write(&batch[..]) {
        error!("dropping batch of {} measurements: {}", batch.len(), e);
    }
    batch.clear();
}

/// Read line protocol from `input` and write it to `sfx` in batches of
/// `batch_size`. Lines that are not UTF-8 or not line protocol are logged and
/// skipped. Whatever has been batched is written before returning, whether
/// `input` ended or failed.
fn pump<R: BufRead>(mut input: R, sfx: &SignalFx, batch_size: usize) -> Result<(), Error> {
    let mut batch: Vec<Measurement> = Vec::with_capacity(batch_size);
    let mut buf = Vec::new();
    let res = loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) => break Err(Error::Io(e)),
        }
        let line = match str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!("skipping line that is not valid UTF-8: {}", e);
                continue;
            }
        };
        match influx::parse_line(line) {
            Ok(Some(m)) => batch.push(m),
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        }
        if batch.len() >= batch_size {
            flush(sfx, &mut batch);
        }
    };
    flush(sfx, &mut batch);
    res
}

fn run(args: config::Args) -> Result<(), Error> {
    let sfx = if args.dry_run {
        SignalFx::with_sink(args.signalfx.clone(), Box::new(sink::Console::new()))?
    } else {
        SignalFx::connect(args.signalfx.clone())?
    };

    let stdin = io::stdin();
    let res = pump(stdin.lock(), &sfx, args.batch_size);
    sfx.close()?;
    res
}

fn main() {
    let args = match config::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let level = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][{}] {}",
                record.module_path().unwrap_or("?"),
                record.line().unwrap_or(0),
                Utc::now().to_rfc3339(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply();
    if let Err(e) = logger {
        eprintln!("could not set up logging: {}", e);
        process::exit(1);
    }

    info!("sfx-export - {}", args.version);

    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sfx_export::signalfx::SignalFxConfig;
    use sfx_export::sink::Memory;
    use std::io::{BufReader, Read};

    fn session(sink: &Memory) -> SignalFx {
        let config = SignalFxConfig {
            token: "abc".to_string(),
            ..Default::default()
        };
        SignalFx::with_sink(config, Box::new(sink.clone())).unwrap()
    }

    fn names(sink: &Memory) -> Vec<String> {
        sink.batches()
            .iter()
            .flat_map(|b| b.iter().map(|p| p.metric.clone()))
            .collect()
    }

    #[test]
    fn pump_skips_invalid_utf8() {
        let sink = Memory::new();
        let sfx = session(&sink);
        let input: &[u8] = b"cpu value=1 1257894000000000000\r\n\
                              mem used=2i\n\
                              \xff\xfe bad\n\
                              disk free=3i\n";

        assert!(pump(input, &sfx, 2).is_ok());
        assert_eq!(2, sink.calls());
        assert_eq!(vec!["cpu", "mem.used", "disk.free"], names(&sink));
    }

    #[test]
    fn pump_skips_malformed_lines() {
        let sink = Memory::new();
        let sfx = session(&sink);
        let input: &[u8] = b"# comment\n\nnot line protocol\ndisk free=3i";

        assert!(pump(input, &sfx, 10).is_ok());
        assert_eq!(1, sink.calls());
        assert_eq!(vec!["disk.free"], names(&sink));
    }

    struct Broken {
        data: &'static [u8],
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "pipe broke"));
            }
            let n = self.data.read(buf)?;
            Ok(n)
        }
    }

    #[test]
    fn pump_flushes_before_read_error() {
        let sink = Memory::new();
        let sfx = session(&sink);
        let input = BufReader::new(Broken {
            data: b"cpu value=1\nmem used=2i\n",
        });

        match pump(input, &sfx, 100) {
            Err(Error::Io(_)) => {}
            other => panic!("expected an io error, got {:?}", other),
        }
        assert_eq!(1, sink.calls());
        assert_eq!(vec!["cpu", "mem.used"], names(&sink));
    }
}
