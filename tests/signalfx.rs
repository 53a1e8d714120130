mod integration {
    mod signalfx {

        extern crate chrono;
        extern crate sfx_export;

        use self::chrono::{DateTime, TimeZone, Utc};
        use self::sfx_export::error::Error;
        use self::sfx_export::metric::{FieldValue, Measurement, MetricType};
        use self::sfx_export::signalfx::{SignalFx, SignalFxConfig};
        use self::sfx_export::sink::Memory;
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        fn november() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2009, 11, 10, 23, 0, 0).unwrap()
        }

        fn session(sink: &Memory) -> SignalFx {
            let config = SignalFxConfig {
                token: "abc".to_string(),
                endpoint: "testing".to_string(),
                debug: true,
                ..Default::default()
            };
            SignalFx::with_sink(config, Box::new(sink.clone())).unwrap()
        }

        #[test]
        fn test_missing_token() {
            match SignalFx::with_sink(SignalFxConfig::default(), Box::new(Memory::new())) {
                Err(Error::MissingCredential) => {}
                Err(e) => panic!("unexpected error {}", e),
                Ok(_) => panic!("connected without a token"),
            }
        }

        #[test]
        fn test_write_nothing() {
            let sink = Memory::new();
            let sfx = session(&sink);
            assert!(sfx.write(&[]).is_ok());
            assert_eq!(0, sink.calls());
            assert!(sfx.close().is_ok());
        }

        #[test]
        fn test_write_batch() {
            let sink = Memory::new();
            let sfx = session(&sink);

            let batch = vec![
                Measurement::new("test1")
                    .time(november())
                    .overlay_tag("tag1", "value1")
                    .field("value", 1i64),
                Measurement::new("test2")
                    .time(november())
                    .field("cpuusage", 10i64),
                Measurement::new("test3")
                    .time(november())
                    .field("inconceivable", FieldValue::Null),
            ];
            assert!(sfx.write(&batch).is_ok());

            assert_eq!(1, sink.calls());
            let points = &sink.batches()[0];
            assert_eq!(2, points.len());

            assert_eq!("test1", points[0].metric);
            assert_eq!("1", points[0].value.to_string());
            assert_eq!(november(), points[0].timestamp);
            assert_eq!(Some(&"value1".to_string()), points[0].dimensions.get("tag1"));
            assert_eq!(MetricType::Gauge, points[0].kind);

            assert_eq!("test2.cpuusage", points[1].metric);
            assert_eq!("10", points[1].value.to_string());
            assert_eq!(november(), points[1].timestamp);
            assert!(points[1].dimensions.is_empty());
            assert_eq!(MetricType::Gauge, points[1].kind);

            assert_eq!(vec![Duration::from_secs(3)], sink.timeouts());
        }

        #[test]
        fn test_write_only_unrepresentable() {
            let sink = Memory::new();
            let sfx = session(&sink);
            let batch = vec![
                Measurement::new("test3")
                    .field("inconceivable", "a string")
                    .field("huge", 12u64),
            ];
            assert!(sfx.write(&batch).is_ok());
            assert_eq!(1, sink.calls());
            assert!(sink.batches()[0].is_empty());
        }

        #[test]
        fn test_concurrent_writers() {
            let sink = Memory::new();
            let sfx = Arc::new(session(&sink));

            let mut workers = Vec::new();
            for i in 0..8 {
                let sfx = Arc::clone(&sfx);
                workers.push(thread::spawn(move || {
                    let batch = vec![
                        Measurement::new(format!("worker{}", i))
                            .field("value", i as i64)
                            .field("busy", true),
                    ];
                    sfx.write(&batch).is_ok()
                }));
            }
            for worker in workers {
                assert!(worker.join().unwrap());
            }

            assert_eq!(8, sink.calls());
            for batch in sink.batches() {
                assert_eq!(2, batch.len());
            }
        }
    }
}
