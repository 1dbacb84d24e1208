// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::{Duration, Utc};
use sensorhub_analytics::AnalyticsEngine;
use sensorhub_core::{AnalyticsConfig, HubError, Reading};

fn engine(window_size: usize, min_accepted: f64) -> AnalyticsEngine {
    AnalyticsEngine::new(AnalyticsConfig {
        window_size,
        min_accepted,
        ..AnalyticsConfig::default()
    })
    .expect("valid config")
}

/// Ingests `values` for one sensor with strictly increasing timestamps and
/// returns every enriched reading.
fn ingest_all(engine: &AnalyticsEngine, sensor_id: &str, values: &[f64]) -> Vec<Reading> {
    let start = Utc::now();
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            engine
                .ingest(sensor_id, value, start + Duration::milliseconds(i as i64))
                .expect("well-formed reading")
        })
        .collect()
}

#[test]
fn constant_sequence_averages_to_the_value_exactly() {
    let engine = engine(4, 0.0);
    let readings = ingest_all(&engine, "tag-1", &[21.5; 10]);
    for reading in &readings[3..] {
        assert_eq!(reading.moving_average, Some(21.5));
    }
}

#[test]
fn no_average_before_the_window_is_full() {
    let engine = engine(3, 0.0);
    let readings = ingest_all(&engine, "tag-1", &[10.0, 20.0, 30.0, 40.0]);

    assert_eq!(readings[0].moving_average, None);
    assert_eq!(readings[1].moving_average, None);
    assert_eq!(readings[2].moving_average, Some(20.0));
    assert_eq!(readings[3].moving_average, Some(30.0));

    // No alert can exist before an average exists.
    assert!(readings[0].alert.is_none());
    assert!(readings[1].alert.is_none());
}

#[test]
fn alert_fires_once_at_the_first_crossing() {
    // Window 2, threshold 100. Averages: 150, 125, 95, 65, 35.
    // First windowed average <= 100 is 95, at window start index 2.
    let engine = engine(2, 100.0);
    let readings = ingest_all(&engine, "tag-1", &[160.0, 140.0, 110.0, 80.0, 50.0, 20.0]);

    assert!(readings[1].alert.is_none());
    assert!(readings[2].alert.is_none());

    let mark = readings[3].alert.expect("first crossing");
    assert_eq!(mark.index, 2);
    assert_eq!(mark.value, 95.0);

    // Condition keeps holding; the recorded mark is carried, not re-fired.
    assert_eq!(readings[4].alert, Some(mark));
    assert_eq!(readings[5].alert, Some(mark));
}

#[test]
fn threshold_scenario_from_the_field() {
    // Window 3, five readings of 1000, min_accepted 1000: averages are
    // defined from the third reading onward and equal 1000.0; the alert
    // fires for the window starting at index 0 with the average itself.
    let engine = engine(3, 1000.0);
    let readings = ingest_all(&engine, "boiler-7", &[1000.0; 5]);

    assert_eq!(readings[2].moving_average, Some(1000.0));
    assert_eq!(readings[3].moving_average, Some(1000.0));

    let mark = readings[2].alert.expect("alert at first full window");
    assert_eq!(mark.index, 0);
    assert_eq!(mark.value, 1000.0);
    assert_eq!(readings[4].alert, Some(mark));
}

#[test]
fn alarm_bounds_are_stamped_on_every_reading() {
    let engine = AnalyticsEngine::new(AnalyticsConfig {
        window_size: 2,
        alarm_lower: 800.0,
        alarm_upper: 1500.0,
        ..AnalyticsConfig::default()
    })
    .expect("valid config");

    let readings = ingest_all(&engine, "tag-1", &[900.0, 1100.0]);
    for reading in &readings {
        assert_eq!(reading.alarm_lower, 800.0);
        assert_eq!(reading.alarm_upper, 1500.0);
    }
}

#[test]
fn non_finite_value_is_rejected_and_window_is_untouched() {
    let engine = engine(2, 0.0);
    engine.ingest("tag-1", 10.0, Utc::now()).expect("finite");

    let rejected = engine.ingest("tag-1", f64::NAN, Utc::now());
    assert!(matches!(rejected, Err(HubError::MalformedReading { .. })));

    // The NaN never entered the window: the next value completes it.
    let reading = engine.ingest("tag-1", 20.0, Utc::now()).expect("finite");
    assert_eq!(reading.moving_average, Some(15.0));
}

#[test]
fn stale_timestamp_is_rejected_and_window_is_untouched() {
    let engine = engine(2, 0.0);
    let now = Utc::now();

    engine.ingest("tag-1", 10.0, now).expect("in order");

    let stale = engine.ingest("tag-1", 999.0, now - Duration::seconds(1));
    assert!(matches!(stale, Err(HubError::StaleReading { .. })));

    let reading = engine
        .ingest("tag-1", 20.0, now + Duration::seconds(1))
        .expect("in order");
    assert_eq!(reading.moving_average, Some(15.0));
}

#[test]
fn equal_timestamps_are_accepted() {
    let engine = engine(2, 0.0);
    let now = Utc::now();

    engine.ingest("tag-1", 10.0, now).expect("in order");
    let reading = engine.ingest("tag-1", 20.0, now).expect("same instant");
    assert_eq!(reading.moving_average, Some(15.0));
}

#[test]
fn sensors_are_isolated() {
    let engine = engine(2, 100.0);

    // Drive sensor A into an alert.
    let a = ingest_all(&engine, "sensor-a", &[50.0, 50.0]);
    assert!(a[1].alert.is_some());

    // Sensor B starts from a clean window and a clean alert state.
    let b = ingest_all(&engine, "sensor-b", &[500.0, 500.0]);
    assert_eq!(b[0].moving_average, None);
    assert_eq!(b[1].moving_average, Some(500.0));
    assert!(b[1].alert.is_none());

    assert_eq!(engine.sensor_count(), 2);
}

#[test]
fn invalid_window_size_is_a_construction_error() {
    let result = AnalyticsEngine::new(AnalyticsConfig {
        window_size: 0,
        ..AnalyticsConfig::default()
    });
    assert!(matches!(result, Err(HubError::InvalidConfig { .. })));
}

#[test]
fn racing_producers_for_one_sensor_deliver_in_ingestion_order() {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    let engine = engine(2, f64::MIN);
    let delivered = Mutex::new(Vec::new());
    // One shared instant: equal timestamps pass the stale guard, so the
    // two producers can interleave freely.
    let timestamp = Utc::now();

    std::thread::scope(|scope| {
        for producer in 0..2u32 {
            let engine = &engine;
            let delivered = &delivered;
            scope.spawn(move || {
                for i in 0..1_000u32 {
                    let value = f64::from(producer * 1_000 + i);
                    engine
                        .ingest_with("tag-1", value, timestamp, |reading| {
                            delivered
                                .lock()
                                .expect("no poisoned lock")
                                .push((reading.value, reading.moving_average));
                            Ok(())
                        })
                        .expect("well-formed reading");
                }
            });
        }
    });

    // Replay the delivered values through a reference window: if delivery
    // matched ingestion order, every reported average agrees with the
    // replay. An inverted pair cannot agree, because the later reading's
    // average already contains the earlier value.
    let delivered = delivered.lock().expect("no poisoned lock");
    assert_eq!(delivered.len(), 2_000);

    let mut window = VecDeque::new();
    let mut sum = 0.0;
    for &(value, average) in delivered.iter() {
        if window.len() == 2 {
            sum -= window.pop_front().expect("window is non-empty");
        }
        window.push_back(value);
        sum += value;
        let expected = (window.len() == 2).then(|| sum / 2.0);
        assert_eq!(average, expected);
    }
}

#[test]
fn concurrent_sensors_update_in_parallel() {
    use std::sync::Arc;

    let engine = Arc::new(engine(5, 0.0));
    let mut handles = Vec::new();

    for sensor in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || {
            let sensor_id = format!("sensor-{sensor}");
            let start = Utc::now();
            let mut last = None;
            for i in 0..1_000i64 {
                last = Some(
                    engine
                        .ingest(&sensor_id, f64::from(sensor), start + Duration::milliseconds(i))
                        .expect("well-formed reading"),
                );
            }
            last.expect("ingested at least one reading")
        }));
    }

    for (sensor, handle) in handles.into_iter().enumerate() {
        let reading = handle.join().expect("no panic");
        // Each sensor saw a constant series, so its average is exact.
        assert_eq!(reading.moving_average, Some(sensor as f64));
    }
    assert_eq!(engine.sensor_count(), 8);
}
