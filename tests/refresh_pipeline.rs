/// Offline end-to-end tests for the refresh pipeline.
///
/// These tests exercise parse -> classify -> present over embedded sample
/// payloads, and the scheduler's failure behavior against an unreachable
/// local address. No external network access is required: the only
/// socket activity is a loopback connection that is refused immediately.

use std::time::{Duration, Instant};

use airmon_service::config::StationSelect;
use airmon_service::ingest::city_api::{parse_post_detail, parse_posts, ApiClient};
use airmon_service::model::{ApiError, Channel};
use airmon_service::presentation::{channel_reading, channel_readings, AqiReport};
use airmon_service::scheduler::{run_cycle, RefreshScheduler};

// ---------------------------------------------------------------------------
// Sample payloads, shaped like the live upstream documents
// ---------------------------------------------------------------------------

const SAMPLE_POSTS: &str = r#"[
    {"id": 1, "name": "Пост №1 (Центр)", "address": "вул. Соборності, 1",
     "lat": 49.5894, "lng": 34.5514},
    {"id": 3, "name": "Пост №3 (Левада)", "address": "вул. Героїв АТО, 71",
     "lat": 49.5660, "lng": 34.5612}
]"#;

const SAMPLE_DETAIL: &str = r#"[{
    "id": 3,
    "name": "Пост №3 (Левада)",
    "address": "вул. Героїв АТО, 71",
    "description": "Стаціонарний пост",
    "value": 47.0,
    "index": 2,
    "qualityDesc": "Добре",
    "qualityRecommendation": "Якість повітря прийнятна",
    "updated": "2026-08-30 11:40",
    "params": [
        {"name": "ТЧ2,5,&nbsp;мкг/м<sup>3</sup>",
         "currentValue": 8.4, "avgDailyValue": 7.1, "qualityIndex": 1},
        {"name": "ТЧ10,&nbsp;мкг/м<sup>3</sup>",
         "currentValue": 14.2, "avgDailyValue": 12.0, "qualityIndex": 2},
        {"name": "Озон – O<sub>3</sub>,&nbsp;мкг/м<sup>3</sup>",
         "currentValue": 0, "avgDailyValue": 0, "qualityIndex": 0},
        {"name": "Швидкість вітру, м/с",
         "currentValue": 0, "avgDailyValue": 3.1, "qualityIndex": 0},
        {"name": "Невідомий параметр",
         "currentValue": 9.9, "avgDailyValue": 9.9, "qualityIndex": 1}
    ]
}]"#;

// ---------------------------------------------------------------------------
// Parse -> classify -> present
// ---------------------------------------------------------------------------

#[test]
fn sample_detail_flows_through_to_presentation() {
    let detail = parse_post_detail(SAMPLE_DETAIL, 3).expect("sample detail parses");

    let aqi = AqiReport::from_detail(&detail);
    assert_eq!(aqi.value, 47.0);
    assert_eq!(aqi.index, 2);
    assert_eq!(aqi.station_type, "Стаціонарний пост");

    let readings = channel_readings(&detail);
    // Five params, one of them unclassifiable.
    assert_eq!(readings.len(), 4, "unknown parameter must be dropped from channel views");

    let pm25 = channel_reading(&detail, Channel::Pm25).expect("PM2.5 present");
    assert_eq!(pm25.current_value, Some(8.4));
    assert_eq!(pm25.quality_index, Some(1));

    // Ozone is all-zero: indistinguishable from a dead sensor, suppressed.
    let ozone = channel_reading(&detail, Channel::Ozone).expect("ozone present");
    assert_eq!(ozone.current_value, None);

    // Wind speed is zero but the daily average is real: a literal zero.
    let wind = channel_reading(&detail, Channel::WindSpeed).expect("wind speed present");
    assert_eq!(wind.current_value, Some(0.0));
    assert_eq!(wind.daily_average, 3.1);
}

#[test]
fn nearest_resolution_over_sample_posts() {
    let posts = parse_posts(SAMPLE_POSTS).expect("sample posts parse");
    let nearest = airmon_service::analysis::nearest::find_nearest(&posts, 49.567, 34.560)
        .expect("non-empty list");
    assert_eq!(nearest.id, 3, "Левада is closer to the query point than Центр");
}

#[test]
fn detail_with_no_params_still_publishes_aqi() {
    let body = r#"[{
        "id": 1, "name": "Пост №1 (Центр)", "address": "вул. Соборності, 1",
        "value": 61.0, "index": 3, "params": []
    }]"#;

    let detail = parse_post_detail(body, 1).expect("empty params is not an error");
    assert!(channel_readings(&detail).is_empty());
    assert_eq!(AqiReport::from_detail(&detail).value, 61.0);
}

// ---------------------------------------------------------------------------
// Scheduler failure behavior (loopback only)
// ---------------------------------------------------------------------------

/// Port 9 (discard) refuses connections immediately on loopback.
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// The cycle state loops back to Idle as soon as the interval wait
/// begins, so the durable signal of a failed cycle is `last_error`.
fn wait_for_error(scheduler: &RefreshScheduler) -> String {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        if let Some(reason) = scheduler.last_error() {
            return reason;
        }
        assert!(Instant::now() < deadline, "scheduler never recorded a cycle failure");
        std::thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn failed_startup_cycle_reports_error_and_keeps_running() {
    let client = ApiClient::with_base_url(UNREACHABLE).expect("client builds");
    let mut scheduler = RefreshScheduler::start(
        client,
        StationSelect::Fixed(3),
        Duration::from_secs(600),
        "test-station",
    );

    let reason = wait_for_error(&scheduler);
    assert!(
        reason.starts_with("Connection error"),
        "refused connection must surface as a connection error, got: {}",
        reason
    );
    assert!(
        scheduler.snapshot().is_none(),
        "no snapshot may exist when every cycle has failed"
    );

    scheduler.stop();
}

#[test]
fn stop_halts_the_loop_promptly() {
    let client = ApiClient::with_base_url(UNREACHABLE).expect("client builds");
    let mut scheduler = RefreshScheduler::start(
        client,
        StationSelect::Fixed(3),
        Duration::from_secs(600),
        "test-station",
    );
    wait_for_error(&scheduler);

    let start = Instant::now();
    scheduler.stop();
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "stop must interrupt the 600s interval wait"
    );
}

#[test]
fn run_cycle_with_coordinates_fails_cleanly_when_list_is_unreachable() {
    let client = ApiClient::with_base_url(UNREACHABLE).expect("client builds");
    let result = run_cycle(
        &client,
        &StationSelect::Nearest {
            latitude: 49.5894,
            longitude: 34.5514,
        },
    );
    assert!(matches!(result, Err(ApiError::Connection(_))));
}
