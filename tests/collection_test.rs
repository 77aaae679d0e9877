use regex::Regex;
use tokio::sync::mpsc;
use tokio::time::Duration;
use weather_collector_lib::collector::CollectionController;
use weather_collector_lib::display::DisplaySink;
use weather_collector_lib::models::{Reading, DEFAULT_CITIES};
use weather_collector_lib::settings::CollectorSettings;

const TIME_UNIT_MS: u64 = 25;

fn fast_settings() -> CollectorSettings {
    CollectorSettings {
        time_unit_ms: TIME_UNIT_MS,
        drain_interval_ms: 5,
        ..CollectorSettings::default()
    }
}

fn line_pattern() -> Regex {
    Regex::new(
        r"^(?P<city>[A-Za-z ]+): (?P<temp>-?\d+)°C, (?P<cond>Sunny|Cloudy|Rainy|Stormy|Snowy|Windy), Humidity: (?P<hum>\d+)%, Wind: (?P<wind>\d+) km/h \[\d{2}:\d{2}:\d{2}\]$",
    )
    .unwrap()
}

fn setup() -> (CollectionController, DisplaySink<Vec<u8>>) {
    let (tx, rx) = mpsc::unbounded_channel::<Reading>();
    (
        CollectionController::new(fast_settings(), tx),
        DisplaySink::new(rx, Vec::new()),
    )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tokyo_and_paris_end_to_end() {
    let (mut controller, mut sink) = setup();
    let cities = vec!["Tokyo".to_string(), "Paris".to_string()];

    controller.start(&cities, 2).unwrap();
    assert_eq!(controller.active_workers(), 2);

    tokio::time::sleep(Duration::from_millis(4 * TIME_UNIT_MS)).await;
    let summary = controller.stop().await;
    assert_eq!(summary.joined + summary.abandoned, 2);
    assert!(!controller.is_running());
    assert_eq!(controller.active_workers(), 0);

    sink.drain().unwrap();
    let lines = sink.log().lines().to_vec();
    assert!(lines.iter().any(|l| l.contains("Tokyo")));
    assert!(lines.iter().any(|l| l.contains("Paris")));

    let pattern = line_pattern();
    for line in &lines {
        let caps = pattern
            .captures(line)
            .unwrap_or_else(|| panic!("unexpected line format: {line}"));
        let temp: i32 = caps["temp"].parse().unwrap();
        let hum: u32 = caps["hum"].parse().unwrap();
        let wind: u32 = caps["wind"].parse().unwrap();
        assert!(["Tokyo", "Paris"].contains(&&caps["city"]));
        assert!((-10..=40).contains(&temp));
        assert!((20..=100).contains(&hum));
        assert!(wind <= 50);
    }

    // Nothing arrives after stop plus a drain cycle.
    tokio::time::sleep(Duration::from_millis(6 * TIME_UNIT_MS)).await;
    assert_eq!(sink.drain().unwrap(), 0);
    assert_eq!(sink.log().lines(), lines.as_slice());
}

#[tokio::test]
async fn worker_count_matches_city_count() {
    let (mut controller, _sink) = setup();
    let all: Vec<String> = DEFAULT_CITIES.iter().map(|c| c.to_string()).collect();

    for k in [1, 3, 10] {
        for threads in [1, 3, 10] {
            controller.start(&all[..k], threads).unwrap();
            assert_eq!(controller.active_workers(), k);
            assert_eq!(controller.snapshot().workers.len(), k);
            controller.stop().await;
            assert_eq!(controller.active_workers(), 0);
        }
    }
}

#[tokio::test]
async fn empty_selection_changes_nothing() {
    let (mut controller, mut sink) = setup();

    assert!(controller.start(&[], 3).is_err());
    assert!(!controller.is_running());
    assert_eq!(controller.active_workers(), 0);

    tokio::time::sleep(Duration::from_millis(TIME_UNIT_MS)).await;
    assert_eq!(sink.drain().unwrap(), 0);
    assert!(sink.log().is_empty());
}

#[tokio::test]
async fn stop_is_prompt_with_long_intervals() {
    let (tx, _rx) = mpsc::unbounded_channel::<Reading>();
    let settings = CollectorSettings {
        time_unit_ms: 10_000,
        ..CollectorSettings::default()
    };
    let mut controller = CollectionController::new(settings, tx);
    let cities: Vec<String> = DEFAULT_CITIES.iter().map(|c| c.to_string()).collect();

    controller.start(&cities, 3).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let summary = tokio::time::timeout(Duration::from_secs(2), controller.stop())
        .await
        .expect("cancellable sleeps should let stop return quickly");
    assert_eq!(summary.joined, cities.len());
    assert!(!controller.is_running());
}
