/// Daemon entry point.
///
/// Loads configuration, starts the refresh scheduler for the configured
/// station, and periodically prints the latest published snapshot through
/// the presentation adapter. Configuration path comes from the first CLI
/// argument or the `AIRMON_CONFIG` env var (loadable from `.env`),
/// defaulting to `airmon.toml`.

use std::time::Duration;

use airmon_service::channels;
use airmon_service::config::ServiceConfig;
use airmon_service::logging::{self, LogLevel, Source};
use airmon_service::presentation::{self, AqiReport};
use airmon_service::registry::StationRegistry;

const STATUS_POLL_SECS: u64 = 30;

fn main() {
    dotenv::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("AIRMON_CONFIG").ok())
        .unwrap_or_else(|| "airmon.toml".to_string());

    let config = match ServiceConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    logging::init_logger(
        LogLevel::from_config(&config.service.log_level),
        config.service.log_file.as_deref(),
    );

    let select = match config.station.select() {
        Ok(select) => select,
        Err(e) => {
            // load() validates this already; belt for direct construction.
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let entry_id = config
        .station
        .name
        .clone()
        .unwrap_or_else(|| "default".to_string());
    let interval = Duration::from_secs(config.service.scan_interval_secs);

    logging::info(
        Source::System,
        Some(&entry_id),
        &format!(
            "starting refresh loop: {:?}, interval {}s, base {}",
            select, config.service.scan_interval_secs, config.service.base_url
        ),
    );

    let mut registry = StationRegistry::new();
    if let Err(e) = registry.create(&entry_id, &config.service.base_url, select, interval) {
        logging::error(Source::System, Some(&entry_id), &e.to_string());
        std::process::exit(1);
    }

    let mut last_printed: Option<String> = None;
    loop {
        std::thread::sleep(Duration::from_secs(STATUS_POLL_SECS));

        let Some(station) = registry.get(&entry_id) else {
            break;
        };

        if let Some(reason) = station.last_error() {
            logging::debug(
                Source::System,
                Some(&entry_id),
                &format!("last cycle failed ({}); showing previous snapshot", reason),
            );
        }

        let Some(snapshot) = station.snapshot() else {
            continue;
        };

        // Print each snapshot once, keyed by its upstream timestamp.
        let key = format!("{}|{}", snapshot.id, snapshot.updated);
        if last_printed.as_deref() == Some(&key) {
            continue;
        }
        last_printed = Some(key);
        print_snapshot(&snapshot);
    }
}

fn print_snapshot(snapshot: &airmon_service::model::PostDetail) {
    let aqi = AqiReport::from_detail(snapshot);
    println!(
        "{} ({}) — AQI {} [{}] {} (updated {})",
        aqi.station_name, aqi.station_address, aqi.value, aqi.index, aqi.description, aqi.updated
    );

    for (channel, reading) in presentation::channel_readings(snapshot) {
        let descriptor = channels::descriptor_for(channel);
        let value = match reading.current_value {
            Some(v) => format!("{} {}", v, descriptor.unit),
            None => "no value".to_string(),
        };
        match reading.quality_index {
            Some(q) => println!(
                "  {}: {} (daily avg {}, quality {})",
                descriptor.name, value, reading.daily_average, q
            ),
            None => println!(
                "  {}: {} (daily avg {})",
                descriptor.name, value, reading.daily_average
            ),
        }
    }
}
