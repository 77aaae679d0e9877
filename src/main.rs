fn main() {
    if let Err(err) = weather_collector_lib::run() {
        log::error!("{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
