use std::str::FromStr;

pub fn setup_logging(default_level: &str) {
    let mut builder = env_logger::Builder::new();

    let level = log::LevelFilter::from_str(default_level).unwrap_or(log::LevelFilter::Warn);
    builder.filter(None, level);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.init();
}
