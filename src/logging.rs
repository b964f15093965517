use log::LevelFilter;

/// Initializes logging for host applications (reads `RUST_LOG`).
pub fn init() {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();
}
