/// Installs an `env_logger` driven by `RUST_LOG`.
///
/// Returns `false` when a logger was already installed.
pub fn init_logging() -> bool {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
