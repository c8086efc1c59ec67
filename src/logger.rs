use env_logger::Env;

/// Initialize global logger using `env_logger`.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If unset, `info` is used by default.
pub fn init() {
    init_with_default("info");
}

/// Same as [`init`] with a caller-chosen default filter.
pub fn init_with_default(filter: &str) {
    let env = Env::default().default_filter_or(filter);
    // Ignore errors if the logger was already initialized
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init_with_default("warn");
        init();
        log::debug!("logger initialized");
    }
}
