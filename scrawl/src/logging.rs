/// Install the global logger. Only the first call does anything.
///
/// Logs to the terminal if there is one, else to "log.out" in the working directory.
/// Nothing in this crate calls it: the host binary does, once, at the top of `main`.
pub fn init() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
        if has_term {
            let _ = env_logger::builder()
                .filter_level(log::LevelFilter::Debug)
                .try_init();
        } else {
            let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
        }
    });
}
