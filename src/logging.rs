use color_eyre::eyre::Result;
use log::LevelFilter;

/// Log to stderr, leaving stdout to command output
///
/// `RUST_LOG` is honoured unless `debug` forces the debug level.
pub fn init_logging(debug: bool) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .parse_default_env();
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }

    builder
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()?;

    log::debug!("Logging initialized (debug: {debug})");
    Ok(())
}
