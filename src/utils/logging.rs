#[cfg(feature = "logging")]
pub fn init_logger(
    min_level: log::LevelFilter, log_file_name: &std::path::Path,
) -> Result<(), fern::InitError> {
    if let Some(parent) = log_file_name.parent() {
        std::fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            let now = chrono::Local::now();

            out.finish(format_args!(
                "[{}][{}][{}] {}",
                now.format("%Y-%m-%d][%H:%M:%S%.6f"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(min_level)
        .chain(fern::log_file(log_file_name)?)
        .apply()?;

    Ok(())
}
