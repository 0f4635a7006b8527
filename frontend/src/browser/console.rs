use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::console_log;

/// Forwards `log` records to the browser console.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match record.level() {
            Level::Debug | Level::Trace => {
                console_log(">> DEBUG");
                console_log(&record.args().to_string());
                console_log("<< DEBUG");
            }
            level => console_log(&format!("{}: {}", level, record.args())),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger once; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
