use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use time::macros::format_description;
use time::OffsetDateTime;

pub enum LogOutput {
    Stdout,
    Stderr,
}

pub struct Logger {
    pub write_to_std: Option<LogOutput>,
    pub severity: Level,
    pub file: Option<Arc<Mutex<File>>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger, appending to `file_path` when given
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        write_to_std: Option<LogOutput>,
        enable_colors: bool,
    ) -> Self {
        let file = file_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            File::options()
                .create(true)
                .append(true)
                .open(&path)
                .ok()
                .map(|f| Arc::new(Mutex::new(f)))
        });

        Logger {
            write_to_std,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    fn timestamp() -> String {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        OffsetDateTime::now_utc()
            .format(&format)
            .unwrap_or_default()
    }

    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[36m",
            Level::Debug => "\x1b[35m",
            Level::Trace => "\x1b[37m",
        }
    }

    /// Initialize logger from `SIGNPOST_LOG` / `RUST_LOG`, `SIGNPOST_LOG_FILE` and `NO_COLOR`
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("SIGNPOST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::Info);

        let file_path = std::env::var("SIGNPOST_LOG_FILE").ok().map(PathBuf::from);
        let enable_colors = std::env::var("NO_COLOR").is_err();

        let logger = Logger::new(file_path, Some(severity), Some(LogOutput::Stderr), enable_colors);
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }

    fn format(&self, record: &Record, colored: bool) -> String {
        let timestamp = Self::timestamp();
        let level = record.level().as_str();
        let target = record.target();
        let args = record.args();
        if colored {
            let color = Self::color(record.level());
            format!("{color}[{timestamp}] {level:<5}\x1b[0m {target}: {args}")
        } else {
            format!("[{timestamp}] {level:<5} {target}: {args}")
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if let Some(output) = &self.write_to_std {
            let line = self.format(record, self.enable_colors);
            match output {
                LogOutput::Stdout => {
                    let _ = writeln!(std::io::stdout(), "{line}");
                }
                LogOutput::Stderr => {
                    let _ = writeln!(std::io::stderr(), "{line}");
                }
            }
        }

        // File output never carries colors
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", self.format(record, false));
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut guard) = file.lock() {
                let _ = guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_filters_records() {
        let logger = Logger::new(None, Some(Level::Warn), None, false);
        let warn = Metadata::builder().level(Level::Warn).target("signpost").build();
        let debug = Metadata::builder().level(Level::Debug).target("signpost").build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn plain_format_has_no_escape_codes() {
        let logger = Logger::new(None, None, None, true);
        let render = |colored: bool| {
            logger.format(
                &Record::builder()
                    .args(format_args!("loaded {} folders", 3))
                    .level(Level::Info)
                    .target("signpost::services::loader")
                    .build(),
                colored,
            )
        };
        let plain = render(false);
        assert!(plain.ends_with("INFO  signpost::services::loader: loaded 3 folders"));
        assert!(!plain.contains('\x1b'));
        assert!(render(true).starts_with("\x1b[36m"));
    }
}
