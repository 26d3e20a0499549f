use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

/// Opens (or creates) the debug log. The terminal belongs to the UI, so this
/// file is the only place diagnostics go.
pub fn init(path: &Path) {
    let Ok(mut logger) = LOGGER.lock() else {
        return;
    };
    if logger.is_some() {
        return;
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
        *logger = Some(file);
    }
}

pub fn log(message: &str) {
    write_line("INFO", message);
}

pub fn error(message: &str) {
    write_line("ERROR", message);
}

fn write_line(level: &str, message: &str) {
    let Ok(mut logger) = LOGGER.lock() else {
        return;
    };
    if let Some(file) = logger.as_mut() {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {:<5} {}", timestamp, level, message);
    }
}
