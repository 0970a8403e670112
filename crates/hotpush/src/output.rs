use std::io::Write;
use std::sync::Mutex;

use hotpush_core::{CheckResult, ResultReporter};
use log::warn;

/// Writes each result as one JSON line.
pub struct JsonLineReporter<W> {
    writer: Mutex<W>,
    legacy: bool,
}

impl<W: Write> JsonLineReporter<W> {
    pub fn new(writer: W, legacy: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            legacy,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_line(&self, result: &CheckResult) -> std::io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.legacy {
            serde_json::to_writer(&mut *writer, &result.legacy_event())?;
        } else {
            serde_json::to_writer(&mut *writer, result)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl<W: Write + Send> ResultReporter for JsonLineReporter<W> {
    fn report(&self, result: &CheckResult) {
        if let Err(error) = self.write_line(result) {
            warn!("Failed to write update check result: {error}");
        }
    }
}
