//! Shared helpers for translation tests.

use std::io;
use std::sync::{Arc, Mutex};

use obsmeta_model::Header;

/// In-memory log sink for scoped subscribers.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer lock").clone();
        String::from_utf8(bytes).expect("utf-8 log output")
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records events into the returned buffer.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

pub fn scuba_header() -> Header {
    Header::new()
        .with("TELESCOP", "JCMT")
        .with("TELCODE", "LSST")
        .with("INSTRUME", "SCUBA_test")
        .with("DATE-OBS", "2000-01-01T01:00:01.500")
        .with("DATE-END", "2000-01-01T02:00:01.500")
        .with("OBSGEO-X", -5464588.84421314)
        .with("OBSGEO-Y", -2493000.19137644)
        .with("OBSGEO-Z", 2150653.35350771)
        .with("OBSID", "20000101_00002")
        .with("EXPTIME", 2.0)
        .with("RELHUMID", 23)
        .with("HUMIDITY", 88)
        .with("BAZ", "bar")
}
