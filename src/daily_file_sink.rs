use std::io::{self, Write};
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::sink::Sink;

/// File sink that starts a new file every day.
///
/// Lines go to `<dir>/<prefix>.<YYYY-MM-DD>`. Write errors are dropped like in
/// every other sink; only creating the sink can fail.
pub struct DailyFileSink {
    appender: RollingFileAppender,
}

impl DailyFileSink {
    pub fn new(dir: impl AsRef<Path>, prefix: &str) -> io::Result<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .build(dir.as_ref())
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        Ok(Self { appender })
    }
}

impl Sink for DailyFileSink {
    fn log(&mut self, formatted: &str) {
        let _ = self.appender.write_all(formatted.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.appender.flush();
    }
}
