use std::cell::RefCell;

use parking_lot::Mutex;

use crate::device::{encode_wide, DeviceChannel, SystemDevice, IOCTL_EXTERNAL_LOG_DEBUGOUT, PROCMON_DEVICE_PATH};
use crate::sink::Sink;

/// Log sink that forwards each formatted line to Process Monitor.
///
/// On construction the sink opens the monitor's global debug-output device.
/// Every record is converted to UTF-16 and pushed to the device with a single
/// buffered control request. The sink is best-effort from start to finish:
///
/// * If the device is not there (no monitor capturing), the sink starts
///   disabled and every record is dropped.
/// * If a control request fails, the handle is closed and the sink stays
///   disabled for the rest of its life. It never tries to reopen the device.
///
/// Nothing is ever reported back to the logger.
///
/// # Thread Safety
///
/// The sink itself needs `&mut self` to write. Use [`DiagnosticSinkSt`] for a
/// logger that stays on one thread and [`DiagnosticSinkMt`] for a logger
/// shared between threads; both run exactly the same write path.
///
/// # Examples
///
/// ```
/// # use procmon_logbench::diagnostic_sink::DiagnosticSink;
/// # use procmon_logbench::sink::Sink;
/// let mut sink = DiagnosticSink::system();
/// // Without a capturing monitor this is silently dropped.
/// sink.log("hello monitor\n");
/// sink.flush();
/// ```
pub struct DiagnosticSink<C: DeviceChannel = SystemDevice> {
    channel: C,
    handle: Option<C::Handle>,
    wide: Vec<u16>,
}

/// Diagnostic sink for loggers that are only driven from one thread.
pub type DiagnosticSinkSt<C = SystemDevice> = RefCell<DiagnosticSink<C>>;

/// Diagnostic sink for loggers shared between threads.
pub type DiagnosticSinkMt<C = SystemDevice> = Mutex<DiagnosticSink<C>>;

impl DiagnosticSink<SystemDevice> {
    /// Opens the Process Monitor device through the platform's device API.
    pub fn system() -> Self {
        Self::with_channel(SystemDevice)
    }
}

impl<C: DeviceChannel> DiagnosticSink<C> {
    /// Opens the Process Monitor device through `channel`.
    pub fn with_channel(channel: C) -> Self {
        Self::open(channel, PROCMON_DEVICE_PATH)
    }

    /// Opens the device at `path` through `channel`.
    ///
    /// A missing device yields a disabled sink, never an error.
    pub fn open(channel: C, path: &str) -> Self {
        let handle = channel.open(path);
        if handle.is_none() {
            tracing::debug!(device = path, "diagnostic device not available, sink disabled");
        }

        Self {
            channel,
            handle,
            wide: Vec::new(),
        }
    }

    /// Returns true while the sink still holds an open device handle.
    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    /// Sends one line to the device.
    ///
    /// The first failed request closes the handle for good.
    pub fn write(&mut self, text: &str) {
        let Some(handle) = self.handle.as_ref() else {
            return;
        };

        encode_wide(text, &mut self.wide);

        if let Err(err) = self.channel.send(handle, IOCTL_EXTERNAL_LOG_DEBUGOUT, &self.wide) {
            tracing::warn!(error = %err, "diagnostic device write failed, sink disabled");
            self.disable();
        }
    }

    fn disable(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.channel.close(handle);
        }
    }
}

impl<C: DeviceChannel> Sink for DiagnosticSink<C> {
    #[inline]
    fn log(&mut self, formatted: &str) {
        self.write(formatted);
    }

    fn flush(&mut self) {
        // The device keeps no buffer of ours.
    }
}

impl<C: DeviceChannel> Drop for DiagnosticSink<C> {
    fn drop(&mut self) {
        self.disable();
    }
}
