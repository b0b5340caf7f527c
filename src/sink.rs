use std::cell::RefCell;

use parking_lot::Mutex;

/// Consumers of formatted log lines.
///
/// A [`Sink`] receives every record after the logger has formatted it. Sinks
/// take `&mut self`: exclusive access is how a sink is told it will not be
/// called concurrently. Sharing one between threads goes through a
/// [`SinkCell`], which is where the single- and multi-threaded forms of every
/// sink differ.
///
/// Sinks never report errors to the logger. A sink that cannot deliver a line
/// drops it.
pub trait Sink: Send + 'static {
    /// Delivers one formatted record, line terminator included.
    fn log(&mut self, formatted: &str);

    /// Pushes out anything the sink has buffered.
    fn flush(&mut self);
}

impl Sink for Box<dyn Sink> {
    fn log(&mut self, formatted: &str) {
        (**self).log(formatted)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// Sink that discards everything, for measuring logger overhead alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    #[inline]
    fn log(&mut self, _formatted: &str) {}

    #[inline]
    fn flush(&mut self) {}
}

/// Interior-mutable home of a sink inside a logger.
///
/// * `RefCell<S>` is the single-threaded form. It is `!Sync`, so a logger
///   built on it can only ever be driven from the thread that owns it.
/// * `parking_lot::Mutex<S>` is the multi-threaded form. Every record is
///   delivered under the lock.
pub trait SinkCell {
    type Inner: Sink + ?Sized;

    fn with_sink<R>(&self, f: impl FnOnce(&mut Self::Inner) -> R) -> R;
}

impl<S: Sink + ?Sized> SinkCell for RefCell<S> {
    type Inner = S;

    #[inline]
    fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.borrow_mut())
    }
}

impl<S: Sink + ?Sized> SinkCell for Mutex<S> {
    type Inner = S;

    #[inline]
    fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.lock())
    }
}

/// Single-threaded cell around a boxed sink.
pub type SinkSt = RefCell<Box<dyn Sink>>;

/// Multi-threaded cell around a boxed sink.
pub type SinkMt = Mutex<Box<dyn Sink>>;
