use std::io;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use crate::sink::Sink;

enum Message {
    Record(String),
    Flush(SyncSender<()>),
}

/// Queue-backed front for another sink.
///
/// Records are copied into a bounded queue and a dedicated worker thread feeds
/// them to the wrapped sink, so the caller only pays for the enqueue. When the
/// queue is full the caller blocks until the worker catches up; records are
/// never dropped for lack of space.
///
/// Dropping the `AsyncSink` closes the queue and joins the worker, so every
/// record accepted before the drop has reached the wrapped sink once `drop`
/// returns.
pub struct AsyncSink {
    queue: Option<SyncSender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl AsyncSink {
    /// Starts a worker delivering to `sink` through a queue of `queue_size` records.
    pub fn spawn<S: Sink>(sink: S, queue_size: usize) -> io::Result<Self> {
        let (queue, rx) = mpsc::sync_channel(queue_size);
        let worker = thread::Builder::new()
            .name("async-sink".into())
            .spawn(move || deliver(sink, rx))?;

        Ok(Self {
            queue: Some(queue),
            worker: Some(worker),
        })
    }
}

fn deliver<S: Sink>(mut sink: S, rx: Receiver<Message>) {
    while let Ok(message) = rx.recv() {
        match message {
            Message::Record(line) => sink.log(&line),
            Message::Flush(done) => {
                sink.flush();
                let _ = done.send(());
            }
        }
    }
    sink.flush();
}

impl Sink for AsyncSink {
    fn log(&mut self, formatted: &str) {
        if let Some(queue) = &self.queue {
            let _ = queue.send(Message::Record(formatted.to_owned()));
        }
    }

    /// Waits until every record queued so far has been delivered and the
    /// wrapped sink flushed.
    fn flush(&mut self) {
        let Some(queue) = &self.queue else {
            return;
        };
        let (done, wait) = mpsc::sync_channel(1);
        if queue.send(Message::Flush(done)).is_ok() {
            let _ = wait.recv();
        }
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        // Closing the queue ends the worker's loop once the backlog is drained.
        self.queue.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("async sink worker panicked; queued records were lost");
            }
        }
    }
}
