use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;

use crate::async_sink::AsyncSink;
use crate::logger::{MtLogger, StLogger};
use crate::sink::{Sink, SinkMt, SinkSt};

/// Error returned by [`Registry`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A logger with this name is already registered.
    AlreadyExists(String),
    /// The async delivery worker could not be started.
    WorkerSpawn(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyExists(name) => write!(f, "logger with name '{}' already exists", name),
            RegistryError::WorkerSpawn(reason) => write!(f, "failed to start async sink worker: {}", reason),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<RegistryError> for io::Error {
    fn from(err: RegistryError) -> Self {
        let kind = match err {
            RegistryError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            RegistryError::WorkerSpawn(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

/// A logger as stored in the registry.
#[derive(Clone)]
pub enum RegisteredLogger {
    Single(Rc<StLogger>),
    Shared(Rc<MtLogger>),
}

impl RegisteredLogger {
    pub fn name(&self) -> &str {
        match self {
            RegisteredLogger::Single(logger) => logger.name(),
            RegisteredLogger::Shared(logger) => logger.name(),
        }
    }
}

/// Named loggers owned by the benchmark driver.
///
/// The registry maps names to loggers and decides how newly created loggers
/// deliver their records. After [`set_async_mode`](Self::set_async_mode),
/// every logger created gets its sink wrapped in an [`AsyncSink`] with the
/// configured queue capacity; loggers created earlier are unaffected.
///
/// Dropping a logger from the registry releases the registry's reference. The
/// logger itself, and its sink, go away once the last `Rc` the caller holds is
/// gone.
#[derive(Default)]
pub struct Registry {
    loggers: HashMap<String, RegisteredLogger>,
    async_queue_size: Option<usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every logger created from now on deliver through a queue of `queue_size` records.
    pub fn set_async_mode(&mut self, queue_size: usize) {
        self.async_queue_size = Some(queue_size);
    }

    /// Goes back to delivering records on the calling thread.
    pub fn set_sync_mode(&mut self) {
        self.async_queue_size = None;
    }

    pub fn async_queue_size(&self) -> Option<usize> {
        self.async_queue_size
    }

    /// Creates and registers a logger confined to the calling thread.
    pub fn create_st(&mut self, name: &str, sink: impl Sink) -> Result<Rc<StLogger>, RegistryError> {
        self.ensure_free(name)?;
        let logger = Rc::new(StLogger::new(name, SinkSt::new(self.wrap(sink)?)));
        self.loggers.insert(name.to_string(), RegisteredLogger::Single(logger.clone()));
        Ok(logger)
    }

    /// Creates and registers a logger that may be shared between threads.
    pub fn create_mt(&mut self, name: &str, sink: impl Sink) -> Result<Rc<MtLogger>, RegistryError> {
        self.ensure_free(name)?;
        let logger = Rc::new(MtLogger::new(name, SinkMt::new(self.wrap(sink)?)));
        self.loggers.insert(name.to_string(), RegisteredLogger::Shared(logger.clone()));
        Ok(logger)
    }

    pub fn get(&self, name: &str) -> Option<RegisteredLogger> {
        self.loggers.get(name).cloned()
    }

    /// Removes `name` from the registry. Returns whether it was registered.
    pub fn drop_logger(&mut self, name: &str) -> bool {
        self.loggers.remove(name).is_some()
    }

    pub fn drop_all(&mut self) {
        self.loggers.clear();
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    fn ensure_free(&self, name: &str) -> Result<(), RegistryError> {
        if self.loggers.contains_key(name) {
            Err(RegistryError::AlreadyExists(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn wrap(&self, sink: impl Sink) -> Result<Box<dyn Sink>, RegistryError> {
        match self.async_queue_size {
            Some(queue_size) => {
                let queued = AsyncSink::spawn(sink, queue_size).map_err(|err| RegistryError::WorkerSpawn(err.to_string()))?;
                Ok(Box::new(queued))
            }
            None => Ok(Box::new(sink)),
        }
    }
}
