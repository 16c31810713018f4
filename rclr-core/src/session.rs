//! The process-wide conversion session.
//!
//! R allows a single interpreter per process, so there is a single session: it
//! owns the converter (and with it the retention arena) and serializes calls on a
//! lock held for the whole top-level conversion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::converter::Converter;
use crate::engine::Engine;
use crate::types::{Conversion, ConvertError, ConverterConfig, HostValue};

static CLAIMED: AtomicBool = AtomicBool::new(false);

/// Session error types.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Another session is live in this process.
    #[error("an interpreter session is already running in this process")]
    AlreadyRunning,

    /// A previous call panicked while holding the converter.
    #[error("session lock poisoned by an earlier panic")]
    Poisoned,

    /// The conversion itself failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl SessionError {
    pub fn error_type(&self) -> &'static str {
        match self {
            SessionError::AlreadyRunning => "already_running",
            SessionError::Poisoned => "poisoned",
            SessionError::Convert(e) => e.error_type(),
        }
    }
}

pub type SessionResult<T> = std::result::Result<T, SessionError>;

pub struct Session<E: Engine> {
    converter: Mutex<Converter<E>>,
}

impl<E: Engine> Session<E> {
    /// Claim the process-wide session. Fails with [`SessionError::AlreadyRunning`]
    /// while another session is alive.
    pub fn start(engine: E, config: ConverterConfig) -> SessionResult<Self> {
        if CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SessionError::AlreadyRunning);
        }
        log::info!(
            "conversion session started (vectors: {}, value types: {})",
            config.convert_vectors,
            config.convert_value_types
        );
        Ok(Self {
            converter: Mutex::new(Converter::with_config(engine, config)),
        })
    }

    pub fn is_running() -> bool {
        CLAIMED.load(Ordering::Acquire)
    }

    /// [`Converter::convert_to_r`] under the session lock.
    pub fn convert_to_r(&self, value: HostValue) -> SessionResult<Conversion> {
        Ok(self.with_converter(|conv| conv.convert_to_r(value))??)
    }

    /// Run `f` with exclusive access to the converter.
    pub fn with_converter<R>(&self, f: impl FnOnce(&mut Converter<E>) -> R) -> SessionResult<R> {
        let mut conv = self.converter.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&mut conv))
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        CLAIMED.store(false, Ordering::Release);
        log::info!("conversion session ended");
    }
}
