//! Channel wrapping an externally supplied callback

use super::AlertChannel;
use crate::domain::Alert;
use crate::error::{ChannelError, HandlerError};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

type Handler = dyn Fn(&Alert) -> Result<(), HandlerError> + Send + Sync;

/// Delivers alerts through a user callback.
///
/// Errors and panics raised by the callback are converted into a
/// [`ChannelError`] tagged with the name the handler was registered under.
pub struct CustomHandlerChannel {
    name: String,
    handler: Box<Handler>,
}

impl CustomHandlerChannel {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Alert) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Box::new(handler),
        }
    }
}

impl AlertChannel for CustomHandlerChannel {
    fn send(&self, alert: &Alert) -> Result<(), ChannelError> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(alert))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into_channel_error(&self.name)),
            Err(payload) => Err(ChannelError::HandlerUnexpected {
                name: self.name.clone(),
                message: format!("panic: {}", panic_message(payload.as_ref())),
            }),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
