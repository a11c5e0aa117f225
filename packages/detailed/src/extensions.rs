//! Extension traits for decorating `Result` and `Option` in place

use std::error::Error as StdError;

use crate::types::{Detailed, Message};

/// Decorate the error side of a `Result` at the caller's location
pub trait ResultExt<T> {
    /// Wrap the error, recording where this was called
    fn detailed(self) -> Result<T, Detailed>;

    /// Wrap the error and capture the call stack as well
    fn detailed_with_stack(self) -> Result<T, Detailed>;

    /// Wrap the error and set its annotation
    fn annotate<S: AsRef<str>>(self, text: S) -> Result<T, Detailed>;

    /// Wrap the error and set its single cause
    fn caused_by<C>(self, cause: C) -> Result<T, Detailed>
    where
        C: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    fn detailed(self) -> Result<T, Detailed> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Detailed::wrap(err)),
        }
    }

    #[track_caller]
    fn detailed_with_stack(self) -> Result<T, Detailed> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Detailed::wrap_with_stack(err)),
        }
    }

    #[track_caller]
    fn annotate<S: AsRef<str>>(self, text: S) -> Result<T, Detailed> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Detailed::wrap(err).with_annotation(text)),
        }
    }

    #[track_caller]
    fn caused_by<C>(self, cause: C) -> Result<T, Detailed>
    where
        C: StdError + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Detailed::wrap(err).caused_by(cause)),
        }
    }
}

/// Turn a missing value into a located error
pub trait OptionExt<T> {
    /// `None` becomes a [`Detailed`] carrying `message`
    fn detailed_none<S: Into<String>>(self, message: S) -> Result<T, Detailed>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn detailed_none<S: Into<String>>(self, message: S) -> Result<T, Detailed> {
        match self {
            Some(value) => Ok(value),
            None => Err(Detailed::wrap(Message::new(message))),
        }
    }
}
