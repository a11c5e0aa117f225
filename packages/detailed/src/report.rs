//! Serializable snapshot of a decoration tree, for structured log sinks

use serde::Serialize;
use std::error::Error as StdError;

use crate::capture::{Frame, Location};
use crate::display::{render, Verbosity};
use crate::types::Detailed;

/// Snapshot of one error and everything attached to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Terse rendering of the whole node
    pub message: String,
    /// Annotation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Terse text of the decorated error
    pub origin: String,
    /// Creation site; absent for plain errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Captured frames, innermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<Frame>,
    /// The single antecedent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<Report>>,
    /// Related errors, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<Report>,
}

impl Report {
    /// Snapshot any error; plain errors carry only their text
    #[must_use]
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        match err.downcast_ref::<Detailed>() {
            Some(detailed) => detailed.report(),
            None => {
                let text = err.to_string();
                Self {
                    message: text.clone(),
                    annotation: None,
                    origin: text,
                    location: None,
                    stack: Vec::new(),
                    cause: None,
                    related: Vec::new(),
                }
            }
        }
    }
}

impl Detailed {
    /// Snapshot this decoration, its cause and related errors
    #[must_use]
    pub fn report(&self) -> Report {
        Report {
            message: self.render(Verbosity::Terse),
            annotation: self.annotation().map(str::to_owned),
            origin: render(self.origin(), Verbosity::Terse),
            location: Some(self.location().clone()),
            stack: self.stack().to_vec(),
            cause: self
                .cause()
                .map(|cause| Box::new(Report::from_error(cause))),
            related: self
                .related()
                .iter()
                .map(|err| Report::from_error(&**err))
                .collect(),
        }
    }
}
