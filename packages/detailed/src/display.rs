//! Rendering and trait implementations for Detailed
//!
//! One render routine serves every verbosity. The standard formatting hooks
//! map onto it: `{}` is terse, `{:+}` located, `{:#}` and `{:?}` full.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::Detailed;

/// Environment variable read by [`Verbosity::from_env`]
pub const VERBOSITY_ENV: &str = "DETAILED_VERBOSITY";

/// How much context a rendering carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Annotation, origin text and causes
    #[default]
    Terse,
    /// Terse text with one `@ file:line` per decoration
    Located,
    /// Located text naming the enclosing function when known, followed by
    /// the captured call stack
    Full,
    /// Terse text as a quoted, escaped string literal
    Quoted,
}

/// A rendering directive that names no [`Verbosity`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported rendering directive `{directive}`")]
pub struct InvalidVerb {
    directive: String,
}

impl InvalidVerb {
    /// The directive with any leading `%` removed
    #[must_use]
    pub fn verb(&self) -> &str {
        self.directive.trim_start_matches('%')
    }
}

impl FromStr for Verbosity {
    type Err = InvalidVerb;

    /// Accepts printf-style directives (`%s`, `%v`, `%+v`, `%#v`, `%q`, with
    /// or without the `%`) and the variant names
    ///
    /// Directives are case-sensitive; variant names are not.
    fn from_str(directive: &str) -> Result<Self, Self::Err> {
        let verb = directive.trim().trim_start_matches('%');
        match verb {
            "s" | "v" => return Ok(Self::Terse),
            "+v" => return Ok(Self::Located),
            "#v" => return Ok(Self::Full),
            "q" => return Ok(Self::Quoted),
            _ => {}
        }
        match verb.to_ascii_lowercase().as_str() {
            "terse" => Ok(Self::Terse),
            "located" => Ok(Self::Located),
            "full" => Ok(Self::Full),
            "quoted" => Ok(Self::Quoted),
            _ => Err(InvalidVerb {
                directive: directive.to_owned(),
            }),
        }
    }
}

impl Verbosity {
    /// Verbosity configured through `DETAILED_VERBOSITY`, terse when unset
    /// or unparsable
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(VERBOSITY_ENV) {
            Ok(value) => value.parse().unwrap_or_else(|err: InvalidVerb| {
                log::warn!("ignoring {VERBOSITY_ENV}: {err}");
                Self::Terse
            }),
            Err(_) => Self::Terse,
        }
    }

    /// Verbosity used for errors nested inside a rendering
    fn nested(self) -> Self {
        match self {
            Self::Full => Self::Located,
            Self::Quoted => Self::Terse,
            other => other,
        }
    }
}

impl Detailed {
    /// Render at the given verbosity
    #[must_use]
    pub fn render(&self, verbosity: Verbosity) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_to(&mut out, verbosity);
        out
    }

    /// `Display` adapter rendering at the given verbosity
    #[must_use]
    pub fn display(&self, verbosity: Verbosity) -> Rendered<'_> {
        Rendered {
            err: self,
            verbosity,
        }
    }

    /// Render for a printf-style directive such as `"%+v"`
    ///
    /// Unknown directives produce `%<verb>(invalid for <type>)` instead of
    /// failing.
    #[must_use]
    pub fn render_verb(&self, directive: &str) -> String {
        match directive.parse::<Verbosity>() {
            Ok(verbosity) => self.render(verbosity),
            Err(err) => format!(
                "%{}(invalid for {})",
                err.verb(),
                std::any::type_name::<Self>()
            ),
        }
    }

    fn write_to<W: fmt::Write>(&self, out: &mut W, verbosity: Verbosity) -> fmt::Result {
        if verbosity == Verbosity::Quoted {
            return write!(out, "{:?}", self.render(Verbosity::Terse));
        }

        let inner = &self.inner;
        let nested = verbosity.nested();
        if let Some(annotation) = &inner.annotation {
            write!(out, "{annotation}: ")?;
        }
        write_error(out, &*inner.origin, nested)?;
        match (verbosity, inner.location.function()) {
            (Verbosity::Terse, _) => {}
            (Verbosity::Full, Some(function)) => {
                write!(out, " @ {function} in {}", inner.location)?;
            }
            _ => write!(out, " @ {}", inner.location)?,
        }
        if let Some(cause) = &inner.cause {
            out.write_str(" caused by ")?;
            write_error(out, &**cause, nested)?;
        }
        for related in inner.related.iter() {
            out.write_str(" caused by ")?;
            write_error(out, &**related, nested)?;
        }

        if verbosity == Verbosity::Full && !inner.stack.is_empty() {
            out.write_str("\nCall stack:")?;
            for frame in inner.stack.iter() {
                write!(out, "\n  {frame}")?;
            }
        }
        Ok(())
    }
}

/// Decorations render at `verbosity`, anything else through `Display`
fn write_error<W: fmt::Write>(
    out: &mut W,
    err: &(dyn StdError + 'static),
    verbosity: Verbosity,
) -> fmt::Result {
    match err.downcast_ref::<Detailed>() {
        Some(detailed) => detailed.write_to(out, verbosity),
        None if verbosity == Verbosity::Quoted => write!(out, "{:?}", err.to_string()),
        None => write!(out, "{err}"),
    }
}

/// Render any error at the given verbosity
///
/// `Detailed` values use their full model; other errors have no location or
/// stack, so every verbosity but [`Verbosity::Quoted`] yields their `Display`
/// text.
#[must_use]
pub fn render(err: &(dyn StdError + 'static), verbosity: Verbosity) -> String {
    let mut out = String::new();
    let _ = write_error(&mut out, err, verbosity);
    out
}

/// A `Detailed` paired with the verbosity to print it at
#[derive(Clone, Copy)]
pub struct Rendered<'a> {
    err: &'a Detailed,
    verbosity: Verbosity,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.write_to(f, self.verbosity)
    }
}

impl fmt::Display for Detailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbosity = if f.alternate() {
            Verbosity::Full
        } else if f.sign_plus() {
            Verbosity::Located
        } else {
            Verbosity::Terse
        };
        self.write_to(f, verbosity)
    }
}

impl fmt::Debug for Detailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, Verbosity::Full)
    }
}

impl StdError for Detailed {
    /// Decorations are transparent to `source()` chains: the origin's text is
    /// already part of this error's message, so the chain continues with the
    /// origin's own source
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.origin.source()
    }
}
