//! Call-site and call-stack capture
//!
//! Call sites come from `#[track_caller]`, so the recorded position is always
//! the user's code and never one of this crate's helpers. Stack frames come
//! from the `backtrace` crate (feature `stack-capture`); the unwinder's and
//! this crate's own frames are dropped before the bounded window is taken.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::panic::Location as PanicLocation;
use std::sync::Arc;

use crate::paths;

/// Number of frames kept by the stack-capturing constructors
pub const DEFAULT_STACK_DEPTH: usize = 7;

/// Placeholder used for frames whose symbol could not be resolved
pub const UNKNOWN_FUNCTION: &str = "<unknown>";

/// Source position recorded when a decoration is created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    file: &'static str,
    line: u32,
    column: u32,
    function: Option<Cow<'static, str>>,
}

impl Location {
    /// Location of the caller of the enclosing `#[track_caller]` chain
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Self::from_panic_location(PanicLocation::caller(), None)
    }

    /// Same as [`Location::caller`], also naming the enclosing function
    #[track_caller]
    #[must_use]
    pub fn caller_in(function: &'static str) -> Self {
        Self::from_panic_location(PanicLocation::caller(), Some(Cow::Borrowed(function)))
    }

    /// Name the enclosing function unless one is already recorded
    pub(crate) fn or_function(mut self, function: impl FnOnce() -> Option<String>) -> Self {
        if self.function.is_none() {
            self.function = function().map(Cow::Owned);
        }
        self
    }

    fn from_panic_location(
        location: &'static PanicLocation<'static>,
        function: Option<Cow<'static, str>>,
    ) -> Self {
        Self {
            file: paths::trim(location.file()),
            line: location.line(),
            column: location.column(),
            function,
        }
    }

    /// Source file, with the build root stripped
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// 1-based line number
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column number
    #[must_use]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Enclosing function, recorded by the macros or taken from the first
    /// captured stack frame
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One captured call frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    function: String,
    file: Option<String>,
    line: Option<u32>,
}

impl Frame {
    /// Build a frame by hand
    pub fn new<S: Into<String>>(function: S, file: Option<String>, line: Option<u32>) -> Self {
        Self {
            function: function.into(),
            file,
            line,
        }
    }

    #[cfg(feature = "stack-capture")]
    fn from_symbol(symbol: &backtrace::Symbol) -> Self {
        Self {
            function: symbol
                .name()
                .map_or_else(|| UNKNOWN_FUNCTION.to_owned(), |name| format!("{name:#}")),
            file: symbol
                .filename()
                .map(|path| paths::trim(&path.to_string_lossy()).to_owned()),
            line: symbol.lineno(),
        }
    }

    /// Demangled function name, without the symbol hash
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Source file, with the build root stripped
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Line number, if debug info was available
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// Whether the frame belongs to the unwinder or to this crate
    #[cfg_attr(not(feature = "stack-capture"), allow(dead_code))]
    fn is_internal(&self) -> bool {
        const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");
        const CRATE_TRAIT: &str = concat!(" as ", env!("CARGO_CRATE_NAME"), "::");
        let name = self.function.trim_start_matches('<');
        name.starts_with("backtrace::")
            || name.starts_with(CRATE_PREFIX)
            || name.contains(CRATE_TRAIT)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.function, self.file.as_deref().unwrap_or("?"))?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        Ok(())
    }
}

/// Ordered call frames, innermost first, outermost caller last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    frames: Arc<[Frame]>,
}

impl Stack {
    /// Frames the walk may spend on the unwinder and this crate before giving up
    #[cfg_attr(not(feature = "stack-capture"), allow(dead_code))]
    const INTERNAL_FRAME_ALLOWANCE: usize = 32;

    /// An empty stack
    #[must_use]
    pub fn empty() -> Self {
        Self::from(Vec::new())
    }

    /// Walk the current thread's stack and keep up to `depth` frames above
    /// the unwinder and this crate
    ///
    /// An unsupported platform or missing symbols yield an empty stack.
    #[cfg(feature = "stack-capture")]
    #[inline(never)]
    #[must_use]
    pub fn capture(depth: usize) -> Self {
        let limit = depth.saturating_add(Self::INTERNAL_FRAME_ALLOWANCE);
        let mut resolved =
            Vec::with_capacity(limit.min(DEFAULT_STACK_DEPTH + Self::INTERNAL_FRAME_ALLOWANCE));
        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| resolved.push(Frame::from_symbol(symbol)));
            resolved.len() < limit
        });

        let frames = Self::above_internal(resolved, depth);
        if frames.is_empty() && depth > 0 {
            log::debug!("stack capture yielded no frames (depth {depth})");
        }
        Self::from(frames)
    }

    /// Stack capture is compiled out; always empty
    #[cfg(not(feature = "stack-capture"))]
    #[must_use]
    pub fn capture(depth: usize) -> Self {
        log::debug!("stack capture disabled, dropping request for {depth} frames");
        Self::empty()
    }

    /// Up to `depth` frames following the innermost run of unwinder and
    /// crate frames
    ///
    /// Crate frames further out (a renderer calling back into user code)
    /// belong to the caller's history and are kept.
    #[cfg_attr(not(feature = "stack-capture"), allow(dead_code))]
    fn above_internal(resolved: Vec<Frame>, depth: usize) -> Vec<Frame> {
        let start = match resolved.iter().position(Frame::is_internal) {
            Some(first) => {
                first
                    + resolved[first..]
                        .iter()
                        .take_while(|frame| frame.is_internal())
                        .count()
            }
            None => 0,
        };
        resolved.into_iter().skip(start).take(depth).collect()
    }

    /// The captured frames
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl From<Vec<Frame>> for Stack {
    fn from(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Stack {
    type Target = [Frame];

    fn deref(&self) -> &[Frame] {
        &self.frames
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_display_falls_back_on_missing_debug_info() {
        let full = Frame::new("app::run", Some("src/main.rs".to_owned()), Some(12));
        assert_eq!(full.to_string(), "app::run @ src/main.rs:12");

        let bare = Frame::new(UNKNOWN_FUNCTION, None, None);
        assert_eq!(bare.to_string(), "<unknown> @ ?");
    }

    #[test]
    fn internal_frames_are_recognised() {
        assert!(Frame::new("backtrace::backtrace::trace", None, None).is_internal());
        assert!(Frame::new("detailed::capture::Stack::capture", None, None).is_internal());
        assert!(
            Frame::new("<detailed::types::Detailed as core::fmt::Display>::fmt", None, None)
                .is_internal()
        );
        assert!(Frame::new(
            "<core::result::Result<T,E> as detailed::extensions::ResultExt<T>>::detailed",
            None,
            None
        )
        .is_internal());
        assert!(!Frame::new("app::handler", None, None).is_internal());
    }

    #[test]
    fn only_the_innermost_internal_run_is_dropped() {
        let frames = [
            "backtrace::backtrace::trace",
            "detailed::capture::Stack::capture",
            "detailed::constructors::<impl detailed::types::Detailed>::new_with_stack",
            "app::Report::fmt",
            "detailed::display::write_error",
            "app::main",
        ]
        .into_iter()
        .map(|name| Frame::new(name, None, None))
        .collect();

        let kept: Vec<String> = Stack::above_internal(frames, 10)
            .iter()
            .map(|frame| frame.function().to_owned())
            .collect();
        assert_eq!(
            kept,
            ["app::Report::fmt", "detailed::display::write_error", "app::main"]
        );
    }

    #[test]
    fn frames_without_crate_symbols_are_kept_from_the_top() {
        let frames = vec![
            Frame::new(UNKNOWN_FUNCTION, None, None),
            Frame::new("app::main", None, None),
        ];
        assert_eq!(Stack::above_internal(frames, 1).len(), 1);
    }

    #[test]
    fn location_records_this_line() {
        let location = Location::caller_in("capture::tests");
        assert_eq!(location.line(), 341);
        assert_eq!(location.function(), Some("capture::tests"));
        assert_eq!(location.to_string(), format!("{}:341", location.file()));
    }
}
