//! Build-root trimming for captured file paths
//!
//! Every file recorded by a location or a stack frame is shortened by a
//! process-wide build root. The root is fixed once: either explicitly through
//! [`init`] at startup, or lazily on first use from where this crate's own
//! sources sit inside the workspace. When no root can be worked out, paths are
//! left as they are.

use once_cell::sync::OnceCell;
use std::path::{Path, MAIN_SEPARATOR};
use thiserror::Error;

static BUILD_ROOT: OnceCell<Option<String>> = OnceCell::new();

/// Errors raised while configuring the build root
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathsError {
    /// The root was already fixed, explicitly or by a first capture
    #[error("build root already initialized to {current:?}")]
    AlreadyInitialized {
        /// Root currently in effect
        current: Option<String>,
    },

    /// An empty root would strip nothing
    #[error("build root must not be empty")]
    EmptyRoot,
}

/// Fix the build root explicitly
///
/// Must run before the first error is constructed; afterwards the lazily
/// detected root is already in place and this returns
/// [`PathsError::AlreadyInitialized`].
pub fn init<S: Into<String>>(root: S) -> Result<(), PathsError> {
    let mut root = root.into();
    if root.is_empty() {
        return Err(PathsError::EmptyRoot);
    }
    if !root.ends_with(|c| c == '/' || c == '\\') {
        root.push(MAIN_SEPARATOR);
    }

    BUILD_ROOT
        .set(Some(root))
        .map_err(|_| PathsError::AlreadyInitialized {
            current: build_root().map(str::to_owned),
        })?;
    log::debug!("build root initialized to {:?}", build_root());
    Ok(())
}

/// The build root in effect, detecting it on first call
pub fn build_root() -> Option<&'static str> {
    BUILD_ROOT.get_or_init(detect).as_deref()
}

/// Strip the build root from `file`, if it starts with it
#[must_use]
pub fn trim(file: &str) -> &str {
    match build_root() {
        Some(root) => file.strip_prefix(root).unwrap_or(file),
        None => file,
    }
}

/// Derive the root from this file's position relative to the crate manifest
fn detect() -> Option<String> {
    let crate_dir = Path::new(file!()).parent()?.parent()?;
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    if !manifest_dir.ends_with(crate_dir) {
        log::debug!("build root not resolvable from {}", file!());
        return None;
    }

    let root = manifest_dir.ancestors().nth(crate_dir.components().count())?;
    let mut root = root.to_str()?.to_owned();
    if root.is_empty() {
        return None;
    }
    if !root.ends_with(MAIN_SEPARATOR) {
        root.push(MAIN_SEPARATOR);
    }
    Some(root)
}
