//! Unwrapping decorations back to the native error

use detailed::{base, origin, Detailed, Message, SharedError, Verbosity};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;

#[derive(Debug)]
struct Outer {
    inner: io::Error,
}

impl fmt::Display for Outer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outer")
    }
}

impl StdError for Outer {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.inner)
    }
}

/// Peel decorations by hand, the long way
fn unwrap_by_hand<'a>(mut err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    while let Some(detailed) = err.downcast_ref::<Detailed>() {
        err = detailed.origin();
    }
    err
}

#[test]
fn origin_of_wrap_is_the_wrapped_error() {
    let err = Detailed::wrap(io::Error::new(io::ErrorKind::NotFound, "gone"));

    let leaf = origin(&err);
    let io_err = leaf.downcast_ref::<io::Error>();
    assert_eq!(io_err.map(io::Error::kind), Some(io::ErrorKind::NotFound));
    assert!(std::ptr::eq(
        (leaf as *const dyn StdError).cast::<u8>(),
        (unwrap_by_hand(&err) as *const dyn StdError).cast::<u8>()
    ));
}

#[test]
fn origin_of_new_is_the_message() {
    let err = Detailed::new("plain");
    assert_eq!(
        err.base_downcast_ref::<Message>().map(Message::as_str),
        Some("plain")
    );
    assert!(err.base_is::<Message>());
    assert!(!err.base_is::<io::Error>());
}

#[test]
fn non_decorated_errors_are_returned_unchanged() {
    let plain = io::Error::new(io::ErrorKind::Other, "plain");
    let leaf = origin(&plain);
    assert!(std::ptr::eq(
        (leaf as *const dyn StdError).cast::<u8>(),
        (&plain as *const io::Error).cast::<u8>()
    ));
}

#[test]
fn base_is_an_alias_of_origin() {
    let err = Detailed::wrap(io::Error::new(io::ErrorKind::Other, "x"));
    assert!(base(&err).is::<io::Error>());
    assert!(err.base().is::<io::Error>());
}

#[test]
fn wrap_is_idempotent() {
    let once = Detailed::wrap(io::Error::new(io::ErrorKind::Other, "once"));
    let twice = Detailed::wrap(once.clone());

    assert!(twice.ptr_eq(&once));
    assert_eq!(twice.to_string(), once.to_string());
    assert_eq!(twice.render(Verbosity::Located), once.render(Verbosity::Located));
    assert!(origin(&twice).is::<io::Error>());
}

#[test]
fn wrap_sees_through_shared_handles() {
    let inner = Detailed::new("shared");
    let shared: SharedError = Arc::new(inner.clone());
    let wrapped = Detailed::wrap(shared);
    assert!(wrapped.ptr_eq(&inner));
}

#[test]
fn origin_is_structural_not_textual() {
    // A plain error whose text happens to look like a decoration
    let lookalike = Message::new("error 1 @ src/lib.rs:1");
    let err = Detailed::wrap(lookalike.clone());
    assert_eq!(err.base_downcast_ref::<Message>(), Some(&lookalike));
}

#[test]
fn source_chain_passes_through_the_decoration() {
    let err = Detailed::wrap(Outer {
        inner: io::Error::new(io::ErrorKind::Other, "inner"),
    });

    let source = err.source().map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("inner"));
    assert!(Detailed::new("leaf").source().is_none());
}

#[test]
fn anyhow_can_carry_and_return_a_decoration() {
    let err = Detailed::new("through anyhow").with_annotation("context");
    let any: anyhow::Error = err.clone().into();

    assert_eq!(any.to_string(), "context: through anyhow");
    let back = any.downcast_ref::<Detailed>();
    assert!(back.is_some_and(|detailed| detailed.ptr_eq(&err)));
}
