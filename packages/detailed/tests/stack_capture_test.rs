//! Bounded call-stack capture

use detailed::{Detailed, Location, Message, ResultExt, Stack, Verbosity, DEFAULT_STACK_DEPTH};
use std::io;

#[inline(never)]
fn capture_here() -> Detailed {
    Detailed::new_with_stack("with stack")
}

#[inline(never)]
fn failing_read() -> Result<(), Detailed> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "short read")).detailed_with_stack()
}

#[test]
fn stack_is_empty_unless_requested() {
    assert!(Detailed::new("plain").stack().is_empty());
    assert!(Detailed::wrap(io::Error::new(io::ErrorKind::Other, "io"))
        .stack()
        .is_empty());
}

#[test]
fn stack_is_bounded() {
    let err = capture_here();
    assert!(err.stack().len() <= DEFAULT_STACK_DEPTH);
    assert!(Stack::capture(2).len() <= 2);
    assert!(Stack::capture(0).is_empty());
}

#[cfg(feature = "stack-capture")]
#[test]
fn stack_starts_at_the_caller() {
    let err = capture_here();
    let first = err.stack().first();
    assert!(first.is_some(), "no frames captured");
    if let Some(first) = first {
        assert!(first.function().contains("capture_here"), "{first}");
    }
    for frame in err.stack() {
        assert!(!frame.function().starts_with("backtrace::"), "{frame}");
        assert!(!frame.function().starts_with("detailed::"), "{frame}");
    }
}

#[cfg(feature = "stack-capture")]
#[test]
fn first_frame_names_the_function() {
    let err = capture_here();
    let first = err.stack().first().map(|frame| frame.function().to_owned());
    assert_eq!(err.location().function().map(str::to_owned), first);
}

#[test]
fn explicit_function_names_are_kept() {
    let err = Detailed::at(Location::caller_in("app::load"), Message::new("x"));
    assert_eq!(err.location().function(), Some("app::load"));
    assert!(Detailed::new("plain").location().function().is_none());
}

#[test]
fn huge_depth_degrades_instead_of_failing() {
    let stack = Stack::capture(usize::MAX);
    for frame in &stack {
        assert!(!frame.function().starts_with("backtrace::"), "{frame}");
        assert!(!frame.function().starts_with("detailed::"), "{frame}");
    }
}

#[cfg(feature = "stack-capture")]
#[test]
fn extension_trait_captures_from_its_caller() {
    let err = failing_read().unwrap_err();
    assert!(err
        .stack()
        .first()
        .is_some_and(|frame| frame.function().contains("failing_read")));
}

#[test]
fn full_rendering_lists_the_stack_in_order() {
    let err = capture_here();
    let located = err.render(Verbosity::Located);
    let full = err.render(Verbosity::Full);

    if err.stack().is_empty() {
        assert_eq!(full, located);
        return;
    }

    let function = err.location().function().unwrap_or_default();
    let heading = format!("with stack @ {function} in {}", err.location());
    let mut lines = full.lines();
    assert_eq!(lines.next(), Some(heading.as_str()));
    assert_eq!(lines.next(), Some("Call stack:"));
    let frames: Vec<String> = err.stack().iter().map(|frame| format!("  {frame}")).collect();
    assert_eq!(lines.map(str::to_owned).collect::<Vec<_>>(), frames);
    assert_eq!(format!("{err:#}"), full);
}

#[test]
fn nested_errors_do_not_repeat_their_stacks() {
    let inner = capture_here();
    let outer = Detailed::new("outer").caused_by(inner.clone());
    let full = outer.render(Verbosity::Full);
    assert!(!full.contains("Call stack:"));
    assert!(full.contains(&inner.render(Verbosity::Located)));
}

#[test]
fn wrap_with_stack_is_idempotent() {
    let err = capture_here();
    let again = Detailed::wrap_with_stack(err.clone());
    assert!(again.ptr_eq(&err));
    assert_eq!(again.stack(), err.stack());
}
