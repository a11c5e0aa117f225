//! Macros for error creation and handling
//!
//! Unlike the constructors, the macros also record the enclosing function.

/// Name of the function a probe item was declared in
///
/// `type_name` of a nested fn item reads `path::to::enclosing::probe`, with
/// one `{{closure}}` segment per enclosing closure.
#[doc(hidden)]
#[must_use]
pub fn __strip_probe(name: &'static str) -> &'static str {
    let mut name = name.strip_suffix("::__probe").unwrap_or(name);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}

/// Path of the enclosing function
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __probe() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::macros::__strip_probe(__type_name_of(__probe))
    }};
}

/// Create a [`Detailed`](crate::Detailed) from a format string, recording
/// file, line and enclosing function
#[macro_export]
macro_rules! detail {
    ($($arg:tt)+) => {
        $crate::Detailed::at(
            $crate::Location::caller_in($crate::__function_name!()),
            $crate::Message::new(::std::format!($($arg)+)),
        )
    };
}

/// Wrap an error, recording file, line and enclosing function
#[macro_export]
macro_rules! wrap {
    ($err:expr $(,)?) => {
        $crate::Detailed::at(
            $crate::Location::caller_in($crate::__function_name!()),
            $err,
        )
    };
}

/// Return early with a [`detail!`] error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)+) => {
        return ::std::result::Result::Err($crate::detail!($($arg)+).into())
    };
}

/// Return early with a [`detail!`] error unless a condition holds
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::bail!($($arg)+);
        }
    };
}
