//! Error constructors, builders and origin resolution

use std::error::Error as StdError;
use std::sync::Arc;

use crate::capture::{Frame, Location, Stack, DEFAULT_STACK_DEPTH};
use crate::types::{Detailed, DetailedInner, Message, SharedError};

impl Detailed {
    /// Create an error from a message, recording the caller's location
    #[track_caller]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self::decorate(Arc::new(Message::new(message)), Location::caller(), Stack::empty())
    }

    /// Same as [`Detailed::new`], also capturing up to
    /// [`DEFAULT_STACK_DEPTH`] call frames
    #[track_caller]
    pub fn new_with_stack<S: Into<String>>(message: S) -> Self {
        let location = Location::caller();
        Self::decorate(
            Arc::new(Message::new(message)),
            location,
            Stack::capture(DEFAULT_STACK_DEPTH),
        )
    }

    /// Decorate `err` with the caller's location
    ///
    /// Wrapping a value that already is a `Detailed` returns it unchanged, so
    /// decorations never stack.
    #[track_caller]
    pub fn wrap<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::at(Location::caller(), err)
    }

    /// Same as [`Detailed::wrap`], also capturing up to
    /// [`DEFAULT_STACK_DEPTH`] call frames
    #[track_caller]
    pub fn wrap_with_stack<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let location = Location::caller();
        match into_shared(err) {
            Ok(detailed) => detailed,
            Err(origin) => Self::decorate(origin, location, Stack::capture(DEFAULT_STACK_DEPTH)),
        }
    }

    /// Decorate `err` with an explicit location
    ///
    /// Used by the macros, which know the enclosing function. Idempotent like
    /// [`Detailed::wrap`].
    pub fn at<E>(location: Location, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match into_shared(err) {
            Ok(detailed) => detailed,
            Err(origin) => Self::decorate(origin, location, Stack::empty()),
        }
    }

    fn decorate(origin: SharedError, location: Location, stack: Stack) -> Self {
        let location =
            location.or_function(|| stack.first().map(|frame| frame.function().to_owned()));
        Self {
            inner: Arc::new(DetailedInner {
                annotation: None,
                origin,
                cause: None,
                related: Arc::from(Vec::new()),
                location,
                stack,
            }),
        }
    }

    /// Rebuild with one field changed, sharing everything else
    fn derive(&self, edit: impl FnOnce(&mut DetailedInner)) -> Self {
        let inner = &self.inner;
        let mut next = DetailedInner {
            annotation: inner.annotation.clone(),
            origin: Arc::clone(&inner.origin),
            cause: inner.cause.clone(),
            related: Arc::clone(&inner.related),
            location: inner.location.clone(),
            stack: inner.stack.clone(),
        };
        edit(&mut next);
        Self {
            inner: Arc::new(next),
        }
    }

    /// Set the annotation rendered before the origin text
    ///
    /// A second call replaces the first. Empty text clears the annotation.
    #[must_use]
    pub fn with_annotation<S: AsRef<str>>(&self, text: S) -> Self {
        let text = text.as_ref();
        let annotation: Option<Arc<str>> = (!text.is_empty()).then(|| Arc::from(text));
        self.derive(|inner| inner.annotation = annotation)
    }

    /// Set the single antecedent error
    ///
    /// A second call replaces the first; use [`Detailed::append_related`] to
    /// gather several errors.
    #[must_use]
    pub fn caused_by<E>(&self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let cause = share(cause);
        self.derive(|inner| inner.cause = Some(cause))
    }

    /// Append one related error
    #[must_use]
    pub fn with_related<E>(&self, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.append_related([err])
    }

    /// Append related errors, keeping their order
    ///
    /// Mixed error types can be passed as [`SharedError`] items; they are
    /// stored without an extra layer of indirection.
    #[must_use]
    pub fn append_related<I>(&self, errs: I) -> Self
    where
        I: IntoIterator,
        I::Item: StdError + Send + Sync + 'static,
    {
        let related: Vec<SharedError> = self
            .inner
            .related
            .iter()
            .cloned()
            .chain(errs.into_iter().map(share))
            .collect();
        self.derive(|inner| inner.related = Arc::from(related))
    }

    /// The annotation, if any
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.inner.annotation.as_deref()
    }

    /// The error this value directly decorates
    #[must_use]
    pub fn origin(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.inner.origin
    }

    /// The innermost error that is not a `Detailed`
    #[must_use]
    pub fn base(&self) -> &(dyn StdError + 'static) {
        origin(self.origin())
    }

    /// Whether the innermost error is a `T`
    #[must_use]
    pub fn base_is<T: StdError + 'static>(&self) -> bool {
        self.base().is::<T>()
    }

    /// The innermost error as a `T`, if it is one
    #[must_use]
    pub fn base_downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.base().downcast_ref::<T>()
    }

    /// The single antecedent, if any
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.inner.cause.as_deref()
    }

    /// Related errors, in insertion order
    #[must_use]
    pub fn related(&self) -> &[SharedError] {
        &self.inner.related
    }

    /// Where this decoration was created
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.inner.location
    }

    /// Frames captured at construction; empty unless a `*_with_stack`
    /// constructor was used
    #[must_use]
    pub fn stack(&self) -> &[Frame] {
        self.inner.stack.frames()
    }

    /// Whether both handles point at the same decoration
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Move `err` behind a shared handle, reusing one if `err` already is a
/// [`SharedError`]
pub(crate) fn share<E>(err: E) -> SharedError
where
    E: StdError + Send + Sync + 'static,
{
    let boxed: Box<dyn StdError + Send + Sync> = Box::new(err);
    match boxed.downcast::<SharedError>() {
        Ok(shared) => *shared,
        Err(other) => Arc::from(other),
    }
}

/// Hand back an existing decoration instead of nesting it
fn into_shared<E>(err: E) -> Result<Detailed, SharedError>
where
    E: StdError + Send + Sync + 'static,
{
    let shared = share(err);
    match shared.downcast_ref::<Detailed>() {
        Some(detailed) => Ok(detailed.clone()),
        None => Err(shared),
    }
}

/// Follow decorations down to the innermost non-`Detailed` error
///
/// Non-decorated errors are returned unchanged. Resolution is structural; the
/// rendered text is never inspected.
#[must_use]
pub fn origin<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut current = err;
    while let Some(detailed) = current.downcast_ref::<Detailed>() {
        current = detailed.origin();
    }
    current
}

/// Alias of [`origin`]
#[must_use]
pub fn base<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    origin(err)
}
