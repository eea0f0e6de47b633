/// Handler for `next` notifications. Called any number of times.
pub type NextHandler<T> = Box<dyn Fn(T) + Send + Sync + 'static>;
/// Handler for the `error` notification. Called at most once.
pub type ErrorHandler<E> = Box<dyn FnOnce(E) + Send + 'static>;
/// Handler for the `complete` notification. Called at most once.
pub type CompleteHandler = Box<dyn FnOnce() + Send + 'static>;

/// The caller's set of notification handlers.
///
/// Every slot is optional. A missing `next` or `complete` handler makes that notification a no-op.
/// A missing `error` handler means error notifications are silently dropped: they are neither
/// returned nor raised to anybody, only recorded at debug level.
///
/// ```rust
/// use observable::Observer;
///
/// let observer: Observer<String, String> = Observer::new()
///     .on_next(|value: String| println!("{value}"))
///     .on_complete(|| println!("Subscription completed!"));
/// assert!(!observer.has_error_handler());
/// ```
pub struct Observer<T, E> {
    pub(crate) next: Option<NextHandler<T>>,
    pub(crate) error: Option<ErrorHandler<E>>,
    pub(crate) complete: Option<CompleteHandler>,
}

impl<T, E> Default for Observer<T, E> {
    fn default() -> Self { Self::new() }
}

impl<T, E> Observer<T, E> {
    /// An observer with no handlers at all.
    pub fn new() -> Self { Self { next: None, error: None, complete: None } }

    /// Build an observer from positional, individually optional handlers.
    pub fn from_parts(next: Option<NextHandler<T>>, error: Option<ErrorHandler<E>>, complete: Option<CompleteHandler>) -> Self {
        Self { next, error, complete }
    }

    pub fn on_next<F>(mut self, handler: F) -> Self
    where F: Fn(T) + Send + Sync + 'static {
        self.next = Some(Box::new(handler));
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> Self
    where F: FnOnce(E) + Send + 'static {
        self.error = Some(Box::new(handler));
        self
    }

    pub fn on_complete<F>(mut self, handler: F) -> Self
    where F: FnOnce() + Send + 'static {
        self.complete = Some(Box::new(handler));
        self
    }

    pub fn has_next_handler(&self) -> bool { self.next.is_some() }
    pub fn has_error_handler(&self) -> bool { self.error.is_some() }
    pub fn has_complete_handler(&self) -> bool { self.complete.is_some() }
}

impl<T, E> std::fmt::Debug for Observer<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("next", &self.has_next_handler())
            .field("error", &self.has_error_handler())
            .field("complete", &self.has_complete_handler())
            .finish()
    }
}

/// Anything that can be normalized into an [`Observer`] at the subscribe boundary.
pub trait IntoObserver<T, E> {
    fn into_observer(self) -> Observer<T, E>;
}

impl<T, E> IntoObserver<T, E> for Observer<T, E> {
    fn into_observer(self) -> Observer<T, E> { self }
}

// A bare closure is a next-only observer
impl<F, T, E> IntoObserver<T, E> for F
where F: Fn(T) + Send + Sync + 'static
{
    fn into_observer(self) -> Observer<T, E> { Observer::new().on_next(self) }
}
