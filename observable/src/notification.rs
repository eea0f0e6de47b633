use std::sync::atomic::{AtomicBool, Ordering};

/// A single message pushed from a producer towards an observer.
///
/// `Next` may repeat; `Error` and `Complete` are terminal and at most one of them is ever
/// delivered per subscription, after which nothing else is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T, E> {
    Next(T),
    Error(E),
    Complete,
}

impl<T, E> Notification<T, E> {
    /// True for `Error` and `Complete`.
    pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Next(_) => NotificationKind::Next,
            Notification::Error(_) => NotificationKind::Error,
            Notification::Complete => NotificationKind::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Next,
    Error,
    Complete,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Next => write!(f, "next"),
            NotificationKind::Error => write!(f, "error"),
            NotificationKind::Complete => write!(f, "complete"),
        }
    }
}

/// One-way open -> closed latch.
///
/// `close` reports whether this particular call performed the transition, so exactly one caller
/// ever wins it no matter how many race for it.
#[derive(Debug, Default)]
pub(crate) struct Gate(AtomicBool);

impl Gate {
    pub fn new() -> Self { Self(AtomicBool::new(false)) }

    pub fn is_closed(&self) -> bool { self.0.load(Ordering::SeqCst) }

    /// Returns true only for the call that closed the gate.
    pub fn close(&self) -> bool { !self.0.swap(true, Ordering::SeqCst) }
}
