use std::fmt::Display;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use observable::{Observer, Teardown};
use tracing::Level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    // if LOG_LEVEL env var is set, use it
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        tracing_subscriber::fmt().with_max_level(Level::from_str(&level).unwrap()).with_test_writer().init();
    } else {
        tracing_subscriber::fmt().with_max_level(Level::INFO).with_test_writer().init();
    }
}

/// Shared, ordered log of everything that happened during a test: caller lines, observer
/// notifications and teardowns all land in the same sequence.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

#[allow(unused)]
impl Recorder {
    pub fn new() -> Self { Self::default() }

    pub fn push(&self, line: impl Into<String>) { self.0.lock().unwrap().push(line.into()); }

    /// Drain and return everything recorded so far
    pub fn take(&self) -> Vec<String> { self.0.lock().unwrap().drain(..).collect() }

    pub fn count(&self, line: &str) -> usize { self.0.lock().unwrap().iter().filter(|l| *l == line).count() }

    /// An observer that records `next <value>`, `error <err>` and `complete`
    pub fn observer<T: Display + 'static, E: Display + 'static>(&self) -> Observer<T, E> {
        let (n, e, c) = (self.clone(), self.clone(), self.clone());
        Observer::new()
            .on_next(move |value: T| n.push(format!("next {value}")))
            .on_error(move |err: E| e.push(format!("error {err}")))
            .on_complete(move || c.push("complete"))
    }

    /// A next-only observer recording `next <value>`
    pub fn next_only<T: Display + 'static>(&self) -> Box<dyn Fn(T) + Send + Sync + 'static> {
        let recorder = self.clone();
        Box::new(move |value: T| recorder.push(format!("next {value}")))
    }

    /// A teardown recording `teardown`
    pub fn teardown(&self) -> Teardown {
        let recorder = self.clone();
        Teardown::new(move || recorder.push("teardown"))
    }
}
