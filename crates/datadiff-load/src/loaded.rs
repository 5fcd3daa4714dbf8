//! Content paired with the problem met while producing it.

use crate::error::LoadError;

/// The result of loading one side of a comparison.
///
/// `content` is always usable: when `problem` is set it holds the
/// placeholder or empty substitute instead of the file's data.
#[derive(Debug)]
pub struct Loaded<T> {
    /// Loaded data, or its substitute.
    pub content: T,
    /// What went wrong, if anything.
    pub problem: Option<LoadError>,
}

impl<T> Loaded<T> {
    /// Content loaded without trouble.
    pub fn ok(content: T) -> Self {
        Self { content, problem: None }
    }

    /// Substitute content plus the error that required it.
    pub fn with_problem(content: T, problem: LoadError) -> Self {
        Self {
            content,
            problem: Some(problem),
        }
    }

    /// Returns `true` if no problem was recorded.
    pub fn is_ok(&self) -> bool {
        self.problem.is_none()
    }

    /// Transform the content and keep the problem.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            content: f(self.content),
            problem: self.problem,
        }
    }
}
