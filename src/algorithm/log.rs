//! # Iteration logs
//!
//! Solvers describe what they do as a sequence of steps. The steps have no influence on the
//! result; they exist such that a solution can be presented step by step.
use std::fmt;
use std::slice::Iter;

/// Append-only sequence of immutable steps.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IterationLog<S> {
    steps: Vec<S>,
}

impl<S: fmt::Display> IterationLog<S> {
    /// An empty log.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step.
    pub fn record(&mut self, step: S) {
        log::trace!("step {}: {}", self.steps.len() + 1, step);
        self.steps.push(step);
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The most recent step.
    pub fn last(&self) -> Option<&S> {
        self.steps.last()
    }

    /// All steps, in the order in which they were recorded.
    pub fn iter(&self) -> Iter<'_, S> {
        self.steps.iter()
    }

    /// Take the steps out of the log.
    pub fn into_steps(self) -> Vec<S> {
        self.steps
    }

    /// Append all steps of another log, converting them.
    pub fn extend<T: Into<S>>(&mut self, other: IterationLog<T>) {
        for step in other.steps {
            self.record(step.into());
        }
    }
}

impl<S: fmt::Display> Default for IterationLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S> IntoIterator for &'a IterationLog<S> {
    type Item = &'a S;
    type IntoIter = Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl<S: fmt::Display> fmt::Display for IterationLog<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(f, "Step {}:", index + 1)?;
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::log::IterationLog;

    #[test]
    fn append_only() {
        let mut log = IterationLog::new();
        assert!(log.is_empty());
        log.record("first".to_string());
        log.record("second".to_string());
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(String::as_str), Some("second"));
        assert_eq!(log.iter().cloned().collect::<Vec<_>>(), vec!["first", "second"]);
        assert!(log.to_string().starts_with("Step 1:\nfirst\nStep 2:\nsecond"));
    }

    #[test]
    fn extend_converts() {
        let mut inner = IterationLog::new();
        inner.record("pivot");
        let mut outer: IterationLog<String> = IterationLog::new();
        outer.extend(inner);
        assert_eq!(outer.into_steps(), vec!["pivot".to_string()]);
    }
}
