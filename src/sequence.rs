//! Resumable error id allocation

/// Allocator for error ids within one namespace.
///
/// Ids start at 0 for a new namespace. When reattaching to an existing one,
/// allocation continues after the largest id already persisted, so ids stay
/// unique and strictly increasing across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSequence {
    next: i64,
}

impl ErrorSequence {
    /// Sequence for a namespace with no errors yet
    pub fn fresh() -> Self {
        Self { next: 0 }
    }

    /// Sequence continuing after `max`, the largest persisted id (if any).
    ///
    /// Returns `None` when `max` leaves no id to hand out.
    pub fn resume_after(max: Option<i64>) -> Option<Self> {
        match max {
            Some(max) => max.checked_add(1).map(|next| Self { next }),
            None => Some(Self::fresh()),
        }
    }

    /// Take the next id
    pub fn allocate(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to `allocate` will return
    pub fn peek(&self) -> i64 {
        self.next
    }
}

impl Default for ErrorSequence {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_starts_at_zero() {
        let mut seq = ErrorSequence::fresh();
        assert_eq!(seq.peek(), 0);
        assert_eq!(seq.allocate(), 0);
        assert_eq!(seq.allocate(), 1);
        assert_eq!(seq.peek(), 2);
    }

    #[test]
    fn test_resume() {
        assert_eq!(ErrorSequence::resume_after(None), Some(ErrorSequence::fresh()));

        let mut seq = ErrorSequence::resume_after(Some(41)).unwrap();
        assert_eq!(seq.allocate(), 42);
    }

    #[test]
    fn test_resume_after_zero() {
        // A single persisted error has id 0; the next one must not reuse it.
        assert_eq!(ErrorSequence::resume_after(Some(0)).unwrap().peek(), 1);
    }

    #[test]
    fn test_resume_exhausted() {
        assert_eq!(ErrorSequence::resume_after(Some(i64::MAX)), None);
        assert_eq!(ErrorSequence::resume_after(Some(i64::MAX - 1)).unwrap().peek(), i64::MAX);
    }
}
