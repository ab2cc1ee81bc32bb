use std::fmt;

/// Generation counter identifying the live query.
///
/// Every user action that supersedes earlier work advances the session's
/// token; a completion carrying any other token is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct QueryToken(u64);

impl QueryToken {
    #[must_use]
    pub fn next(self) -> Self {
        QueryToken(self.0 + 1)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
