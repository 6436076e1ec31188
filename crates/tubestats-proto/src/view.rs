//! Load states shared by every screen.

/// Why a load did not produce data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The entity no longer exists; shown as its own screen, not as an error.
    NotFound,
    /// Short, user-facing text.
    Message(String),
}

/// State of one asynchronous load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(Failure),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> LoadState<&T> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Loaded(v) => LoadState::Loaded(v),
            Self::Failed(f) => LoadState::Failed(f.clone()),
        }
    }

    /// Join two independent loads.
    ///
    /// Loading while either is outstanding, else Failed if either failed (the
    /// first load's failure wins when both did), else Loaded with both values.
    pub fn join<U>(self, other: LoadState<U>) -> LoadState<(T, U)> {
        match (self, other) {
            (Self::Loading, _) | (_, LoadState::Loading) => LoadState::Loading,
            (Self::Failed(f), _) | (_, LoadState::Failed(f)) => LoadState::Failed(f),
            (Self::Loaded(a), LoadState::Loaded(b)) => LoadState::Loaded((a, b)),
        }
    }
}

/// Identity of one view instance. Results tagged with an older token belong
/// to a view the user already left and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewToken(u64);

impl ViewToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
