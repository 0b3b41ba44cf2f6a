// SPDX-License-Identifier: GPL-2.0-or-later
//! Pieces every screen is built from.

/// What a screen knows about the data it fetched on mount.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// The fetch failed; the message is what the screen shows instead.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Lets the initial fetch of a screen happen once, however often it is mounted.
#[derive(Clone, Debug, Default)]
pub struct MountGuard {
    fired: bool,
}

impl MountGuard {
    /// `true` the first time it is called, `false` until [`MountGuard::reset`].
    pub fn first(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}

/// How a form submission or destructive action ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted the change.
    Completed,
    /// The user backed out at a confirmation.
    Cancelled,
    /// Nothing differed from what was fetched; no request was made.
    NoChanges,
    /// A required field was missing or out of range; no request was made.
    Invalid,
    /// The backend refused or couldn't be reached.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_guard_fires_once() {
        let mut guard = MountGuard::default();
        assert!(guard.first());
        assert!(!guard.first());
        assert!(!guard.first());
        guard.reset();
        assert!(guard.first());
    }

    #[test]
    fn load_state_accessors() {
        let mut state = LoadState::Loaded(vec![1, 2]);
        state.loaded_mut().unwrap().push(3);
        assert_eq!(Some(&vec![1, 2, 3]), state.loaded());
        assert!(!state.is_loading());

        let failed: LoadState<()> = LoadState::Failed("Error fetching clips".into());
        assert_eq!(Some("Error fetching clips"), failed.error());
        assert_eq!(None, failed.loaded());
    }
}
