//! Route guard for authenticated screens.
//!
//! A guard is mounted per protected screen. It checks the session on mount
//! and again on every auth-change broadcast; while unauthenticated it sends
//! the navigator to the login screen with the current path as the return
//! target. Protected content renders only in [`GuardState::Authorized`].
//!
//! The subscription closure holds a `Weak` reference to the guard state, so
//! the session never keeps an unmounted guard alive. Dropping the guard drops
//! its subscription.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::events::Subscription;
use super::redirect::login_url;
use super::session::{Navigator, SessionManager};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    /// No verdict yet; show a loading indicator, not the content.
    #[default]
    Checking,
    Authorized,
    /// Unauthenticated; the navigator was sent to `to`.
    Redirecting { to: String },
}

struct GuardInner {
    session: Arc<SessionManager>,
    navigator: Arc<dyn Navigator>,
    current_path: String,
    fallback_path: String,
    state: Mutex<GuardState>,
}

impl GuardInner {
    fn check(&self) {
        let next = if self.session.is_authenticated() {
            GuardState::Authorized
        } else {
            GuardState::Redirecting { to: login_url(&self.fallback_path, &self.current_path) }
        };

        let changed = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let changed = *state != next;
            *state = next.clone();
            changed
        };

        // Navigate on entering Redirecting only; repeated broadcasts while
        // logged out must not stack navigations.
        if let (true, GuardState::Redirecting { to }) = (changed, &next) {
            tracing::info!(from = %self.current_path, to = %to, "unauthenticated; redirecting");
            self.navigator.navigate(to);
        }
    }
}

pub struct RouteGuard {
    inner: Arc<GuardInner>,
    _subscription: Subscription,
}

impl RouteGuard {
    /// Mount a guard for `current_path`, redirecting to `fallback_path` when
    /// unauthenticated. The first check runs before this returns.
    #[must_use = "dropping the guard unmounts it"]
    pub fn mount(
        session: Arc<SessionManager>,
        navigator: Arc<dyn Navigator>,
        current_path: impl Into<String>,
        fallback_path: impl Into<String>,
    ) -> Self {
        let inner = Arc::new(GuardInner {
            session: Arc::clone(&session),
            navigator,
            current_path: current_path.into(),
            fallback_path: fallback_path.into(),
            state: Mutex::new(GuardState::Checking),
        });

        let weak: Weak<GuardInner> = Arc::downgrade(&inner);
        let subscription = session.subscribe(move || {
            if let Some(inner) = weak.upgrade() {
                inner.check();
            }
        });

        inner.check();
        Self { inner, _subscription: subscription }
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// True iff the protected content may be shown.
    #[must_use]
    pub fn can_render(&self) -> bool {
        matches!(self.state(), GuardState::Authorized)
    }

    /// Re-run the check without a broadcast. Changes made by other processes
    /// arrive through [`SessionManager::sync_from_store`], which broadcasts;
    /// this is for hosts that mutate the store directly.
    pub fn recheck(&self) {
        self.inner.check();
    }

    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.inner.current_path
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("current_path", &self.inner.current_path)
            .field("fallback_path", &self.inner.fallback_path)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
