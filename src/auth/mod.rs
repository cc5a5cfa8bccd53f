//! Client-side authentication: persisted session, refresh, and guarding.
//!
//! DESIGN
//! ======
//! `SessionManager` is the only writer of the persisted session. Every other
//! component reads through it and learns about changes from the `AuthEvents`
//! broadcast instead of polling storage.

pub mod events;
pub mod guard;
pub mod redirect;
pub mod session;
pub mod store;

pub use events::{AuthEvents, Subscription};
pub use guard::{GuardState, RouteGuard};
pub use session::{AuthError, Navigator, Session, SessionManager, UserInfo};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
