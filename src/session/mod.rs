//! Session state: who is logged in and what they are entitled to.

pub mod cache;
pub mod controller;
pub mod snapshot;
pub mod store;

pub use cache::{CacheError, FileSessionCache, MemorySessionCache, SessionCache, SESSION_CACHE_KEY};
pub use controller::AuthSessionController;
pub use snapshot::{NormalizedEntitlement, SessionSnapshot, SessionTokens, UserProfile};
pub use store::SessionStore;
