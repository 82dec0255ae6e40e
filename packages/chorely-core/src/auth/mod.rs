//! Session state and the collaborators of the request pipeline.
//!
//! Provides the in-memory session store, token expiry inspection, the
//! navigation signal fired on unrecoverable auth failure, and persisted
//! session storage for processes that outlive a single run.

mod credentials;
mod navigation;
mod session;
mod token;

pub use credentials::{delete_session, get_session_storage_info, load_session, save_session};
pub use navigation::{NavigationSignal, NoNavigation};
pub use session::{Session, SessionStore};
pub use token::{JwtExpiryCheck, TokenExpiryCheck};
