//! Authentication: credential store, password hashing, bearer tokens, and the
//! request gate used by every protected route.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod store;
pub mod token;

pub use extractor::AuthUser;
