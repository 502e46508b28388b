//! Request extractors shared by all handlers.
//!
//! - [`auth::AuthUser`] -- The authenticated user, from the session cookie.
//! - [`mode::RenderMode`] -- Whether the caller wants a fragment or a page.

pub mod auth;
pub mod mode;
