//! Request middleware.
//!
//! - [`auth`]: bearer extraction and credential verification (gate steps 1-2)
//! - [`gate`]: the full access-control gate (steps 1-6) and the
//!   `require_*` route layers
//!
//! Flow: `Authorization: Bearer <token>` → verify → live principal lookup
//! → capability decision → principal attached to the request.

pub mod auth;
pub mod gate;
