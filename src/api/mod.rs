//! HTTP API.
//!
//! A thin collaborator layer: it resolves the caller's session to a user id,
//! decodes JSON bodies, calls the store and maps `TodoError` codes onto HTTP
//! status codes. All hierarchy rules live below it.

mod error;
mod handlers;
mod server;
mod session;

pub use server::{AppState, ServerHandle, build_router, start_server};
pub use session::CurrentUser;
