//! SQLite persistence plumbing for the book tracker.
//!
//! A single [`Database`] handle is opened at startup and shared by cloning.
//! All work against it happens inside a scoped [`Session`], which is a
//! transaction on the connection's background thread: changes become durable
//! only after [`Session::commit`], and a session dropped on any other path
//! rolls back.

pub mod database;
pub mod migration;
pub mod session;

pub use database::{Database, DbError};
pub use migration::Migration;
pub use session::Session;
