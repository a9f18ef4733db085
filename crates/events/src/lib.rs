//! Change notification infrastructure for project documents.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ProjectEvent`]: the change notice every store write produces.
//! - [`ChangeListener`]: bridges Postgres `NOTIFY` messages onto the bus so
//!   writes made by other server instances reach local viewers.

pub mod bus;
pub mod listener;

pub use bus::{ChangeKind, EventBus, ProjectEvent};
pub use listener::{ChangeListener, CHANGE_CHANNEL};
