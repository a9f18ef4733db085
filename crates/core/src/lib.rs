//! Domain model and editing logic for interior-design project briefs.
//!
//! - [`project`] / [`room`]: the persisted document shape.
//! - [`editor`]: the draft room editor used while a project form is open.
//! - [`imaging`] / [`ingest`]: reference image compression and concurrent ingestion.
//! - [`view`]: read-only view models and layouts.

pub mod collection;
pub mod editor;
pub mod error;
pub mod imaging;
pub mod ingest;
pub mod project;
pub mod room;
pub mod types;
pub mod url;
pub mod view;
