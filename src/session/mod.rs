//! Sessions: the command surface.
//!
//! - `Session`: synchronous aggregate owning one game, with rollback
//! - `Snapshot`: immutable client view emitted after every command
//! - `SessionHandle`: tokio task wrapping a `Session`, with enemy-turn pacing
//!
//! Sessions share nothing mutable, so any number can run in parallel.

mod handle;
#[allow(clippy::module_inception)]
mod session;
mod snapshot;

pub use handle::SessionHandle;
pub use session::Session;
pub use snapshot::Snapshot;
