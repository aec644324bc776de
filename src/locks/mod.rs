//! Lock files that keep concurrent review-intake runs apart.
//!
//! Two locks live in `{state_dir}/locks/`:
//! - `intake.lock`, held for a whole `add` run because every run unpacks
//!   into the same scratch directory and may rebuild repositories
//! - `registry.lock`, held around each read-modify-write of the registry
//!
//! A lock is taken by creating its file exclusively; whoever gets there
//! first holds it. The file body is a JSON [`LockHolder`] so an operator
//! finding a held lock can tell who took it, for what, and how long ago.
//! [`HeldLock`] deletes the file when dropped.

mod held;
mod holder;
mod operations;
mod types;


pub use held::HeldLock;
pub use holder::LockHolder;
pub(crate) use holder::actor_string;
pub use operations::{acquire_intake_lock, acquire_registry_lock, clear_lock, list_locks};
pub use types::{LockInfo, LockType};
