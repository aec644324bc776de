//! Filesystem utilities for review-intake.
//!
//! Atomic writes keep the issue registry intact across crashes; the tree
//! helpers clear scratch and repository directories and copy submission files.

pub mod atomic;
pub mod tree;

pub use atomic::{atomic_write, atomic_write_file};
pub use tree::{check_dir_name, clear_dir, copy_file, ensure_dir, remove_dir, remove_file};
