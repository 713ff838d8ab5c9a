//! Core systems for selectree.
//!
//! This crate provides the foundational pieces the selection engine is
//! built on:
//!
//! - **Signals**: Synchronous observer lists, one per observed value
//! - **Logging**: Tracing targets, span names, and tree formatting options
//!
//! # Signal Example
//!
//! ```
//! use selectree_core::Signal;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let count_changed = Signal::<usize>::new();
//! let last = Arc::new(AtomicUsize::new(0));
//!
//! let last_clone = last.clone();
//! count_changed.connect(move |&count| last_clone.store(count, Ordering::SeqCst));
//!
//! count_changed.emit(7);
//! assert_eq!(last.load(Ordering::SeqCst), 7);
//! ```

pub mod logging;
pub mod signal;

pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
pub use signal::{ConnectionId, Signal};
