#![no_std]
#![deny(missing_docs)]

//! A fixed-block pool allocator library.
//!
//! The type `BlockPool` carves a caller-supplied memory region into equal-sized slots and serves allocation and
//! release requests in O(1), with no fragmentation and no calls into a general-purpose allocator. The type
//! `MappedPool` is the owning convenience: it maps a fresh region from the OS and carves it the same way.
//!
//! #   Warning
//!
//! A pool serves blocks of a single, fixed size, and a single pool must not be shared across threads. See the
//! individual types for the trade-offs made.

mod platform;
mod pooled;

pub use blockpool_core::{BlockPool, Error, Mode, Pool, Result};

pub use pooled::MappedPool;
