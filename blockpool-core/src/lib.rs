#![no_std]

#![deny(missing_docs)]

//! Building blocks for a fixed-block pool allocator.
//!
//! blockpool-core carves a caller-supplied, pre-allocated byte region into equal-sized slots and serves
//! allocation/release requests from that pool without ever calling into a general-purpose allocator. It targets
//! deterministic, fragmentation-free, O(1) allocation for workloads with a known, uniform object size.
//!
//! The crate contains:
//! -   A `Pool` trait, the capability interface of fixed-size block allocation.
//! -   The `BlockPool` type, serving blocks from an intrusive free list over the borrowed region.
//! -   A `Mode` flag selecting how much corruption checking the pool performs.

mod api;
mod internals;
mod utils;

pub use api::*;
