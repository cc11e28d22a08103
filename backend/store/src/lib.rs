//! `idlewatch-store`: durable per-chat last-seen records.

pub mod format;
pub mod store;

pub use store::ActivityStore;
