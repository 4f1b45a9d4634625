//! Backend implementations for document stores.
//!
//! Each backend implements [`AggregateExecutor`](crate::store::AggregateExecutor)
//! and owns the translation from stage descriptors to its client's syntax.
//!
//! # Available Backends
//!
//! | Backend | Module | Status |
//! |---------|--------|--------|
//! | MongoDB | [`mongo`] | Available |
//!
//! # Implementing a Backend
//!
//! 1. Create a client struct bound to one collection (e.g., `MongoClient`)
//! 2. Render every [`Stage`](crate::store::Stage) variant into the store's query form
//! 3. Implement `AggregateExecutor`, yielding rows in pipeline order

pub mod mongo;
