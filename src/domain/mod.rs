//! Domain layer - quote normalization and swap parameter construction
//!
//! Everything under here is synchronous and free of I/O.

pub mod amount;
pub mod quote;
pub mod registry;
pub mod swap;
