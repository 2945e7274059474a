//! Product changelog API with JWT session auth.
//!
//! Users own products, products own updates. Every mutating request against
//! an update re-derives the caller's ownership chain from current data.

pub mod cli;
pub mod shiplog;
