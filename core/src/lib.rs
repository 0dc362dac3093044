//! # ipgate core
//!
//! Network-facing pieces built on `ipgate-common`:
//!
//! * **[`dns`]**: reverse lookups through the system resolver.
//! * **[`resolver`]**: picks the client address out of an `X-Forwarded-For` chain.

pub mod dns;
pub mod resolver;
