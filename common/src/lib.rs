//! # ipgate common
//!
//! Value types shared by every `ipgate` crate:
//!
//! * **[`network::address`]**: the [`IpAddress`](network::address::IpAddress) value type.
//! * **[`network::range`]**: CIDR / `low-high` / single host ranges.
//! * **[`network::allowlist`]**: line based allow-lists as entered in settings forms.
//! * **[`network::lookup`]**: the reverse lookup port implemented by `ipgate-core`.

pub mod config;
pub mod error;
pub mod network;
