pub mod address;
pub mod allowlist;
pub mod lookup;
pub mod range;
