mod gating;
mod properties;
