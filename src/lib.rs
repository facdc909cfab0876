//! Infoscreen library exports for testing

pub mod core;
pub mod daemon;
pub mod modules;
pub mod net;
pub mod player;

#[cfg(test)]
pub mod test_support;
