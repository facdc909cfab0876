//! The long-running processes: control socket loop + signal handling for
//! each daemon.

pub mod radio;
pub mod selector;
