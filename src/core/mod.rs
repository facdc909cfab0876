//! # Core Logic
//!
//! The module registry and everything the daemons need that knows nothing
//! about sockets or subprocesses.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Module (contract)    │
//!                    │  • Registry (active)    │
//!                    │  • events, config,      │
//!                    │    epg, picon cache     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  modules   │      │   player   │      │    net     │
//!     │ (menu et   │      │ (mpg123 /  │      │ (UDP/TCP/  │
//!     │  al.)      │      │  cvlc)     │      │  UNIX)     │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod epg;
pub mod event;
pub mod module;
pub mod registry;
