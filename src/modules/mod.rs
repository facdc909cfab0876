//! The pluggable menu entries. Each implements [`crate::core::module::Module`]
//! and registers with the registry at daemon startup; `selector` is the menu
//! itself and is held separately by the dispatcher.

pub mod radio;
pub mod selector;
pub mod tvnews;
pub mod tvstreams;
pub mod youtube;

pub use radio::RadioModule;
pub use selector::SelectorMenu;
pub use tvnews::TvNews;
pub use tvstreams::TvStreams;
pub use youtube::YouTube;
