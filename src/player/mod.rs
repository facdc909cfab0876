//! Subprocess supervision for the two players: mpg123 for radio streams,
//! cvlc (by default) for video.

pub mod icy;
pub mod radio;
pub mod streamer;

pub use radio::RadioPlayer;
pub use streamer::Streamer;
