pub mod events;
pub mod init;
pub mod replay;

pub use events::{events, EventsArgs};
pub use init::{init, InitArgs};
pub use replay::{replay, ReplayArgs};
