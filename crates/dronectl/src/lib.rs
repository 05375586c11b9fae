pub mod point;
pub mod protocol;

pub use point::Point;
pub use protocol::{Command, ProtocolError, Ring, Role, SOCKET_PATH};
