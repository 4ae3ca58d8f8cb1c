// ABOUTME: SSH transport for reaching remote hypervisors.
// ABOUTME: Key or agent authentication, known_hosts verification, unix socket tunneling.

mod error;
mod session;
mod tunnel;

pub use error::{Error, Result};
pub use session::{CommandOutput, Session, SessionConfig};
pub use tunnel::SocketTunnel;
