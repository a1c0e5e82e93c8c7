//! HTTP layer for flowsketch.
//!
//! Three surfaces: the verbatim Messages API relay, the server-side
//! generation route, and health probes. Permissive CORS rides on every
//! response so browser widgets can call the relay cross-origin.

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::InterfaceError;
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::AppState;
