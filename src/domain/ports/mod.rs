//! Ports: traits and error taxonomies at the engine's seams.

mod backend;
mod clock;
pub mod errors;

pub use backend::Backend;
pub use clock::{Clock, TokioClock};
pub use errors::{ConnectError, ProvisionError, TokenError};
