//! Session management: the process-wide bearer token and its lifecycle.

mod holder;

pub use holder::SessionHolder;
