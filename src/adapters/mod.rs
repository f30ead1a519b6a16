//! Adapters: concrete backends behind the [`Backend`] port.
//!
//! [`Backend`]: crate::domain::ports::Backend

pub mod sqlite;
