//! Query services layered over the recurrence engine.

pub mod services;
pub mod time;
pub mod utils;
