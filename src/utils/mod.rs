//! Utility functions

pub mod crypto;
pub mod safe;
pub mod time;

pub use safe::*;
pub use time::{Clock, ManualClock, SystemClock};
