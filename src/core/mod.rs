//! Core data models and traits

mod provider;
mod reset_time;
mod severity;
mod usage;
mod widget;

pub use provider::*;
pub use reset_time::*;
pub use severity::*;
pub use usage::*;
pub use widget::*;
