pub mod appointment;
pub mod time;

pub use appointment::*;
pub use time::*;
