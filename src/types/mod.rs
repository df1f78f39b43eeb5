mod config;
mod delivery;
mod details;
mod device;

pub use config::*;
pub use delivery::*;
pub use details::*;
pub use device::*;
