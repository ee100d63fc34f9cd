pub mod config;
pub mod raw;
pub mod series;
pub mod window;

pub use config::*;
pub use raw::*;
pub use series::*;
pub use window::*;
