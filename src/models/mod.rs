// Theme Background Models
// Data structures shared by the services

mod platform;
mod theme;

pub use platform::*;
pub use theme::*;
