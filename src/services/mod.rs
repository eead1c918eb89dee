// Theme Background Services
// Business logic layer and collaborator seams

mod events;
mod log_manager;
mod native_theme;
mod state_manager;
mod theme_background;
mod windows;

pub use events::*;
pub use log_manager::*;
pub use native_theme::*;
pub use state_manager::*;
pub use theme_background::*;
pub use windows::*;
