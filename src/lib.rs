// Theme Background - Desktop Shell Service
// Persists the active theme and resolves window background colors

pub mod models;
pub mod services;
