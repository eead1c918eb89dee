// Window Services
// Windowing collaborator seams and an in-memory registry

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

pub type WindowId = u32;

/// An open shell window whose background can be repainted
pub trait ShellWindow: Send + Sync {
    fn id(&self) -> WindowId;

    fn set_background_color(&self, color: &str);
}

/// Enumerates the currently open windows
pub trait WindowHost: Send + Sync {
    fn open_windows(&self) -> Vec<Arc<dyn ShellWindow>>;
}

/// In-memory window host. Windows are listed in id order.
#[derive(Default)]
pub struct WindowRegistry {
    windows: RwLock<BTreeMap<WindowId, Arc<dyn ShellWindow>>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a window, replacing any previous window with the same id
    pub fn open(&self, window: Arc<dyn ShellWindow>) {
        if let Ok(mut windows) = self.windows.write() {
            windows.insert(window.id(), window);
        }
    }

    pub fn close(&self, id: WindowId) -> Option<Arc<dyn ShellWindow>> {
        self.windows.write().ok()?.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.windows.read().map(|windows| windows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WindowHost for WindowRegistry {
    fn open_windows(&self) -> Vec<Arc<dyn ShellWindow>> {
        match self.windows.read() {
            Ok(windows) => windows.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Window without a native surface; remembers the last background it was given
#[derive(Debug)]
pub struct HeadlessWindow {
    id: WindowId,
    background: RwLock<Option<String>>,
}

impl HeadlessWindow {
    pub fn new(id: WindowId) -> Self {
        Self {
            id,
            background: RwLock::new(None),
        }
    }

    pub fn background_color(&self) -> Option<String> {
        self.background.read().ok()?.clone()
    }
}

impl ShellWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn set_background_color(&self, color: &str) {
        if let Ok(mut background) = self.background.write() {
            *background = Some(color.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let registry = WindowRegistry::new();
        assert!(registry.is_empty());

        registry.open(Arc::new(HeadlessWindow::new(2)));
        registry.open(Arc::new(HeadlessWindow::new(1)));
        assert_eq!(registry.len(), 2);

        let ids: Vec<WindowId> = registry.open_windows().iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec![1, 2]);

        assert!(registry.close(1).is_some());
        assert!(registry.close(1).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_headless_window_records_background() {
        let window = HeadlessWindow::new(7);
        assert_eq!(window.background_color(), None);

        window.set_background_color("#1E1E1E");
        assert_eq!(window.background_color().as_deref(), Some("#1E1E1E"));
    }
}
