/// Operating system family the shell runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    /// Whether the OS inverted/high-contrast signal is honored here
    pub fn honors_inverted_colors(&self) -> bool {
        matches!(self, Platform::Windows | Platform::MacOs)
    }

    pub fn needs_dark_background_correction(&self) -> bool {
        matches!(self, Platform::MacOs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_colors_platforms() {
        assert!(Platform::Windows.honors_inverted_colors());
        assert!(Platform::MacOs.honors_inverted_colors());
        assert!(!Platform::Linux.honors_inverted_colors());
        assert!(!Platform::Other.honors_inverted_colors());
    }

    #[test]
    fn test_dark_correction_only_on_macos() {
        assert!(Platform::MacOs.needs_dark_background_correction());
        assert!(!Platform::Windows.needs_dark_background_correction());
        assert!(!Platform::Linux.needs_dark_background_correction());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_current_platform() {
        assert_eq!(Platform::current(), Platform::Linux);
    }
}
