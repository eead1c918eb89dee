// NativeTheme Service
// OS accessibility signal for inverted / high-contrast colors

use std::sync::atomic::{AtomicBool, Ordering};

pub trait NativeTheme: Send + Sync {
    /// Whether the OS asks applications for an inverted or high-contrast color scheme
    fn should_use_inverted_color_scheme(&self) -> bool;
}

/// Reads the signal from the running OS.
///
/// The OS is read when the value is built and again on [`refresh`](Self::refresh), never on
/// a query. On macOS each read spawns the `defaults` tool, so hosts refresh when their
/// accessibility-change notification fires rather than per window.
#[derive(Debug)]
pub struct SystemNativeTheme {
    read_setting: fn() -> bool,
    inverted: AtomicBool,
}

impl SystemNativeTheme {
    pub fn new() -> Self {
        Self::with_reader(inverted_color_scheme_enabled)
    }

    fn with_reader(read_setting: fn() -> bool) -> Self {
        Self {
            read_setting,
            inverted: AtomicBool::new(read_setting()),
        }
    }

    /// Re-read the OS setting, returning the new value
    pub fn refresh(&self) -> bool {
        let inverted = (self.read_setting)();
        self.inverted.store(inverted, Ordering::SeqCst);
        inverted
    }
}

impl Default for SystemNativeTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeTheme for SystemNativeTheme {
    fn should_use_inverted_color_scheme(&self) -> bool {
        self.inverted.load(Ordering::SeqCst)
    }
}

#[cfg(target_os = "windows")]
fn inverted_color_scheme_enabled() -> bool {
    use winapi::um::winuser::{
        SystemParametersInfoW, HCF_HIGHCONTRASTON, HIGHCONTRASTW, SPI_GETHIGHCONTRAST,
    };

    let mut high_contrast = HIGHCONTRASTW {
        cbSize: std::mem::size_of::<HIGHCONTRASTW>() as u32,
        dwFlags: 0,
        lpszDefaultScheme: std::ptr::null_mut(),
    };

    // SAFETY: pvParam points at a HIGHCONTRASTW whose cbSize is set, as SPI_GETHIGHCONTRAST requires
    let ok = unsafe {
        SystemParametersInfoW(
            SPI_GETHIGHCONTRAST,
            high_contrast.cbSize,
            &mut high_contrast as *mut HIGHCONTRASTW as *mut _,
            0,
        )
    };

    ok != 0 && (high_contrast.dwFlags & HCF_HIGHCONTRASTON) != 0
}

#[cfg(target_os = "macos")]
fn inverted_color_scheme_enabled() -> bool {
    match std::process::Command::new("defaults")
        .args(["read", "com.apple.universalaccess", "whiteOnBlack"])
        .output()
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim() == "1"
        }
        Ok(_) => false,
        Err(e) => {
            log::debug!("Failed to read universal access defaults: {e}");
            false
        }
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn inverted_color_scheme_enabled() -> bool {
    false
}

/// Signal pushed by the host instead of read from the OS
#[derive(Debug, Default)]
pub struct StaticNativeTheme {
    inverted: AtomicBool,
}

impl StaticNativeTheme {
    pub fn new(inverted: bool) -> Self {
        Self {
            inverted: AtomicBool::new(inverted),
        }
    }

    pub fn set_inverted(&self, inverted: bool) {
        self.inverted.store(inverted, Ordering::SeqCst);
    }
}

impl NativeTheme for StaticNativeTheme {
    fn should_use_inverted_color_scheme(&self) -> bool {
        self.inverted.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_static_native_theme_toggles() {
        let theme = StaticNativeTheme::new(false);
        assert!(!theme.should_use_inverted_color_scheme());

        theme.set_inverted(true);
        assert!(theme.should_use_inverted_color_scheme());
    }

    static READS: AtomicUsize = AtomicUsize::new(0);

    fn counting_reader() -> bool {
        READS.fetch_add(1, Ordering::SeqCst) % 2 == 1
    }

    #[test]
    fn test_system_theme_reads_os_only_on_refresh() {
        let theme = SystemNativeTheme::with_reader(counting_reader);
        assert_eq!(READS.load(Ordering::SeqCst), 1);

        for _ in 0..3 {
            assert!(!theme.should_use_inverted_color_scheme());
        }
        assert_eq!(READS.load(Ordering::SeqCst), 1);

        assert!(theme.refresh());
        assert!(theme.should_use_inverted_color_scheme());
        assert_eq!(READS.load(Ordering::SeqCst), 2);
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    #[test]
    fn test_system_signal_off_elsewhere() {
        let theme = SystemNativeTheme::new();
        assert!(!theme.should_use_inverted_color_scheme());
        assert!(!theme.refresh());
    }
}
