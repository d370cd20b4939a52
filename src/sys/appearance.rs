use objc2_foundation::{NSUserDefaults, ns_string};

/// Reads the current theme preference. The `AppleInterfaceStyle` default is
/// only present in the global domain while dark mode is enabled.
pub fn system_dark_mode() -> bool {
    let defaults = unsafe { NSUserDefaults::standardUserDefaults() };
    let style = unsafe { defaults.stringForKey(ns_string!("AppleInterfaceStyle")) };
    style
        .map(|style| style.to_string().to_ascii_lowercase().contains("dark"))
        .unwrap_or(false)
}
