//! Bindings to the private SkyLight window-server interface. Only the calls
//! needed for the managed display space listing and the active-display query.

use objc2_core_foundation::{CFArray, CFString};

#[link(name = "SkyLight", kind = "framework")]
unsafe extern "C" {
    pub fn SLSMainConnectionID() -> i32;
    /// Returns a retained array of per-display dictionaries describing each
    /// display's spaces and its current space.
    pub fn SLSCopyManagedDisplaySpaces(cid: i32) -> *mut CFArray;
    /// Returns the retained identifier of the display whose menu bar is
    /// active, i.e. the display holding input focus.
    pub fn SLSCopyActiveMenuBarDisplayIdentifier(cid: i32) -> *mut CFString;
}
