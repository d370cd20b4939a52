//! Queries the window server for the raw per-display space listing. The
//! nested CF dictionaries are converted into the loosely-typed raw records
//! here; all validation happens later at the model boundary.

use std::ffi::c_void;
use std::ptr::NonNull;

use objc2_core_foundation::{CFArray, CFDictionary, CFNumber, CFRetained, CFString, CFType};
use tracing::trace;

use crate::actor::indicator::SnapshotProvider;
use crate::model::snapshot::{RawDisplay, RawSnapshot, RawSpace};
use crate::sys::skylight::{
    SLSCopyActiveMenuBarDisplayIdentifier, SLSCopyManagedDisplaySpaces, SLSMainConnectionID,
};

const DISPLAY_IDENTIFIER_KEY: &str = "Display Identifier";
const CURRENT_SPACE_KEY: &str = "Current Space";
const SPACES_KEY: &str = "Spaces";
const SPACE_UUID_KEY: &str = "uuid";
const MANAGED_SPACE_ID_KEY: &str = "ManagedSpaceID";
const TILE_LAYOUT_KEY: &str = "TileLayoutManager";

/// Returns `None` when the window server reports nothing usable; the caller
/// keeps its previous state in that case.
pub fn snapshot() -> Option<RawSnapshot> {
    let cid = unsafe { SLSMainConnectionID() };
    let displays = unsafe {
        let ptr = SLSCopyManagedDisplaySpaces(cid);
        CFRetained::from_raw(NonNull::new(ptr)?)
    };
    let focused_display = unsafe {
        NonNull::new(SLSCopyActiveMenuBarDisplayIdentifier(cid))
            .map(|ptr| CFRetained::from_raw(ptr).to_string())
    };

    let count = unsafe { displays.count() };
    let mut records = Vec::with_capacity(count as usize);
    for index in 0..count {
        match unsafe { array_dict(&displays, index) } {
            Some(dict) => records.push(parse_display(dict)),
            None => {
                trace!(index, "display entry is not a dictionary");
                records.push(RawDisplay::default());
            }
        }
    }

    Some(RawSnapshot {
        displays: records,
        focused_display,
    })
}

/// The live snapshot seam handed to the indicator actor.
pub struct WindowServerProvider;

impl SnapshotProvider for WindowServerProvider {
    fn snapshot(&self) -> Option<RawSnapshot> {
        snapshot()
    }
}

fn parse_display(dict: &CFDictionary) -> RawDisplay {
    let current_space = dict_value(dict, CURRENT_SPACE_KEY)
        .and_then(|value| value.downcast_ref::<CFDictionary>())
        .map(parse_space);
    let spaces = dict_value(dict, SPACES_KEY)
        .and_then(|value| value.downcast_ref::<CFArray>())
        .map(|array| {
            let count = unsafe { array.count() };
            let mut spaces = Vec::with_capacity(count as usize);
            for index in 0..count {
                if let Some(space) = unsafe { array_dict(array, index) } {
                    spaces.push(parse_space(space));
                }
            }
            spaces
        });

    RawDisplay {
        identifier: dict_string(dict, DISPLAY_IDENTIFIER_KEY),
        current_space,
        spaces,
    }
}

fn parse_space(dict: &CFDictionary) -> RawSpace {
    RawSpace {
        uuid: dict_string(dict, SPACE_UUID_KEY),
        managed_id: dict_i64(dict, MANAGED_SPACE_ID_KEY),
        // Fullscreen-app spaces carry tile-layout metadata.
        is_fullscreen: dict_value(dict, TILE_LAYOUT_KEY).is_some(),
    }
}

unsafe fn array_dict(array: &CFArray, index: isize) -> Option<&CFDictionary> {
    let ptr = unsafe { array.value_at_index(index) };
    let value = unsafe { (ptr as *const CFType).as_ref() }?;
    value.downcast_ref::<CFDictionary>()
}

fn dict_value<'a>(dict: &'a CFDictionary, key: &str) -> Option<&'a CFType> {
    let key = CFString::from_str(key);
    let ptr = unsafe { dict.value(&*key as *const CFString as *const c_void) };
    unsafe { (ptr as *const CFType).as_ref() }
}

fn dict_string(dict: &CFDictionary, key: &str) -> Option<String> {
    dict_value(dict, key)?.downcast_ref::<CFString>().map(|s| s.to_string())
}

fn dict_i64(dict: &CFDictionary, key: &str) -> Option<i64> {
    dict_value(dict, key)?.downcast_ref::<CFNumber>()?.as_i64()
}
