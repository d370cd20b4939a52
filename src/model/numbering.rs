//! Assigns stable, human-meaningful numbers to addressable spaces across all
//! displays and resolves which number is visible per display and which is
//! globally active.

use crate::model::snapshot::SpaceModel;

/// What one display contributes to the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySegment {
    /// The display owns no addressable spaces (or its current marker matched
    /// nothing); it renders as the literal "fullscreen" marker and contributes
    /// nothing to the numbering range.
    Fullscreen,
    /// The display's contiguous range, split around the visible space.
    Numbered {
        lhs: Vec<u32>,
        current: u32,
        rhs: Vec<u32>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSpaces {
    /// One segment per display, in display-enumeration order.
    pub segments: Vec<DisplaySegment>,
    /// Global number of the active space, when its managed id matched an
    /// enumerated space. `None` degrades to rendering without a highlight.
    pub active: Option<u32>,
}

/// Single pass over (display order, within-display order). Global numbers are
/// dense from 1, counting only addressable spaces.
///
/// The active space starts out as a managed id and is overwritten with its
/// global number when the pass reaches it; it may live on any display, so the
/// two phases share one accumulator threaded through the loop.
pub fn resolve(model: &SpaceModel) -> ResolvedSpaces {
    let mut pending_active = model.active_space_id;
    let mut active = None;
    let mut offset: u32 = 1;
    let mut segments = Vec::with_capacity(model.displays.len());

    for display in &model.displays {
        if display.spaces.is_empty() {
            segments.push(DisplaySegment::Fullscreen);
            continue;
        }

        let mut current = None;
        for (index, space) in display.spaces.iter().enumerate() {
            let number = offset + index as u32;
            if space.uuid == display.current_uuid {
                current = Some(number);
            }
            if pending_active == Some(space.managed_id) {
                active = Some(number);
                pending_active = None;
            }
        }

        let count = display.spaces.len() as u32;
        match current {
            Some(current) => {
                let lhs = (offset..current).collect();
                let rhs = (current + 1..offset + count).collect();
                segments.push(DisplaySegment::Numbered { lhs, current, rhs });
                offset += count;
            }
            // The current marker can miss every addressable space mid
            // fullscreen transition; render the marker rather than guess.
            None => segments.push(DisplaySegment::Fullscreen),
        }
    }

    ResolvedSpaces { segments, active }
}
