//! Turns resolved numbering into an ordered sequence of styled text runs.
//! Rendering the runs is the presentation sink's concern; this stays
//! display-agnostic.

use crate::model::numbering::{DisplaySegment, ResolvedSpaces};

pub const FULLSCREEN_MARKER: &str = "fullscreen";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStyle {
    Plain,
    /// The visible space on a display. `active` marks the one space that also
    /// holds focus.
    Current { active: bool },
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub runs: Vec<StyledRun>,
    /// Dark-mode state at format time, injected by the caller. Used by the
    /// sink to pick the neutral-color variant for unhighlighted runs.
    pub dark_mode: bool,
}

pub fn format_label(resolved: &ResolvedSpaces, dark_mode: bool, separator: &str) -> Label {
    let mut runs = Vec::new();
    for (index, segment) in resolved.segments.iter().enumerate() {
        match segment {
            DisplaySegment::Fullscreen => runs.push(StyledRun {
                text: FULLSCREEN_MARKER.to_string(),
                style: RunStyle::Plain,
            }),
            DisplaySegment::Numbered { lhs, current, rhs } => {
                if !lhs.is_empty() {
                    runs.push(plain(join_numbers(lhs)));
                }
                runs.push(StyledRun {
                    text: format!(" {current} "),
                    style: RunStyle::Current {
                        active: resolved.active == Some(*current),
                    },
                });
                if !rhs.is_empty() {
                    runs.push(plain(join_numbers(rhs)));
                }
            }
        }
        if index + 1 < resolved.segments.len() {
            runs.push(StyledRun {
                text: separator.to_string(),
                style: RunStyle::Separator,
            });
        }
    }
    Label { runs, dark_mode }
}

fn plain(text: String) -> StyledRun {
    StyledRun {
        text,
        style: RunStyle::Plain,
    }
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::numbering::DisplaySegment;

    const SEPARATOR: &str = " | ";

    fn run(text: &str, style: RunStyle) -> StyledRun {
        StyledRun {
            text: text.to_string(),
            style,
        }
    }

    #[test]
    fn single_display_with_visible_and_active_space() {
        // 1 [2] 3, "2" both visible and active.
        let resolved = ResolvedSpaces {
            segments: vec![DisplaySegment::Numbered {
                lhs: vec![1],
                current: 2,
                rhs: vec![3],
            }],
            active: Some(2),
        };

        let label = format_label(&resolved, false, SEPARATOR);
        assert_eq!(
            label.runs,
            vec![
                run("1", RunStyle::Plain),
                run(" 2 ", RunStyle::Current { active: true }),
                run("3", RunStyle::Plain),
            ]
        );
    }

    #[test]
    fn two_displays_split_active_and_visible() {
        // [1] 2 | 3 [4], "4" active, "1" visible-but-not-active.
        let resolved = ResolvedSpaces {
            segments: vec![
                DisplaySegment::Numbered {
                    lhs: vec![],
                    current: 1,
                    rhs: vec![2],
                },
                DisplaySegment::Numbered {
                    lhs: vec![3],
                    current: 4,
                    rhs: vec![],
                },
            ],
            active: Some(4),
        };

        let label = format_label(&resolved, false, SEPARATOR);
        assert_eq!(
            label.runs,
            vec![
                run(" 1 ", RunStyle::Current { active: false }),
                run("2", RunStyle::Plain),
                run(" | ", RunStyle::Separator),
                run("3", RunStyle::Plain),
                run(" 4 ", RunStyle::Current { active: true }),
            ]
        );
    }

    #[test]
    fn all_fullscreen_display_renders_the_literal_marker() {
        let resolved = ResolvedSpaces {
            segments: vec![DisplaySegment::Fullscreen],
            active: None,
        };

        let label = format_label(&resolved, false, SEPARATOR);
        assert_eq!(label.runs, vec![run("fullscreen", RunStyle::Plain)]);
    }

    #[test]
    fn separator_appears_between_displays_only() {
        let resolved = ResolvedSpaces {
            segments: vec![
                DisplaySegment::Fullscreen,
                DisplaySegment::Numbered {
                    lhs: vec![],
                    current: 1,
                    rhs: vec![],
                },
            ],
            active: None,
        };

        let label = format_label(&resolved, false, SEPARATOR);
        let separators = label
            .runs
            .iter()
            .filter(|r| r.style == RunStyle::Separator)
            .count();
        assert_eq!(separators, 1);
        assert_ne!(label.runs.last().map(|r| r.style), Some(RunStyle::Separator));
    }

    #[test]
    fn formatting_is_idempotent() {
        let resolved = ResolvedSpaces {
            segments: vec![DisplaySegment::Numbered {
                lhs: vec![1, 2],
                current: 3,
                rhs: vec![],
            }],
            active: Some(3),
        };

        assert_eq!(
            format_label(&resolved, true, SEPARATOR),
            format_label(&resolved, true, SEPARATOR)
        );
    }

    #[test]
    fn dark_mode_flag_is_carried_through() {
        let resolved = ResolvedSpaces::default();
        assert!(format_label(&resolved, true, SEPARATOR).dark_mode);
        assert!(!format_label(&resolved, false, SEPARATOR).dark_mode);
    }
}
