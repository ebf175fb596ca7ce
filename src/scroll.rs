//! Scroll-reactive UI state, derived from the vertical scroll offset and static
//! section geometry. Everything here is pure so the threshold and ordering rules
//! can be tested without a rendering surface; `frontend` applies the result to
//! the document.

const NAVBAR_SCROLL_THRESHOLD: f64 = 100.0;
const BACK_TO_TOP_THRESHOLD: f64 = 300.0;
const SECTION_LOOKAHEAD_PX: f64 = 200.0;
const PARALLAX_FACTOR: f64 = 0.5;
const STAGGER_STEP_SECONDS: f64 = 0.1;

pub const ACTIVE_LINK_COLOR: &str = "#2ecc71";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavbarStyle {
    Top,
    Scrolled,
}

impl NavbarStyle {
    pub fn for_offset(scroll_y: f64) -> Self {
        if scroll_y > NAVBAR_SCROLL_THRESHOLD {
            Self::Scrolled
        } else {
            Self::Top
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Top => "rgba(255, 255, 255, 0.7)",
            Self::Scrolled => "rgba(255, 255, 255, 0.95)",
        }
    }

    pub fn box_shadow(self) -> &'static str {
        match self {
            Self::Top => "0 2px 8px rgba(0, 0, 0, 0.1)",
            Self::Scrolled => "0 4px 20px rgba(0, 0, 0, 0.1)",
        }
    }
}

/// One `section[id]` as read from the document, in document order.
#[derive(Clone, PartialEq, Debug)]
pub struct SectionGeometry {
    pub id: String,
    pub top: f64,
}

/// The visual state recomputed from scratch on every scroll notification.
#[derive(Clone, PartialEq, Debug)]
pub struct ScrollFrame {
    pub navbar: NavbarStyle,
    pub active_section: Option<String>,
    pub parallax_y: f64,
    pub back_to_top_visible: bool,
}

/// The current section is the last one, in document order, whose top minus a
/// 200px look-ahead margin has been reached. Later qualifiers overwrite earlier
/// ones, so this yields the nearest section at or above the offset, not the
/// visually dominant one.
pub fn active_section(scroll_y: f64, sections: &[SectionGeometry]) -> Option<&str> {
    let mut current = None;
    for section in sections {
        if scroll_y >= section.top - SECTION_LOOKAHEAD_PX {
            current = Some(section.id.as_str());
        }
    }
    current
}

pub fn parallax_offset(scroll_y: f64) -> f64 {
    scroll_y * PARALLAX_FACTOR
}

pub fn back_to_top_visible(scroll_y: f64) -> bool {
    scroll_y > BACK_TO_TOP_THRESHOLD
}

pub fn derive_frame(scroll_y: f64, sections: &[SectionGeometry]) -> ScrollFrame {
    ScrollFrame {
        navbar: NavbarStyle::for_offset(scroll_y),
        active_section: active_section(scroll_y, sections).map(str::to_owned),
        parallax_y: parallax_offset(scroll_y),
        back_to_top_visible: back_to_top_visible(scroll_y),
    }
}

/// Animation-start delay for the staggered reveal: proportional to the entry's
/// position in its batch. Re-entering the viewport re-reveals but never resets
/// an already-applied delay.
pub fn stagger_delay_seconds(index: usize) -> f64 {
    index as f64 * STAGGER_STEP_SECONDS
}

/// What a revealer does with one watcher notification for one element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealAction {
    /// Keep watching, element untouched.
    Keep,
    /// Add the reveal class and keep watching.
    Reveal,
    /// Add the reveal class and release the element from the watcher.
    RevealAndRelease,
}

/// One-shot watcher rule: the first qualifying notification reveals and
/// releases, so no later notification can reach the element again.
pub fn one_shot_action(intersecting: bool) -> RevealAction {
    if intersecting {
        RevealAction::RevealAndRelease
    } else {
        RevealAction::Keep
    }
}

/// Staggered watcher rule: reveal on every qualifying notification and keep
/// watching. Re-revealing is a class-membership no-op.
pub fn staggered_action(intersecting: bool) -> RevealAction {
    if intersecting {
        RevealAction::Reveal
    } else {
        RevealAction::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections(tops: &[(&str, f64)]) -> Vec<SectionGeometry> {
        tops.iter()
            .map(|(id, top)| SectionGeometry {
                id: (*id).to_owned(),
                top: *top,
            })
            .collect()
    }

    #[test]
    fn navbar_transition_is_strictly_above_threshold() {
        assert_eq!(NavbarStyle::for_offset(99.0), NavbarStyle::Top);
        assert_eq!(NavbarStyle::for_offset(100.0), NavbarStyle::Top);
        assert_eq!(NavbarStyle::for_offset(100.1), NavbarStyle::Scrolled);
        assert_eq!(NavbarStyle::for_offset(101.0), NavbarStyle::Scrolled);
    }

    #[test]
    fn navbar_styles_are_distinct() {
        assert_ne!(
            NavbarStyle::Top.background(),
            NavbarStyle::Scrolled.background()
        );
        assert_ne!(
            NavbarStyle::Top.box_shadow(),
            NavbarStyle::Scrolled.box_shadow()
        );
        assert!(ACTIVE_LINK_COLOR.starts_with('#'));
    }

    #[test]
    fn last_qualifying_section_wins() {
        let sections = sections(&[("inicio", 0.0), ("projeto", 800.0), ("sobre", 1600.0)]);

        // 599 only reaches the first; at 600 the second section's top minus
        // the look-ahead is met, and the later qualifier overwrites.
        assert_eq!(active_section(599.0, &sections), Some("inicio"));
        assert_eq!(active_section(600.0, &sections), Some("projeto"));
        assert_eq!(active_section(750.0, &sections), Some("projeto"));
        assert_eq!(active_section(1400.0, &sections), Some("sobre"));
    }

    #[test]
    fn no_section_qualifies_below_lookahead() {
        let sections = sections(&[("projeto", 800.0)]);
        assert_eq!(active_section(599.0, &sections), None);
        assert_eq!(active_section(600.0, &sections), Some("projeto"));
    }

    #[test]
    fn empty_document_has_no_active_section() {
        assert_eq!(active_section(1000.0, &[]), None);
    }

    #[test]
    fn back_to_top_threshold_is_strict() {
        assert!(!back_to_top_visible(300.0));
        assert!(back_to_top_visible(300.5));
    }

    #[test]
    fn parallax_is_half_of_offset() {
        assert_eq!(parallax_offset(0.0), 0.0);
        assert_eq!(parallax_offset(640.0), 320.0);
    }

    #[test]
    fn frame_at_offset_50_is_quiescent() {
        let frame = derive_frame(50.0, &sections(&[("inicio", 0.0), ("projeto", 800.0)]));
        assert_eq!(frame.navbar, NavbarStyle::Top);
        assert!(!frame.back_to_top_visible);
        assert_eq!(frame.active_section.as_deref(), Some("inicio"));
        assert_eq!(frame.parallax_y, 25.0);
    }

    #[test]
    fn frame_at_offset_350_is_fully_engaged() {
        let frame = derive_frame(350.0, &sections(&[("inicio", 0.0), ("projeto", 800.0)]));
        assert_eq!(frame.navbar, NavbarStyle::Scrolled);
        assert!(frame.back_to_top_visible);
        assert_eq!(frame.active_section.as_deref(), Some("inicio"));
    }

    #[test]
    fn derivation_is_idempotent_across_repeated_events() {
        let sections = sections(&[("inicio", 0.0), ("projeto", 800.0)]);
        let first = derive_frame(650.0, &sections);
        let second = derive_frame(650.0, &sections);
        assert_eq!(first, second);
    }

    #[test]
    fn one_shot_reveal_is_terminal() {
        // Simulated watcher loop: class membership plus a watch flag per
        // element. Once released, later notifications never reach it.
        let mut revealed = false;
        let mut watching = true;
        for intersecting in [false, true, false, true, true] {
            if !watching {
                continue;
            }
            if one_shot_action(intersecting) == RevealAction::RevealAndRelease {
                revealed = true;
                watching = false;
            }
        }
        assert!(revealed);
        assert!(!watching);
    }

    #[test]
    fn staggered_watcher_never_releases() {
        assert_eq!(staggered_action(false), RevealAction::Keep);
        // Qualifying notifications re-reveal instead of releasing, so an
        // element scrolled away and back gets the class added again.
        assert_eq!(staggered_action(true), RevealAction::Reveal);
        assert_eq!(staggered_action(true), RevealAction::Reveal);
    }

    #[test]
    fn stagger_delays_step_by_a_tenth() {
        assert_eq!(stagger_delay_seconds(0), 0.0);
        assert!((stagger_delay_seconds(3) - 0.3).abs() < 1e-12);
        assert!((stagger_delay_seconds(5) - 0.5).abs() < 1e-12);
    }
}
