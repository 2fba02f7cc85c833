//! Back-button routing
//!
//! A scene declares its escape levels innermost first (for example
//! detail pane, grid, sidebar). One back signal does exactly one of:
//!
//! 1. close the topmost modal and refocus the control that opened it
//! 2. move focus from the level holding focus to the next level out
//! 3. ask the scene to exit when focus is already at the outermost level
//!
//! The level holding focus is found by ancestry in the focus graph, never
//! from remembered state, so a re-render cannot confuse the router.

use tracing::{debug, warn};

use crate::focus::{FocusError, FocusGraph};

/// One rung in a scene's back-navigation hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeLevel {
    /// Label for logs
    pub name: String,
    /// Zone whose subtree makes up this level
    pub zone: String,
}

impl EscapeLevel {
    pub fn new(name: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zone: zone.into(),
        }
    }
}

/// What a back signal did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    /// A modal was dismissed
    ModalClosed {
        zone: String,
        restored: Option<String>,
    },
    /// Focus moved one level outward
    Escaped {
        from: String,
        to: String,
        focused: String,
    },
    /// The scene should exit
    Exit,
    /// The next level is not registered; focus stays put
    Ignored,
}

#[derive(Debug, Clone)]
struct ModalFrame {
    zone: String,
    opener: Option<String>,
}

/// Routes back signals against a scene's declared escape levels
#[derive(Debug, Clone, Default)]
pub struct BackNavigationRouter {
    levels: Vec<EscapeLevel>,
    modals: Vec<ModalFrame>,
}

impl BackNavigationRouter {
    /// Create a router with levels ordered innermost first
    pub fn new(levels: impl IntoIterator<Item = EscapeLevel>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            modals: Vec::new(),
        }
    }

    pub fn levels(&self) -> &[EscapeLevel] {
        &self.levels
    }

    pub fn is_modal_open(&self) -> bool {
        !self.modals.is_empty()
    }

    /// Zone of the topmost modal
    pub fn top_modal(&self) -> Option<&str> {
        self.modals.last().map(|m| m.zone.as_str())
    }

    /// Present an already-registered modal zone and focus into it
    ///
    /// The currently focused control is remembered as the opener.
    pub fn present_modal(&mut self, graph: &mut FocusGraph, zone: &str) -> Result<String, FocusError> {
        let opener = graph.focused().map(str::to_string);
        let focused = graph.focus_default(zone)?;
        debug!(zone, opener = ?opener, "modal presented");
        self.modals.push(ModalFrame {
            zone: zone.to_string(),
            opener,
        });
        Ok(focused)
    }

    /// Dismiss the topmost modal, unregister its zone and refocus its opener
    pub fn close_modal(&mut self, graph: &mut FocusGraph) -> Option<BackOutcome> {
        let frame = self.modals.pop()?;
        if let Err(e) = graph.unregister_node(&frame.zone) {
            warn!(zone = %frame.zone, error = %e, "modal zone already gone");
        }

        let restored = match frame.opener {
            Some(opener) if graph.contains(&opener) => match graph.set_focus(&opener) {
                Ok(()) => Some(opener),
                Err(e) => {
                    warn!(error = %e, "failed to restore modal opener");
                    None
                }
            },
            _ => None,
        };
        debug!(zone = %frame.zone, restored = ?restored, "modal closed");
        Some(BackOutcome::ModalClosed {
            zone: frame.zone,
            restored,
        })
    }

    /// Forget modal frames without touching the graph (scene teardown)
    pub fn reset(&mut self) {
        self.modals.clear();
    }

    /// Index of the innermost declared level holding focus
    pub fn current_level(&self, graph: &FocusGraph) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| graph.focus_within(&level.zone))
    }

    /// Handle one back signal
    pub fn handle_back(&mut self, graph: &mut FocusGraph) -> BackOutcome {
        if let Some(outcome) = self.close_modal(graph) {
            return outcome;
        }

        let Some(current) = self.current_level(graph) else {
            debug!("focus outside declared levels, exiting scene");
            return BackOutcome::Exit;
        };

        let Some(outer) = self.levels.get(current + 1) else {
            debug!(level = %self.levels[current].name, "outermost level, exiting scene");
            return BackOutcome::Exit;
        };
        let from = self.levels[current].name.clone();

        // An empty level still takes focus on its zone, so the next press moves on
        let focused = match graph.focus_default(&outer.zone) {
            Ok(focused) => focused,
            Err(FocusError::NoFocusableDescendant(_)) => match graph.set_focus(&outer.zone) {
                Ok(()) => outer.zone.clone(),
                Err(e) => {
                    warn!(level = %outer.name, error = %e, "escape level cannot take focus");
                    return BackOutcome::Ignored;
                }
            },
            Err(e) => {
                warn!(level = %outer.name, error = %e, "escape level cannot take focus");
                return BackOutcome::Ignored;
            }
        };
        debug!(from = %from, to = %outer.name, focused = %focused, "escaped one level");
        BackOutcome::Escaped {
            from,
            to: outer.name.clone(),
            focused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::{FocusZone, FocusableItem};

    fn graph() -> FocusGraph {
        let mut g = FocusGraph::new();
        g.register_node(FocusZone::new("scene"), None).unwrap();
        for zone in ["sidebar", "grid", "detail"] {
            g.register_node(FocusZone::new(zone), Some("scene")).unwrap();
            g.register_node(FocusableItem::new(format!("{zone}-a")), Some(zone))
                .unwrap();
        }
        g
    }

    fn router() -> BackNavigationRouter {
        BackNavigationRouter::new([
            EscapeLevel::new("detail", "detail"),
            EscapeLevel::new("grid", "grid"),
            EscapeLevel::new("sidebar", "sidebar"),
        ])
    }

    #[test]
    fn test_back_escapes_one_level() {
        let mut g = graph();
        let mut r = router();
        g.set_focus("detail-a").unwrap();

        assert_eq!(
            r.handle_back(&mut g),
            BackOutcome::Escaped {
                from: "detail".into(),
                to: "grid".into(),
                focused: "grid-a".into()
            }
        );
        assert_eq!(g.focused(), Some("grid-a"));
    }

    #[test]
    fn test_back_from_outermost_exits() {
        let mut g = graph();
        let mut r = router();
        g.set_focus("sidebar-a").unwrap();
        assert_eq!(r.handle_back(&mut g), BackOutcome::Exit);
        assert_eq!(g.focused(), Some("sidebar-a"));
    }

    #[test]
    fn test_back_with_no_focus_exits() {
        let mut g = graph();
        let mut r = router();
        assert_eq!(r.handle_back(&mut g), BackOutcome::Exit);
    }

    #[test]
    fn test_modal_closes_first_and_restores_opener() {
        let mut g = graph();
        let mut r = router();
        g.set_focus("detail-a").unwrap();

        g.register_node(FocusZone::new("resume").boundary(), Some("scene"))
            .unwrap();
        g.register_node(FocusableItem::new("resume-btn"), Some("resume"))
            .unwrap();
        assert_eq!(r.present_modal(&mut g, "resume").unwrap(), "resume-btn");
        assert!(r.is_modal_open());

        assert_eq!(
            r.handle_back(&mut g),
            BackOutcome::ModalClosed {
                zone: "resume".into(),
                restored: Some("detail-a".into())
            }
        );
        assert!(!g.contains("resume"));
        assert_eq!(g.focused(), Some("detail-a"));
        assert!(!r.is_modal_open());
    }

    #[test]
    fn test_empty_outer_level_takes_focus_on_its_zone() {
        let mut g = graph();
        g.unregister_node("grid-a").unwrap();
        let mut r = router();
        g.set_focus("detail-a").unwrap();

        assert_eq!(
            r.handle_back(&mut g),
            BackOutcome::Escaped {
                from: "detail".into(),
                to: "grid".into(),
                focused: "grid".into()
            }
        );
        assert_eq!(r.current_level(&g), Some(1));
        assert!(matches!(
            r.handle_back(&mut g),
            BackOutcome::Escaped { ref to, .. } if to == "sidebar"
        ));
    }

    #[test]
    fn test_unregistered_outer_level_is_ignored() {
        let mut g = graph();
        g.unregister_node("grid").unwrap();
        let mut r = router();
        g.set_focus("detail-a").unwrap();

        assert_eq!(r.handle_back(&mut g), BackOutcome::Ignored);
        assert_eq!(g.focused(), Some("detail-a"));
    }
}
