//! Back navigation tests
//!
//! Series browsing: sidebar, poster grid, episode list, plus a resume
//! prompt opened from an episode.

use couchtv::back::{BackNavigationRouter, BackOutcome, EscapeLevel};
use couchtv::focus::{FocusGraph, FocusZone, FocusableItem};

fn graph() -> FocusGraph {
    let mut g = FocusGraph::new();
    g.register_node(FocusZone::new("scene"), None).unwrap();
    for (zone, items) in [
        ("sidebar", ["cat-1", "cat-2"]),
        ("grid", ["series-10", "series-11"]),
        ("episodes", ["episode-100", "episode-101"]),
    ] {
        g.register_node(FocusZone::new(zone), Some("scene")).unwrap();
        for item in items {
            g.register_node(FocusableItem::new(item), Some(zone)).unwrap();
        }
    }
    g
}

fn router() -> BackNavigationRouter {
    BackNavigationRouter::new([
        EscapeLevel::new("episodes", "episodes"),
        EscapeLevel::new("grid", "grid"),
        EscapeLevel::new("sidebar", "sidebar"),
    ])
}

fn open_prompt(g: &mut FocusGraph, r: &mut BackNavigationRouter) {
    g.register_node(FocusZone::new("resume").boundary(), None).unwrap();
    for key in ["resume-continue", "resume-start-over", "resume-cancel"] {
        g.register_node(FocusableItem::new(key), Some("resume")).unwrap();
    }
    assert_eq!(r.present_modal(g, "resume").unwrap(), "resume-continue");
}

#[test]
fn test_each_back_press_unwinds_one_level() {
    let mut g = graph();
    let mut r = router();

    // User path: category, series, episode, then the prompt
    g.set_focus("cat-2").unwrap();
    g.set_focus("series-11").unwrap();
    g.set_focus("episode-101").unwrap();
    open_prompt(&mut g, &mut r);
    assert!(r.is_modal_open());

    assert_eq!(
        r.handle_back(&mut g),
        BackOutcome::ModalClosed {
            zone: "resume".into(),
            restored: Some("episode-101".into()),
        }
    );
    assert!(!g.contains("resume"));
    assert_eq!(g.focused(), Some("episode-101"));

    assert_eq!(
        r.handle_back(&mut g),
        BackOutcome::Escaped {
            from: "episodes".into(),
            to: "grid".into(),
            focused: "series-11".into(),
        }
    );

    assert_eq!(
        r.handle_back(&mut g),
        BackOutcome::Escaped {
            from: "grid".into(),
            to: "sidebar".into(),
            focused: "cat-2".into(),
        }
    );

    assert_eq!(r.handle_back(&mut g), BackOutcome::Exit);
    // Exit leaves focus alone
    assert_eq!(g.focused(), Some("cat-2"));
}

#[test]
fn test_level_is_derived_from_focus_not_history() {
    let mut g = graph();
    let mut r = router();

    // Jump straight into the grid without ever touching episodes
    g.set_focus("series-10").unwrap();
    assert_eq!(r.current_level(&g), Some(1));
    assert!(matches!(
        r.handle_back(&mut g),
        BackOutcome::Escaped { ref to, .. } if to == "sidebar"
    ));
}

#[test]
fn test_empty_level_is_still_one_press() {
    let mut g = graph();
    let mut r = router();
    g.set_focus("episode-100").unwrap();

    // Grid emptied (e.g. category with no titles)
    g.unregister_node("series-10").unwrap();
    g.unregister_node("series-11").unwrap();

    assert_eq!(
        r.handle_back(&mut g),
        BackOutcome::Escaped {
            from: "episodes".into(),
            to: "grid".into(),
            focused: "grid".into(),
        }
    );
    assert_eq!(g.focused(), Some("grid"));

    assert!(matches!(
        r.handle_back(&mut g),
        BackOutcome::Escaped { ref to, ref focused, .. } if to == "sidebar" && focused == "cat-1"
    ));
    assert_eq!(r.handle_back(&mut g), BackOutcome::Exit);
}

#[test]
fn test_modal_opener_gone_still_closes() {
    let mut g = graph();
    let mut r = router();
    g.set_focus("episode-100").unwrap();
    open_prompt(&mut g, &mut r);

    // Episode list rebuilt while the prompt was up
    g.unregister_node("episode-100").unwrap();

    assert_eq!(
        r.handle_back(&mut g),
        BackOutcome::ModalClosed {
            zone: "resume".into(),
            restored: None,
        }
    );
    assert!(!r.is_modal_open());
}
