//! Focus navigation tests
//!
//! A TV-style layout: a category sidebar on the left, a 3x2 poster grid in
//! the middle and a detail pane with two buttons on the right.
//!
//! ```text
//!   [cat-0]   [p0] [p1] [p2]   [play]
//!   [cat-1]   [p3] [p4] [p5]   [fav]
//!   [cat-2]
//! ```

use couchtv::focus::{Direction, FocusEvent, FocusGraph, FocusZone, FocusableItem, Rect};

fn layout() -> FocusGraph {
    let mut g = FocusGraph::new();
    g.register_node(FocusZone::new("root"), None).unwrap();
    g.register_node(FocusZone::new("sidebar"), Some("root")).unwrap();
    g.register_node(FocusZone::new("grid"), Some("root")).unwrap();
    g.register_node(FocusZone::new("detail"), Some("root")).unwrap();

    for i in 0..3 {
        g.register_node(
            FocusableItem::new(format!("cat-{i}")).bounds(Rect::new(0, i * 4, 20, 3)),
            Some("sidebar"),
        )
        .unwrap();
    }
    for i in 0..6 {
        let (col, row) = (i % 3, i / 3);
        g.register_node(
            FocusableItem::new(format!("p{i}"))
                .bounds(Rect::new(30 + col * 12, row * 8, 10, 7))
                .scroll_into_view(),
            Some("grid"),
        )
        .unwrap();
    }
    g.register_node(
        FocusableItem::new("play").bounds(Rect::new(80, 0, 16, 3)),
        Some("detail"),
    )
    .unwrap();
    g.register_node(
        FocusableItem::new("fav").bounds(Rect::new(80, 4, 16, 3)),
        Some("detail"),
    )
    .unwrap();
    g
}

#[test]
fn test_arrow_walk_across_zones() {
    let mut g = layout();
    g.set_focus("cat-2").unwrap();

    assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("p3"));
    assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("p4"));
    assert_eq!(g.move_focus(Direction::Up).as_deref(), Some("p1"));
    assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("p2"));
    assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("play"));
    assert_eq!(g.move_focus(Direction::Down).as_deref(), Some("fav"));
    // Nothing further right
    assert_eq!(g.move_focus(Direction::Right), None);
    assert_eq!(g.focused(), Some("fav"));
    assert_eq!(g.move_focus(Direction::Left).as_deref(), Some("p2"));
}

#[test]
fn test_same_layout_gives_same_path() {
    let path = |g: &mut FocusGraph| {
        g.set_focus("cat-0").unwrap();
        [Direction::Right, Direction::Down, Direction::Right, Direction::Up]
            .into_iter()
            .map(|d| g.move_focus(d))
            .collect::<Vec<_>>()
    };
    assert_eq!(path(&mut layout()), path(&mut layout()));
}

#[test]
fn test_zone_remembers_last_child() {
    let mut g = layout();
    g.set_focus("p5").unwrap();
    g.set_focus("cat-0").unwrap();

    assert_eq!(g.last_focused_child("grid"), Some("p5"));
    assert_eq!(g.focus_default("grid").unwrap(), "p5");

    // Setting focus to a zone key lands on its default target
    g.set_focus("sidebar").unwrap();
    assert_eq!(g.focused(), Some("cat-0"));
}

#[test]
fn test_entering_grid_reports_zone_and_scroll() {
    let mut g = layout();
    g.set_focus("cat-0").unwrap();
    g.drain_events();

    g.move_focus(Direction::Right);
    assert_eq!(
        g.drain_events(),
        vec![
            FocusEvent::Blur("cat-0".into()),
            FocusEvent::Focus("p0".into()),
            FocusEvent::ZoneEntered("grid".into()),
            FocusEvent::ScrollIntoView {
                item: "p0".into(),
                container: "grid".into()
            },
        ]
    );

    // Moving inside the zone does not re-enter it
    g.move_focus(Direction::Right);
    let events = g.drain_events();
    assert!(!events.contains(&FocusEvent::ZoneEntered("grid".into())));
}

#[test]
fn test_activate_reports_focused_item() {
    let mut g = layout();
    assert_eq!(g.activate(), None);

    g.set_focus("play").unwrap();
    g.drain_events();
    assert_eq!(g.activate().as_deref(), Some("play"));
    assert_eq!(g.drain_events(), vec![FocusEvent::Activate("play".into())]);
}

#[test]
fn test_replacing_grid_contents_keeps_focus_in_grid() {
    let mut g = layout();
    g.set_focus("p4").unwrap();

    // New category selected: old posters go away, focus falls back
    for i in 0..6 {
        g.unregister_node(&format!("p{i}")).unwrap();
    }
    assert_eq!(g.focused(), Some("grid"));

    g.register_node(
        FocusableItem::new("q0").bounds(Rect::new(30, 0, 10, 7)),
        Some("grid"),
    )
    .unwrap();
    assert_eq!(g.focus_default("grid").unwrap(), "q0");
    assert!(g.is_within("q0", "root"));
}
