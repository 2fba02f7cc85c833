//! Focus graph
//!
//! An arena of nodes keyed by string. Parent links and each zone's
//! remembered child are plain keys into the arena, so removing a subtree
//! never leaves a dangling owner, only a key that no longer resolves.
//!
//! Exactly one node holds focus once anything has been focused. Focus
//! changes are reported as `FocusEvent`s which the host drains after
//! every input.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use super::node::{NodeSpec, Rect};
use super::spatial::{self, Direction};
use super::FocusError;

// =============================================================================
// Events
// =============================================================================

/// Side effects of focus changes, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    /// Node lost focus
    Blur(String),
    /// Node gained focus
    Focus(String),
    /// Focus entered a zone from outside it
    ZoneEntered(String),
    /// Item asked for its container to scroll it into view
    ScrollIntoView { item: String, container: String },
    /// Enter pressed on the focused item
    Activate(String),
}

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone)]
enum NodeKind {
    Zone {
        is_boundary: bool,
        restore_last_child: bool,
        preferred_child: Option<String>,
        last_focused: Option<String>,
    },
    Item {
        focusable: bool,
        scroll_into_view: bool,
    },
}

#[derive(Debug, Clone)]
struct FocusNode {
    parent: Option<String>,
    children: Vec<String>,
    bounds: Option<Rect>,
    kind: NodeKind,
}

impl FocusNode {
    fn from_spec(spec: NodeSpec, parent: Option<String>) -> (String, Self) {
        match spec {
            NodeSpec::Zone(z) => (
                z.key,
                Self {
                    parent,
                    children: Vec::new(),
                    bounds: z.bounds,
                    kind: NodeKind::Zone {
                        is_boundary: z.is_boundary,
                        restore_last_child: z.restore_last_child,
                        preferred_child: z.preferred_child,
                        last_focused: None,
                    },
                },
            ),
            NodeSpec::Item(i) => (
                i.key,
                Self {
                    parent,
                    children: Vec::new(),
                    bounds: i.bounds,
                    kind: NodeKind::Item {
                        focusable: i.focusable,
                        scroll_into_view: i.scroll_into_view,
                    },
                },
            ),
        }
    }

    fn is_zone(&self) -> bool {
        matches!(self.kind, NodeKind::Zone { .. })
    }

    fn is_focusable_item(&self) -> bool {
        matches!(self.kind, NodeKind::Item { focusable: true, .. })
    }

    fn is_boundary(&self) -> bool {
        matches!(self.kind, NodeKind::Zone { is_boundary: true, .. })
    }
}

// =============================================================================
// Graph
// =============================================================================

/// The navigable tree for one scene
#[derive(Debug, Default)]
pub struct FocusGraph {
    nodes: HashMap<String, FocusNode>,
    roots: Vec<String>,
    focused: Option<String>,
    events: VecDeque<FocusEvent>,
}

impl FocusGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Insert a zone or item under `parent` (or as a root)
    pub fn register_node(
        &mut self,
        spec: impl Into<NodeSpec>,
        parent: Option<&str>,
    ) -> Result<(), FocusError> {
        let spec = spec.into();
        if self.nodes.contains_key(spec.key()) {
            return Err(FocusError::DuplicateKey(spec.key().to_string()));
        }

        if let Some(p) = parent {
            let parent_node = self
                .nodes
                .get(p)
                .ok_or_else(|| FocusError::UnknownKey(p.to_string()))?;
            if !parent_node.is_zone() {
                return Err(FocusError::NotAZone(p.to_string()));
            }
        }

        let (key, node) = FocusNode::from_spec(spec, parent.map(str::to_string));
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => parent_node.children.push(key.clone()),
            None => self.roots.push(key.clone()),
        }
        debug!(key = %key, parent = ?parent, "focus node registered");
        self.nodes.insert(key, node);
        Ok(())
    }

    /// Remove a node and its whole subtree
    ///
    /// If focus was inside the subtree it moves to the parent's default
    /// target, or to the parent itself when nothing below it can take focus.
    pub fn unregister_node(&mut self, key: &str) -> Result<(), FocusError> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| FocusError::UnknownKey(key.to_string()))?;
        let parent = node.parent.clone();

        let subtree = self.subtree(key);
        let focus_inside = self
            .focused
            .as_ref()
            .is_some_and(|f| subtree.iter().any(|k| k == f));

        match parent.as_deref().and_then(|p| self.nodes.get_mut(p)) {
            Some(parent_node) => {
                parent_node.children.retain(|c| c != key);
                if let NodeKind::Zone { last_focused, .. } = &mut parent_node.kind {
                    if last_focused.as_deref() == Some(key) {
                        *last_focused = None;
                    }
                }
            }
            None => self.roots.retain(|r| r != key),
        }
        for k in &subtree {
            self.nodes.remove(k);
        }
        debug!(key = %key, removed = subtree.len(), "focus subtree unregistered");

        if focus_inside {
            if let Some(lost) = self.focused.take() {
                self.events.push_back(FocusEvent::Blur(lost));
            }
            self.relocate_focus(parent.as_deref());
        }
        Ok(())
    }

    /// Remove every child subtree of `zone`, keeping the zone itself
    ///
    /// Focus inside the zone lands on the zone once, however many
    /// children go away. Returns the number of nodes removed.
    pub fn unregister_children(&mut self, zone: &str) -> Result<usize, FocusError> {
        let node = self
            .nodes
            .get(zone)
            .ok_or_else(|| FocusError::UnknownKey(zone.to_string()))?;
        if !node.is_zone() {
            return Err(FocusError::NotAZone(zone.to_string()));
        }
        let children = node.children.clone();
        let focus_inside = self
            .focused
            .as_deref()
            .is_some_and(|f| f != zone && self.is_within(f, zone));

        let mut removed = 0;
        for child in &children {
            for k in self.subtree(child) {
                self.nodes.remove(&k);
                removed += 1;
            }
        }
        if let Some(node) = self.nodes.get_mut(zone) {
            node.children.clear();
            if let NodeKind::Zone { last_focused, .. } = &mut node.kind {
                *last_focused = None;
            }
        }
        debug!(zone = %zone, removed, "focus zone emptied");

        if focus_inside {
            if let Some(lost) = self.focused.take() {
                self.events.push_back(FocusEvent::Blur(lost));
            }
            self.assign(zone.to_string());
        }
        Ok(removed)
    }

    /// Remove every node (scene teardown)
    pub fn clear(&mut self) {
        if let Some(lost) = self.focused.take() {
            self.events.push_back(FocusEvent::Blur(lost));
        }
        self.nodes.clear();
        self.roots.clear();
    }

    /// Update a node's geometry after layout
    pub fn set_bounds(&mut self, key: &str, bounds: Rect) -> Result<(), FocusError> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or_else(|| FocusError::UnknownKey(key.to_string()))?;
        node.bounds = Some(bounds);
        Ok(())
    }

    /// Replace a zone's preferred child hint
    pub fn set_preferred_child(
        &mut self,
        zone: &str,
        preferred: Option<String>,
    ) -> Result<(), FocusError> {
        let node = self
            .nodes
            .get_mut(zone)
            .ok_or_else(|| FocusError::UnknownKey(zone.to_string()))?;
        match &mut node.kind {
            NodeKind::Zone {
                preferred_child, ..
            } => {
                *preferred_child = preferred;
                Ok(())
            }
            NodeKind::Item { .. } => Err(FocusError::NotAZone(zone.to_string())),
        }
    }

    // -------------------------------------------------------------------------
    // Focus operations
    // -------------------------------------------------------------------------

    /// Focus `key` directly
    ///
    /// A zone key delegates to the zone's default target; an empty zone
    /// takes focus itself.
    pub fn set_focus(&mut self, key: &str) -> Result<(), FocusError> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| FocusError::UnknownKey(key.to_string()))?;

        let target = if node.is_zone() {
            self.resolve_default(key).unwrap_or_else(|_| key.to_string())
        } else {
            key.to_string()
        };
        self.assign(target);
        Ok(())
    }

    /// Focus the default target of a zone and return its key
    ///
    /// Resolution order: remembered child, preferred child, first focusable
    /// descendant in traversal order.
    pub fn focus_default(&mut self, zone: &str) -> Result<String, FocusError> {
        let target = self.resolve_default(zone)?;
        self.assign(target.clone());
        Ok(target)
    }

    /// Move focus one step in `dir`
    ///
    /// Returns the newly focused key, or `None` (focus unchanged) when
    /// nothing lies in that direction inside the nearest boundary zone.
    pub fn move_focus(&mut self, dir: Direction) -> Option<String> {
        let current = self.focused.clone()?;
        let scope = self.boundary_of(&current);

        let mut order = Vec::new();
        match &scope {
            Some(zone) => self.collect_focusable(zone, &mut order),
            None => {
                for root in &self.roots {
                    self.collect_focusable(root, &mut order);
                }
            }
        }

        let origin_bounds = self.nodes.get(&current).and_then(|n| n.bounds);
        let target = match origin_bounds {
            Some(origin) => {
                let candidates: Vec<(&str, Rect)> = order
                    .iter()
                    .filter(|k| **k != current)
                    .filter_map(|k| {
                        self.nodes
                            .get(k)
                            .and_then(|n| n.bounds)
                            .map(|b| (k.as_str(), b))
                    })
                    .collect();
                spatial::best_candidate(&origin, dir, &candidates)
                    .map(|i| candidates[i].0.to_string())
            }
            None => Self::traversal_neighbor(&order, &current, dir),
        };

        match target {
            Some(t) => {
                debug!(from = %current, to = %t, ?dir, "focus moved");
                self.assign(t.clone());
                Some(t)
            }
            None => {
                debug!(from = %current, ?dir, "no focus candidate");
                None
            }
        }
    }

    /// Report an enter press on the focused item
    pub fn activate(&mut self) -> Option<String> {
        let focused = self.focused.clone()?;
        if self.nodes.get(&focused).is_some_and(|n| n.is_focusable_item()) {
            self.events.push_back(FocusEvent::Activate(focused.clone()));
            Some(focused)
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_focused(&self, key: &str) -> bool {
        self.focused.as_deref() == Some(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, key: &str) -> Option<&str> {
        self.nodes.get(key).and_then(|n| n.parent.as_deref())
    }

    pub fn children(&self, key: &str) -> &[String] {
        self.nodes
            .get(key)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The zone's remembered last focused child, if still registered
    pub fn last_focused_child(&self, zone: &str) -> Option<&str> {
        match self.nodes.get(zone).map(|n| &n.kind) {
            Some(NodeKind::Zone { last_focused, .. }) => last_focused
                .as_deref()
                .filter(|k| self.nodes.contains_key(*k)),
            _ => None,
        }
    }

    /// Whether `key` is `ancestor` or lies somewhere below it
    pub fn is_within(&self, key: &str, ancestor: &str) -> bool {
        let mut cursor = Some(key);
        while let Some(k) = cursor {
            if k == ancestor {
                return true;
            }
            cursor = self.parent(k);
        }
        false
    }

    /// Whether the focused node is inside `zone`
    pub fn focus_within(&self, zone: &str) -> bool {
        self.focused
            .as_deref()
            .is_some_and(|f| self.is_within(f, zone))
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<FocusEvent> {
        self.events.drain(..).collect()
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn assign(&mut self, target: String) {
        if self.focused.as_deref() == Some(target.as_str()) {
            return;
        }

        let previous = self.focused.take();
        let old_path: HashSet<String> = previous
            .as_deref()
            .map(|p| self.ancestors(p).into_iter().collect())
            .unwrap_or_default();
        if let Some(prev) = previous {
            self.events.push_back(FocusEvent::Blur(prev));
        }

        // Remember the path in every ancestor zone, innermost first
        let mut child = target.clone();
        let mut entered = Vec::new();
        while let Some(parent) = self.nodes.get(&child).and_then(|n| n.parent.clone()) {
            if let Some(NodeKind::Zone { last_focused, .. }) =
                self.nodes.get_mut(&parent).map(|n| &mut n.kind)
            {
                *last_focused = Some(child.clone());
            }
            if !old_path.contains(&parent) {
                entered.push(parent.clone());
            }
            child = parent;
        }

        self.focused = Some(target.clone());
        self.events.push_back(FocusEvent::Focus(target.clone()));
        for zone in entered.into_iter().rev() {
            self.events.push_back(FocusEvent::ZoneEntered(zone));
        }

        if let Some(node) = self.nodes.get(&target) {
            if let (NodeKind::Item { scroll_into_view: true, .. }, Some(container)) =
                (&node.kind, &node.parent)
            {
                self.events.push_back(FocusEvent::ScrollIntoView {
                    item: target.clone(),
                    container: container.clone(),
                });
            }
        }
    }

    fn resolve_default(&self, key: &str) -> Result<String, FocusError> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| FocusError::UnknownKey(key.to_string()))?;

        let (restore, preferred, last) = match &node.kind {
            NodeKind::Item { focusable: true, .. } => return Ok(key.to_string()),
            NodeKind::Item { .. } => {
                return Err(FocusError::NoFocusableDescendant(key.to_string()))
            }
            NodeKind::Zone {
                restore_last_child,
                preferred_child,
                last_focused,
                ..
            } => (*restore_last_child, preferred_child, last_focused),
        };

        if restore {
            if let Some(last) = last.as_deref().filter(|k| node.children.iter().any(|c| c.as_str() == *k)) {
                if let Ok(target) = self.resolve_default(last) {
                    return Ok(target);
                }
            }
        }

        if let Some(pref) = preferred
            .as_deref()
            .filter(|p| *p != key && self.contains(p) && self.is_within(p, key))
        {
            if let Ok(target) = self.resolve_default(pref) {
                return Ok(target);
            }
        }

        let mut order = Vec::new();
        self.collect_focusable(key, &mut order);
        order
            .into_iter()
            .next()
            .ok_or_else(|| FocusError::NoFocusableDescendant(key.to_string()))
    }

    fn relocate_focus(&mut self, start: Option<&str>) {
        let target = match start {
            Some(zone) => Some(
                self.resolve_default(zone)
                    .unwrap_or_else(|_| zone.to_string()),
            ),
            None => self.roots.first().map(|root| {
                self.resolve_default(root)
                    .unwrap_or_else(|_| root.clone())
            }),
        };

        match target {
            Some(t) => {
                debug!(to = %t, "focus relocated after removal");
                self.assign(t);
            }
            None => warn!("focus graph is empty, nothing holds focus"),
        }
    }

    /// Nearest boundary zone containing `key` (excluding `key` itself)
    fn boundary_of(&self, key: &str) -> Option<String> {
        let mut cursor = self.parent(key);
        while let Some(k) = cursor {
            if self.nodes.get(k).is_some_and(|n| n.is_boundary()) {
                return Some(k.to_string());
            }
            cursor = self.parent(k);
        }
        None
    }

    fn ancestors(&self, key: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut cursor = self.parent(key);
        while let Some(k) = cursor {
            out.push(k.to_string());
            cursor = self.parent(k);
        }
        out
    }

    /// Keys of `key` and all descendants, pre-order
    fn subtree(&self, key: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![key.to_string()];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.get(&k) {
                stack.extend(node.children.iter().rev().cloned());
            }
            out.push(k);
        }
        out
    }

    /// Focusable items under `key` in traversal order
    fn collect_focusable(&self, key: &str, out: &mut Vec<String>) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        if node.is_focusable_item() {
            out.push(key.to_string());
        }
        for child in &node.children {
            self.collect_focusable(child, out);
        }
    }

    /// Step through traversal order when the origin has no layout yet
    fn traversal_neighbor(order: &[String], current: &str, dir: Direction) -> Option<String> {
        let idx = order.iter().position(|k| k == current)?;
        let next = if dir.is_forward() {
            idx.checked_add(1)?
        } else {
            idx.checked_sub(1)?
        };
        order.get(next).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::node::{FocusZone, FocusableItem};

    fn scene() -> FocusGraph {
        let mut g = FocusGraph::new();
        g.register_node(FocusZone::new("root"), None).unwrap();
        g.register_node(FocusZone::new("sidebar"), Some("root")).unwrap();
        g.register_node(FocusZone::new("grid"), Some("root")).unwrap();
        for i in 0..3 {
            g.register_node(
                FocusableItem::new(format!("cat-{i}")).bounds(Rect::new(0, i * 3, 10, 2)),
                Some("sidebar"),
            )
            .unwrap();
            g.register_node(
                FocusableItem::new(format!("tile-{i}")).bounds(Rect::new(20 + i * 12, 0, 10, 6)),
                Some("grid"),
            )
            .unwrap();
        }
        g
    }

    #[test]
    fn test_register_duplicate_key() {
        let mut g = scene();
        let err = g.register_node(FocusableItem::new("cat-0"), Some("sidebar"));
        assert_eq!(err, Err(FocusError::DuplicateKey("cat-0".into())));
    }

    #[test]
    fn test_register_under_unknown_or_item_parent() {
        let mut g = scene();
        assert_eq!(
            g.register_node(FocusableItem::new("x"), Some("nope")),
            Err(FocusError::UnknownKey("nope".into()))
        );
        assert_eq!(
            g.register_node(FocusableItem::new("x"), Some("cat-0")),
            Err(FocusError::NotAZone("cat-0".into()))
        );
    }

    #[test]
    fn test_set_focus_unknown_key() {
        let mut g = scene();
        assert_eq!(
            g.set_focus("ghost"),
            Err(FocusError::UnknownKey("ghost".into()))
        );
        assert_eq!(g.focused(), None);
    }

    #[test]
    fn test_set_focus_remembers_path() {
        let mut g = scene();
        g.set_focus("tile-2").unwrap();
        assert_eq!(g.last_focused_child("grid"), Some("tile-2"));
        assert_eq!(g.last_focused_child("root"), Some("grid"));
    }

    #[test]
    fn test_focus_default_order() {
        let mut g = scene();

        // First focusable descendant
        assert_eq!(g.focus_default("grid").unwrap(), "tile-0");

        // Preferred child when nothing is remembered
        g.set_preferred_child("sidebar", Some("cat-2".into())).unwrap();
        assert_eq!(g.focus_default("sidebar").unwrap(), "cat-2");

        // Remembered child beats preferred
        g.set_focus("cat-1").unwrap();
        g.set_focus("tile-0").unwrap();
        assert_eq!(g.focus_default("sidebar").unwrap(), "cat-1");
    }

    #[test]
    fn test_focus_default_empty_zone() {
        let mut g = scene();
        g.register_node(FocusZone::new("detail"), Some("root")).unwrap();
        assert_eq!(
            g.focus_default("detail"),
            Err(FocusError::NoFocusableDescendant("detail".into()))
        );
    }

    #[test]
    fn test_restore_disabled_zone_ignores_memory() {
        let mut g = FocusGraph::new();
        g.register_node(FocusZone::new("z").restore_last_child(false), None)
            .unwrap();
        g.register_node(FocusableItem::new("a"), Some("z")).unwrap();
        g.register_node(FocusableItem::new("b"), Some("z")).unwrap();
        g.set_focus("b").unwrap();
        assert_eq!(g.focus_default("z").unwrap(), "a");
    }

    #[test]
    fn test_events_on_focus_change() {
        let mut g = FocusGraph::new();
        g.register_node(FocusZone::new("z"), None).unwrap();
        g.register_node(FocusableItem::new("a").scroll_into_view(), Some("z"))
            .unwrap();
        g.register_node(FocusableItem::new("b"), Some("z")).unwrap();

        g.set_focus("a").unwrap();
        assert_eq!(
            g.drain_events(),
            vec![
                FocusEvent::Focus("a".into()),
                FocusEvent::ZoneEntered("z".into()),
                FocusEvent::ScrollIntoView {
                    item: "a".into(),
                    container: "z".into()
                },
            ]
        );

        g.set_focus("b").unwrap();
        assert_eq!(
            g.drain_events(),
            vec![FocusEvent::Blur("a".into()), FocusEvent::Focus("b".into())]
        );

        // Refocusing the same node is silent
        g.set_focus("b").unwrap();
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_move_focus_spatial() {
        let mut g = scene();
        g.set_focus("cat-0").unwrap();
        assert_eq!(g.move_focus(Direction::Down).as_deref(), Some("cat-1"));
        assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("tile-0"));
        assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("tile-1"));
    }

    #[test]
    fn test_move_focus_no_candidate_is_noop() {
        let mut g = scene();
        g.set_focus("cat-0").unwrap();
        g.drain_events();
        assert_eq!(g.move_focus(Direction::Up), None);
        assert_eq!(g.move_focus(Direction::Left), None);
        assert_eq!(g.focused(), Some("cat-0"));
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_boundary_zone_traps_movement() {
        let mut g = scene();
        g.register_node(FocusZone::new("modal").boundary(), Some("root"))
            .unwrap();
        g.register_node(
            FocusableItem::new("ok").bounds(Rect::new(60, 20, 10, 2)),
            Some("modal"),
        )
        .unwrap();
        g.set_focus("ok").unwrap();
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(g.move_focus(dir), None);
        }
        assert_eq!(g.focused(), Some("ok"));
    }

    #[test]
    fn test_move_focus_traversal_without_layout() {
        let mut g = FocusGraph::new();
        g.register_node(FocusZone::new("list"), None).unwrap();
        for k in ["a", "b", "c"] {
            g.register_node(FocusableItem::new(k), Some("list")).unwrap();
        }
        g.register_node(FocusableItem::new("hidden").disabled(), Some("list"))
            .unwrap();
        g.set_focus("a").unwrap();
        assert_eq!(g.move_focus(Direction::Down).as_deref(), Some("b"));
        assert_eq!(g.move_focus(Direction::Right).as_deref(), Some("c"));
        assert_eq!(g.move_focus(Direction::Down), None);
        assert_eq!(g.move_focus(Direction::Up).as_deref(), Some("b"));
    }

    #[test]
    fn test_unregister_focused_item_relocates_to_sibling() {
        let mut g = scene();
        g.set_focus("tile-1").unwrap();
        g.unregister_node("tile-1").unwrap();
        assert_eq!(g.focused(), Some("tile-0"));
        assert_eq!(g.last_focused_child("grid"), Some("tile-0"));
    }

    #[test]
    fn test_unregister_zone_relocates_to_ancestor_memory() {
        let mut g = scene();
        g.set_focus("cat-2").unwrap();
        g.set_focus("tile-1").unwrap();
        g.unregister_node("grid").unwrap();
        assert!(!g.contains("tile-0"));
        // root remembered "grid" which is gone, so the first focusable wins
        assert_eq!(g.focused(), Some("cat-0"));
    }

    #[test]
    fn test_unregister_last_item_focuses_parent_zone() {
        let mut g = FocusGraph::new();
        g.register_node(FocusZone::new("z"), None).unwrap();
        g.register_node(FocusableItem::new("only"), Some("z")).unwrap();
        g.set_focus("only").unwrap();
        g.unregister_node("only").unwrap();
        assert_eq!(g.focused(), Some("z"));
    }

    #[test]
    fn test_unregister_root_empties_focus() {
        let mut g = scene();
        g.set_focus("cat-0").unwrap();
        g.unregister_node("root").unwrap();
        assert!(g.is_empty());
        assert_eq!(g.focused(), None);
    }

    #[test]
    fn test_unregister_unfocused_keeps_focus() {
        let mut g = scene();
        g.set_focus("cat-0").unwrap();
        g.drain_events();
        g.unregister_node("tile-2").unwrap();
        assert_eq!(g.focused(), Some("cat-0"));
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_unregister_children_moves_focus_once() {
        let mut g = scene();
        for i in 3..5 {
            g.register_node(FocusableItem::new(format!("tile-{i}")), Some("grid"))
                .unwrap();
        }
        g.set_focus("tile-3").unwrap();
        g.drain_events();

        assert_eq!(g.unregister_children("grid"), Ok(5));
        assert!(g.children("grid").is_empty());
        assert_eq!(g.focused(), Some("grid"));
        assert_eq!(g.last_focused_child("grid"), None);
        assert_eq!(
            g.drain_events(),
            vec![
                FocusEvent::Blur("tile-3".into()),
                FocusEvent::Focus("grid".into()),
            ]
        );
    }

    #[test]
    fn test_unregister_children_elsewhere_keeps_focus() {
        let mut g = scene();
        g.set_focus("cat-1").unwrap();
        g.drain_events();
        g.unregister_children("grid").unwrap();
        assert_eq!(g.focused(), Some("cat-1"));
        assert!(g.drain_events().is_empty());
        assert_eq!(
            g.unregister_children("cat-1"),
            Err(FocusError::NotAZone("cat-1".into()))
        );
        assert_eq!(
            g.unregister_children("nope"),
            Err(FocusError::UnknownKey("nope".into()))
        );
    }

    #[test]
    fn test_activate_only_items() {
        let mut g = scene();
        assert_eq!(g.activate(), None);
        g.set_focus("tile-0").unwrap();
        assert_eq!(g.activate().as_deref(), Some("tile-0"));
        assert!(g
            .drain_events()
            .contains(&FocusEvent::Activate("tile-0".into())));
    }

    #[test]
    fn test_is_within() {
        let g = scene();
        assert!(g.is_within("tile-0", "grid"));
        assert!(g.is_within("tile-0", "root"));
        assert!(g.is_within("grid", "grid"));
        assert!(!g.is_within("tile-0", "sidebar"));
    }
}
