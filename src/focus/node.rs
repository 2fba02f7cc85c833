//! Focus node configuration
//!
//! `FocusZone` and `FocusableItem` are the builder-style descriptions a
//! scene hands to the graph when it registers nodes. The graph owns the
//! resulting tree; parent/child links are key references only.

use serde::{Deserialize, Serialize};

/// Bounding box in layout units (pixels on a TV, cells in a terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Doubled center coordinates `(2x + w, 2y + h)`, exact without division
    pub fn center2(&self) -> (i64, i64) {
        (
            2 * i64::from(self.x) + i64::from(self.width),
            2 * i64::from(self.y) + i64::from(self.height),
        )
    }
}

/// A named group of items and nested zones
#[derive(Debug, Clone, PartialEq)]
pub struct FocusZone {
    pub key: String,
    /// Directional movement never leaves this zone
    pub is_boundary: bool,
    /// Return to the last focused child when the zone regains focus
    pub restore_last_child: bool,
    /// Hint used when there is no remembered child
    pub preferred_child: Option<String>,
    pub bounds: Option<Rect>,
}

impl FocusZone {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_boundary: false,
            restore_last_child: true,
            preferred_child: None,
            bounds: None,
        }
    }

    pub fn boundary(mut self) -> Self {
        self.is_boundary = true;
        self
    }

    pub fn restore_last_child(mut self, restore: bool) -> Self {
        self.restore_last_child = restore;
        self
    }

    pub fn preferred_child(mut self, key: impl Into<String>) -> Self {
        self.preferred_child = Some(key.into());
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// One selectable control
#[derive(Debug, Clone, PartialEq)]
pub struct FocusableItem {
    pub key: String,
    /// Disabled items stay in the tree but are never focus targets
    pub focusable: bool,
    /// Ask the host to scroll the item's container when it gains focus
    pub scroll_into_view: bool,
    pub bounds: Option<Rect>,
}

impl FocusableItem {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            focusable: true,
            scroll_into_view: false,
            bounds: None,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.focusable = false;
        self
    }

    pub fn scroll_into_view(mut self) -> Self {
        self.scroll_into_view = true;
        self
    }

    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Either kind of node, as accepted by `FocusGraph::register_node`
#[derive(Debug, Clone, PartialEq)]
pub enum NodeSpec {
    Zone(FocusZone),
    Item(FocusableItem),
}

impl NodeSpec {
    pub fn key(&self) -> &str {
        match self {
            NodeSpec::Zone(z) => &z.key,
            NodeSpec::Item(i) => &i.key,
        }
    }
}

impl From<FocusZone> for NodeSpec {
    fn from(zone: FocusZone) -> Self {
        NodeSpec::Zone(zone)
    }
}

impl From<FocusableItem> for NodeSpec {
    fn from(item: FocusableItem) -> Self {
        NodeSpec::Item(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_defaults_restore_last_child() {
        let zone = FocusZone::new("grid");
        assert!(zone.restore_last_child);
        assert!(!zone.is_boundary);
        assert!(zone.preferred_child.is_none());
    }

    #[test]
    fn test_item_builder() {
        let item = FocusableItem::new("play")
            .scroll_into_view()
            .bounds(Rect::new(0, 0, 10, 2));
        assert!(item.focusable);
        assert!(item.scroll_into_view);
        assert_eq!(item.bounds, Some(Rect::new(0, 0, 10, 2)));
        assert!(!FocusableItem::new("x").disabled().focusable);
    }

    #[test]
    fn test_center2() {
        assert_eq!(Rect::new(10, 4, 6, 2).center2(), (26, 10));
    }
}
