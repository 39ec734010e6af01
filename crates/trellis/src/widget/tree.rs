//! The widget arena and read-only tree queries.
//!
//! Parent and child links are plain [`WidgetId`]s into the arena. The arena
//! owns every node; a link never keeps a widget alive.

use slotmap::SlotMap;
use trellis_core::{format_tree, Area, Point, TreeFormatOptions};

use crate::event::EventType;
use crate::widget::{Widget, WidgetId};

/// Outcome of a hit-test below one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Found(WidgetId),
    /// A widget that does not let the event pass covers the point.
    Blocked,
    Miss,
}

/// Arena of all widgets of a window, rooted at the window widget.
#[derive(Debug)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, Widget>,
    root: WidgetId,
}

impl WidgetTree {
    pub(crate) fn new(mut root: Widget) -> Self {
        root.attached = true;
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(root);
        Self { nodes, root }
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.nodes.keys()
    }

    pub(crate) fn insert(&mut self, widget: Widget) -> WidgetId {
        self.nodes.insert(widget)
    }

    pub(crate) fn remove(&mut self, id: WidgetId) -> Option<Widget> {
        if id == self.root {
            return None;
        }
        self.nodes.remove(id)
    }

    /// Children of `id` back to front: ascending layer, then insertion
    /// order.
    pub fn paint_order(&self, id: WidgetId) -> Vec<WidgetId> {
        let Some(widget) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<(i32, usize, WidgetId)> = widget
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| self.nodes.get(*c).map(|w| (w.layer, i, *c)))
            .collect();
        children.sort_by_key(|(layer, index, _)| (*layer, *index));
        children.into_iter().map(|(_, _, c)| c).collect()
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut current = self.nodes.get(id).and_then(|w| w.parent);
        while let Some(parent) = current {
            out.push(parent);
            current = self.nodes.get(parent).and_then(|w| w.parent);
        }
        out
    }

    /// Whether `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// `id` and all of its descendants, parents before children.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(widget) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(widget.children.iter().rev().copied());
        }
        out
    }

    /// Position of `id` in root coordinates. The root's own position is
    /// the origin.
    pub fn absolute_position(&self, id: WidgetId) -> Point {
        let mut position = Point::ZERO;
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == self.root {
                break;
            }
            let Some(widget) = self.nodes.get(cur) else {
                break;
            };
            position += widget.area.position();
            current = widget.parent;
        }
        position
    }

    /// Area of `id` in root coordinates.
    pub fn absolute_area(&self, id: WidgetId) -> Area {
        let extends = self.nodes.get(id).map_or(Point::ZERO, |w| w.area.extends());
        Area::from_position(self.absolute_position(id), extends)
    }

    /// The visible part of `id` in root coordinates: its absolute area
    /// clipped by every ancestor's.
    pub fn visible_area(&self, id: WidgetId) -> Area {
        let mut area = self.absolute_area(id);
        for ancestor in self.ancestors(id) {
            area = area.intersection(&self.absolute_area(ancestor));
        }
        area
    }

    /// Visibility flag set on `id` and every ancestor, and linked to the
    /// root.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let Some(widget) = self.nodes.get(id) else {
            return false;
        };
        if !widget.visible || !widget.attached {
            return false;
        }
        self.ancestors(id)
            .into_iter()
            .all(|a| self.nodes.get(a).is_some_and(|w| w.visible))
    }

    /// Topmost widget at `point` (root coordinates) accepted by `filter`.
    ///
    /// Children are searched front to back before their parent. A widget
    /// whose passable mask contains `passable` is skipped. One that covers
    /// the point but fails `filter` ends the search. With `passable == None`
    /// every widget lets the search continue.
    pub fn widget_at(
        &self,
        point: Point,
        filter: &dyn Fn(&Widget) -> bool,
        passable: Option<EventType>,
    ) -> Option<WidgetId> {
        self.widget_at_below(self.root, point - self.absolute_position(self.root), filter, passable)
    }

    /// [`widget_at`](Self::widget_at) restricted to the subtree of `from`,
    /// with `point` in `from`'s coordinates.
    pub fn widget_at_below(
        &self,
        from: WidgetId,
        point: Point,
        filter: &dyn Fn(&Widget) -> bool,
        passable: Option<EventType>,
    ) -> Option<WidgetId> {
        match self.hit(from, point, filter, passable) {
            Hit::Found(id) => Some(id),
            Hit::Blocked | Hit::Miss => None,
        }
    }

    fn hit(
        &self,
        id: WidgetId,
        point: Point,
        filter: &dyn Fn(&Widget) -> bool,
        passable: Option<EventType>,
    ) -> Hit {
        let Some(widget) = self.nodes.get(id) else {
            return Hit::Miss;
        };
        if !widget.visible || !widget.local_area().contains(point) {
            return Hit::Miss;
        }

        for child in self.paint_order(id).into_iter().rev() {
            let offset = self.nodes.get(child).map_or(Point::ZERO, |c| c.area.position());
            match self.hit(child, point - offset, filter, passable) {
                Hit::Miss => continue,
                found_or_blocked => return found_or_blocked,
            }
        }

        let passes = passable.is_some_and(|kind| !kind.is_empty() && widget.passable.contains(kind));
        if !passes && filter(widget) {
            return Hit::Found(id);
        }
        if passable.is_none() || passes {
            Hit::Miss
        } else {
            Hit::Blocked
        }
    }

    /// Render the subtree of `id` as text.
    pub fn format(&self, id: WidgetId, options: &TreeFormatOptions) -> String {
        let label = |id: &WidgetId| match self.nodes.get(*id) {
            Some(w) => {
                let a = w.area;
                format!(
                    "{} [{}] ({}, {} {}x{}) layer={}{}",
                    w.title,
                    w.urid,
                    a.x(),
                    a.y(),
                    a.width(),
                    a.height(),
                    w.layer,
                    if w.visible { "" } else { " hidden" }
                )
            }
            None => "<dead>".to_owned(),
        };
        let children = |id: &WidgetId| self.paint_order(*id);
        format_tree(&id, options, &label, &children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::widget::WidgetBuilder;

    fn tree_with(children: &[(&str, Area, i32)]) -> (WidgetTree, Vec<WidgetId>) {
        let root = WidgetBuilder::new("root").with_area(Area::new(0.0, 0.0, 100.0, 100.0)).build();
        let mut tree = WidgetTree::new(root);
        let root = tree.root();
        let mut ids = Vec::new();
        for (title, area, layer) in children {
            let mut w = WidgetBuilder::new(*title)
                .with_area(*area)
                .with_layer(*layer)
                .with_capabilities(Capability::CLICKABLE)
                .build();
            w.parent = Some(root);
            w.attached = true;
            let id = tree.insert(w);
            tree.get_mut(root).unwrap().children.push(id);
            ids.push(id);
        }
        (tree, ids)
    }

    fn clickable(w: &Widget) -> bool {
        w.has(Capability::CLICKABLE)
    }

    #[test]
    fn test_higher_layer_wins() {
        let (tree, ids) = tree_with(&[
            ("b", Area::new(10.0, 10.0, 50.0, 50.0), 1),
            ("a", Area::new(20.0, 20.0, 50.0, 50.0), 0),
        ]);
        let hit = tree.widget_at(Point::new(30.0, 30.0), &clickable, Some(EventType::BUTTON_PRESS));
        assert_eq!(hit, Some(ids[0]));
    }

    #[test]
    fn test_later_added_wins_within_layer() {
        let (tree, ids) = tree_with(&[
            ("a", Area::new(10.0, 10.0, 50.0, 50.0), 0),
            ("b", Area::new(20.0, 20.0, 50.0, 50.0), 0),
        ]);
        let hit = tree.widget_at(Point::new(30.0, 30.0), &clickable, Some(EventType::BUTTON_PRESS));
        assert_eq!(hit, Some(ids[1]));
        assert_eq!(tree.paint_order(tree.root()), ids);
    }

    #[test]
    fn test_blocking_and_passable() {
        let (mut tree, ids) = tree_with(&[
            ("below", Area::new(0.0, 0.0, 50.0, 50.0), 0),
            ("cover", Area::new(0.0, 0.0, 50.0, 50.0), 1),
        ]);
        tree.get_mut(ids[1]).unwrap().capabilities = Default::default();
        let p = Point::new(10.0, 10.0);
        assert_eq!(tree.widget_at(p, &clickable, Some(EventType::BUTTON_PRESS)), None);

        tree.get_mut(ids[1]).unwrap().passable = EventType::BUTTON_PRESS;
        assert_eq!(tree.widget_at(p, &clickable, Some(EventType::BUTTON_PRESS)), Some(ids[0]));

        tree.get_mut(ids[1]).unwrap().passable = EventType::empty();
        assert_eq!(tree.widget_at(p, &clickable, None), Some(ids[0]));
    }

    #[test]
    fn test_passable_widget_is_skipped_even_when_matching() {
        let (mut tree, ids) = tree_with(&[
            ("below", Area::new(0.0, 0.0, 50.0, 50.0), 0),
            ("overlay", Area::new(0.0, 0.0, 50.0, 50.0), 1),
        ]);
        tree.get_mut(ids[1]).unwrap().passable = EventType::BUTTON_PRESS;
        let p = Point::new(10.0, 10.0);
        assert_eq!(tree.widget_at(p, &clickable, Some(EventType::BUTTON_PRESS)), Some(ids[0]));
        assert_eq!(tree.widget_at(p, &clickable, Some(EventType::WHEEL_SCROLL)), Some(ids[1]));
    }

    #[test]
    fn test_hidden_widgets_are_skipped() {
        let (mut tree, ids) = tree_with(&[("a", Area::new(0.0, 0.0, 50.0, 50.0), 0)]);
        tree.get_mut(ids[0]).unwrap().visible = false;
        assert!(!tree.is_visible(ids[0]));
        assert_eq!(tree.widget_at(Point::new(5.0, 5.0), &clickable, None), None);
    }

    #[test]
    fn test_absolute_position_sums_chain() {
        let (mut tree, ids) = tree_with(&[("a", Area::new(10.0, 20.0, 50.0, 50.0), 0)]);
        let mut inner = WidgetBuilder::new("inner").with_area(Area::new(5.0, 5.0, 10.0, 10.0)).build();
        inner.parent = Some(ids[0]);
        inner.attached = true;
        let inner = tree.insert(inner);
        tree.get_mut(ids[0]).unwrap().children.push(inner);

        assert_eq!(tree.absolute_position(inner), Point::new(15.0, 25.0));
        assert_eq!(tree.ancestors(inner), vec![ids[0], tree.root()]);
        assert_eq!(tree.subtree(tree.root()), vec![tree.root(), ids[0], inner]);
        assert!(tree.is_ancestor(tree.root(), inner));
    }

    #[test]
    fn test_format_lists_children() {
        let (tree, _) = tree_with(&[("child", Area::new(0.0, 0.0, 1.0, 1.0), 0)]);
        let out = tree.format(tree.root(), &TreeFormatOptions::ascii());
        assert!(out.starts_with("root"));
        assert!(out.contains("child"));
    }
}
