//! Quad-tree spatial index of renderable entities.
//!
//! The index is rebuilt from scratch every render tick by
//! [`crate::systems::spatial::rebuild_spatial_index`]; cameras then query it
//! with their view bounds.
//!
//! Items are stored at the deepest node whose bounds fully contain them.
//! Items straddling a split line stay at the parent, and items outside the
//! root bounds stay at the root, so every inserted item is reachable.

use bevy_ecs::prelude::{Entity, Resource};
use raylib::prelude::Vector2;

use crate::components::boundingarea::BoundingArea;

pub const DEFAULT_MAX_DEPTH: u32 = 6;
pub const DEFAULT_MAX_ITEMS: usize = 8;

#[derive(Debug, Clone)]
struct QuadNode<T> {
    bounds: BoundingArea,
    depth: u32,
    items: Vec<(BoundingArea, T)>,
    children: Option<Box<[QuadNode<T>; 4]>>,
}

impl<T> QuadNode<T> {
    fn new(bounds: BoundingArea, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }

    fn child_for(&mut self, area: &BoundingArea) -> Option<&mut QuadNode<T>> {
        self.children
            .as_mut()
            .and_then(|children| children.iter_mut().find(|c| c.bounds.contains(area)))
    }

    fn insert(&mut self, area: BoundingArea, item: T, max_depth: u32, max_items: usize) {
        if let Some(child) = self.child_for(&area) {
            child.insert(area, item, max_depth, max_items);
            return;
        }
        self.items.push((area, item));
        if self.children.is_none() && self.items.len() > max_items && self.depth < max_depth {
            self.split(max_depth, max_items);
        }
    }

    fn split(&mut self, max_depth: u32, max_items: usize) {
        let BoundingArea { min, max } = self.bounds;
        let mid = self.bounds.center();
        let depth = self.depth + 1;
        let quadrant = |lo: Vector2, hi: Vector2| QuadNode::new(BoundingArea::new(lo, hi), depth);
        self.children = Some(Box::new([
            quadrant(min, mid),
            quadrant(Vector2::new(mid.x, min.y), Vector2::new(max.x, mid.y)),
            quadrant(Vector2::new(min.x, mid.y), Vector2::new(mid.x, max.y)),
            quadrant(mid, max),
        ]));
        for (area, item) in std::mem::take(&mut self.items) {
            match self.child_for(&area) {
                Some(child) => child.insert(area, item, max_depth, max_items),
                None => self.items.push((area, item)),
            }
        }
    }

    fn collect(&self, area: &BoundingArea, out: &mut Vec<T>)
    where
        T: Clone,
    {
        out.extend(
            self.items
                .iter()
                .filter(|(bounds, _)| bounds.overlaps(area))
                .map(|(_, item)| item.clone()),
        );
        if let Some(children) = &self.children {
            for child in children.iter().filter(|c| c.bounds.overlaps(area)) {
                child.collect(area, out);
            }
        }
    }

    fn node_count(&self) -> usize {
        1 + self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(|c| c.node_count()).sum())
    }
}

/// Region quad-tree keyed by bounding areas.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    root: QuadNode<T>,
    max_depth: u32,
    max_items: usize,
    len: usize,
}

impl<T> QuadTree<T> {
    pub fn new(bounds: BoundingArea, max_depth: u32, max_items: usize) -> Self {
        Self {
            root: QuadNode::new(bounds, 0),
            max_depth,
            max_items: max_items.max(1),
            len: 0,
        }
    }

    /// Single-node tree covering every coordinate. Never splits.
    pub fn unbounded() -> Self {
        Self::new(BoundingArea::UNBOUNDED, 0, DEFAULT_MAX_ITEMS)
    }

    pub fn bounds(&self) -> BoundingArea {
        self.root.bounds
    }

    pub fn clear(&mut self) {
        self.root = QuadNode::new(self.root.bounds, 0);
        self.len = 0;
    }

    /// Empty areas are ignored since they can never be found.
    pub fn insert(&mut self, area: BoundingArea, item: T) {
        if area.is_empty() {
            return;
        }
        self.root
            .insert(area, item, self.max_depth, self.max_items);
        self.len += 1;
    }

    /// Items whose area overlaps `area`.
    pub fn retrieve_potential_collisions(&self, area: &BoundingArea) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::new();
        self.root.collect(area, &mut out);
        out
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

/// Per-frame index of renderable entities.
#[derive(Resource, Debug, Clone)]
pub struct SpatialIndex {
    tree: QuadTree<Entity>,
    scene_bounds: Option<BoundingArea>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SpatialIndex {
    /// Bounded index for a finite scene, unbounded otherwise.
    pub fn new(scene_bounds: Option<BoundingArea>) -> Self {
        let scene_bounds = scene_bounds.filter(|a| !a.is_empty());
        let tree = match scene_bounds {
            Some(area) => QuadTree::new(area, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ITEMS),
            None => QuadTree::unbounded(),
        };
        Self { tree, scene_bounds }
    }

    pub fn scene_bounds(&self) -> Option<BoundingArea> {
        self.scene_bounds
    }

    pub fn is_bounded(&self) -> bool {
        self.scene_bounds.is_some()
    }

    /// Whether an entity with `area` belongs in the index.
    pub fn accepts(&self, area: &BoundingArea, render_out_of_bounds: bool) -> bool {
        if area.is_empty() {
            return false;
        }
        match &self.scene_bounds {
            Some(scene) => render_out_of_bounds || scene.overlaps(area),
            None => true,
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn insert(&mut self, area: BoundingArea, entity: Entity) {
        self.tree.insert(area, entity);
    }

    pub fn query(&self, area: &BoundingArea) -> Vec<Entity> {
        self.tree.retrieve_potential_collisions(area)
    }

    pub fn tree(&self) -> &QuadTree<Entity> {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: f32, y: f32) -> BoundingArea {
        BoundingArea::from_xywh(x, y, 1.0, 1.0)
    }

    #[test]
    fn test_splits_past_max_items() {
        let mut tree = QuadTree::new(BoundingArea::from_xywh(0.0, 0.0, 100.0, 100.0), 4, 2);
        tree.insert(cell(1.0, 1.0), 1);
        tree.insert(cell(80.0, 1.0), 2);
        assert_eq!(tree.node_count(), 1);
        tree.insert(cell(1.0, 80.0), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_respects_max_depth() {
        let mut tree = QuadTree::new(BoundingArea::from_xywh(0.0, 0.0, 100.0, 100.0), 0, 1);
        for i in 0..10 {
            tree.insert(cell(i as f32, i as f32), i);
        }
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.len(), 10);
    }

    #[test]
    fn test_straddling_item_is_found() {
        let mut tree = QuadTree::new(BoundingArea::from_xywh(0.0, 0.0, 100.0, 100.0), 4, 1);
        tree.insert(cell(10.0, 10.0), 1);
        tree.insert(BoundingArea::from_xywh(45.0, 45.0, 10.0, 10.0), 2);
        tree.insert(cell(90.0, 90.0), 3);
        let found =
            tree.retrieve_potential_collisions(&BoundingArea::from_xywh(52.0, 52.0, 1.0, 1.0));
        assert_eq!(found, vec![2]);
    }

    #[test]
    fn test_outside_root_is_kept_at_root() {
        let mut tree = QuadTree::new(BoundingArea::from_xywh(0.0, 0.0, 10.0, 10.0), 4, 1);
        tree.insert(cell(500.0, 500.0), 7);
        tree.insert(cell(1.0, 1.0), 8);
        let query = BoundingArea::from_xywh(499.0, 499.0, 5.0, 5.0);
        let found = tree.retrieve_potential_collisions(&query);
        assert_eq!(found, vec![7]);
    }

    #[test]
    fn test_query_filters_by_overlap() {
        let mut tree = QuadTree::new(BoundingArea::from_xywh(0.0, 0.0, 64.0, 64.0), 6, 8);
        for x in 0..8 {
            for y in 0..8 {
                tree.insert(cell(x as f32 * 8.0, y as f32 * 8.0), (x, y));
            }
        }
        let query = BoundingArea::from_xywh(0.0, 0.0, 10.0, 4.0);
        let mut found = tree.retrieve_potential_collisions(&query);
        found.sort();
        assert_eq!(found, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_clear_resets() {
        let mut tree = QuadTree::new(BoundingArea::from_xywh(0.0, 0.0, 100.0, 100.0), 4, 1);
        for i in 0..6 {
            tree.insert(cell(i as f32 * 15.0, 3.0), i);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert!(tree
            .retrieve_potential_collisions(&BoundingArea::from_xywh(0.0, 0.0, 100.0, 100.0))
            .is_empty());
    }

    #[test]
    fn test_empty_area_is_ignored() {
        let mut tree: QuadTree<u32> = QuadTree::unbounded();
        tree.insert(BoundingArea::EMPTY, 1);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_unbounded_never_splits() {
        let mut tree = QuadTree::unbounded();
        for i in 0..100 {
            tree.insert(cell(i as f32 * 1000.0, -(i as f32) * 1000.0), i);
        }
        assert_eq!(tree.node_count(), 1);
        let all = tree.retrieve_potential_collisions(&BoundingArea::UNBOUNDED);
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn test_index_accepts() {
        let bounded = SpatialIndex::new(Some(BoundingArea::from_xywh(0.0, 0.0, 10.0, 10.0)));
        assert!(bounded.accepts(&cell(5.0, 5.0), false));
        assert!(!bounded.accepts(&cell(50.0, 5.0), false));
        assert!(bounded.accepts(&cell(50.0, 5.0), true));
        assert!(!bounded.accepts(&BoundingArea::EMPTY, true));

        let unbounded = SpatialIndex::new(Some(BoundingArea::EMPTY));
        assert!(!unbounded.is_bounded());
        assert!(unbounded.accepts(&cell(1.0e5, -1.0e5), false));
    }
}
