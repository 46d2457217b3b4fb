use image::{RgbImage, RgbaImage};

use super::gradient::{chromaticity_gradient, marker_ring};
use crate::relight::layout::{NodeId, NodeTree, Point};
use crate::relight::scene::Chromaticity;

/// Upper bound of both picker axes unless configured otherwise.
pub const DEFAULT_RATIO: f32 = 3.0;

pub struct ColorPicker {
    node: NodeId,
    marker: NodeId,
    size: u32,
    ratio: f32,
    chromaticity: Chromaticity,
    gradient: RgbImage,
    marker_image: RgbaImage,
}

impl ColorPicker {
    /// Create the widget node and its marker under `parent`.
    pub fn new(
        tree: &mut NodeTree,
        parent: NodeId,
        name: &str,
        offset: Point,
        size: u32,
        ratio: f32,
    ) -> Self {
        let node = tree.add(parent, name, offset, size, size);
        let radius = (size / 20).max(1);
        let marker = tree.add(node, format!("{name} marker"), Point::default(), radius * 2, radius * 2);

        let mut picker = Self {
            node,
            marker,
            size,
            ratio,
            chromaticity: Chromaticity::NEUTRAL,
            gradient: chromaticity_gradient(size, ratio),
            marker_image: marker_ring(radius),
        };
        picker.set_chromaticity(tree, Chromaticity::NEUTRAL);
        picker
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn marker(&self) -> NodeId {
        self.marker
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn chromaticity(&self) -> Chromaticity {
        self.chromaticity
    }

    pub fn gradient(&self) -> &RgbImage {
        &self.gradient
    }

    pub fn marker_image(&self) -> &RgbaImage {
        &self.marker_image
    }

    /// Widget-local position to chromaticity.
    pub fn position_to_chromaticity(&self, x: f32, y: f32) -> Chromaticity {
        let scale = self.ratio / self.size as f32;
        Chromaticity::new(x * scale, y * scale)
    }

    /// Chromaticity to the nearest widget-local pixel.
    pub fn chromaticity_to_position(&self, chromaticity: Chromaticity) -> Point {
        let scale = self.size as f32 / self.ratio;
        Point::new(
            (chromaticity.red * scale).round() as i32,
            (chromaticity.blue * scale).round() as i32,
        )
    }

    /// Hit test in window coordinates; hidden pickers never match.
    pub fn contains(&self, tree: &NodeTree, x: i32, y: i32) -> bool {
        tree.is_visible(self.node) && tree.contains(self.node, x, y)
    }

    /// Pick the chromaticity under a window-space pointer position.
    pub fn set_by_position(&mut self, tree: &mut NodeTree, x: i32, y: i32) -> Chromaticity {
        let origin = tree.absolute(self.node);
        let local = Point::new(x - origin.x, y - origin.y);
        self.chromaticity = self.position_to_chromaticity(local.x as f32, local.y as f32);
        self.place_marker(tree, local);
        self.chromaticity
    }

    /// Move the marker to a chromaticity set from outside the widget.
    pub fn set_chromaticity(&mut self, tree: &mut NodeTree, chromaticity: Chromaticity) {
        self.chromaticity = chromaticity;
        let local = self.chromaticity_to_position(chromaticity);
        self.place_marker(tree, local);
    }

    fn place_marker(&self, tree: &mut NodeTree, center: Point) {
        let marker = tree.node(self.marker);
        let offset = Point::new(
            center.x - (marker.width / 2) as i32,
            center.y - (marker.height / 2) as i32,
        );
        tree.set_offset(self.marker, offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker_at(offset: Point, size: u32) -> (NodeTree, ColorPicker) {
        let mut tree = NodeTree::new();
        let root = tree.root();
        let picker = ColorPicker::new(&mut tree, root, "Illum. 1", offset, size, DEFAULT_RATIO);
        (tree, picker)
    }

    #[test]
    fn test_position_chromaticity_round_trip() {
        let (_, picker) = picker_at(Point::default(), 128);
        for x in 0..128 {
            for y in 0..128 {
                let chroma = picker.position_to_chromaticity(x as f32, y as f32);
                assert_eq!(picker.chromaticity_to_position(chroma), Point::new(x, y));
            }
        }
    }

    #[test]
    fn test_linear_mapping() {
        let (_, picker) = picker_at(Point::default(), 128);
        assert_eq!(picker.position_to_chromaticity(0.0, 0.0), Chromaticity::new(0.0, 0.0));
        assert_eq!(picker.position_to_chromaticity(64.0, 32.0), Chromaticity::new(1.5, 0.75));
        assert_eq!(picker.chromaticity_to_position(Chromaticity::NEUTRAL), Point::new(43, 43));
    }

    #[test]
    fn test_contains_follows_widget_bounds() {
        let (mut tree, picker) = picker_at(Point::new(612, 341), 128);

        assert!(picker.contains(&tree, 612, 341));
        assert!(picker.contains(&tree, 739, 468));
        assert!(!picker.contains(&tree, 740, 400));
        assert!(!picker.contains(&tree, 611, 400));

        tree.set_visible(picker.node(), false);
        assert!(!picker.contains(&tree, 650, 400));
    }

    #[test]
    fn test_set_by_position_moves_marker() {
        let (mut tree, mut picker) = picker_at(Point::new(100, 200), 128);

        let chroma = picker.set_by_position(&mut tree, 164, 232);

        assert_eq!(chroma, Chromaticity::new(1.5, 0.75));
        assert_eq!(picker.chromaticity(), chroma);
        // Marker is 12px wide (radius 6) and centred on the pointer.
        assert_eq!(tree.absolute(picker.marker()), Point::new(158, 226));
    }

    #[test]
    fn test_programmatic_set_places_marker() {
        let (mut tree, mut picker) = picker_at(Point::new(0, 0), 120);

        picker.set_chromaticity(&mut tree, Chromaticity::new(3.0, 0.0));

        assert_eq!(tree.absolute(picker.marker()), Point::new(114, -6));
        assert_eq!(picker.gradient().dimensions(), (120, 120));
        assert_eq!(picker.marker_image().dimensions(), (12, 12));
    }
}
