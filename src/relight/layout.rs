//! Positioned node tree for the demo surface.
//!
//! Every node stores an offset relative to its parent. Moving a parent moves
//! its whole subtree; absolute positions are derived on demand by walking up
//! the parent chain. Drawing is left to whatever owns the canvas.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub offset: Point,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    /// Text content for label nodes.
    pub text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "root".to_string(),
                offset: Point::default(),
                width: 0,
                height: 0,
                visible: true,
                text: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        offset: Point,
        width: u32,
        height: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            offset,
            width,
            height,
            visible: true,
            text: None,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Text node; its size is left to the renderer.
    pub fn add_text(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        offset: Point,
        text: impl Into<String>,
    ) -> NodeId {
        let id = self.add(parent, name, offset, 0, 0);
        self.nodes[id.0].text = Some(text.into());
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    pub fn set_offset(&mut self, id: NodeId, offset: Point) {
        self.nodes[id.0].offset = offset;
    }

    pub fn set_size(&mut self, id: NodeId, width: u32, height: u32) {
        let node = &mut self.nodes[id.0];
        node.width = width;
        node.height = height;
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.nodes[id.0].text = Some(text.into());
    }

    /// Position in window coordinates.
    pub fn absolute(&self, id: NodeId) -> Point {
        let mut pos = Point::default();
        let mut cur = Some(id);
        while let Some(node) = cur.map(|c| &self.nodes[c.0]) {
            pos.x += node.offset.x;
            pos.y += node.offset.y;
            cur = node.parent;
        }
        pos
    }

    /// A node is shown only if it and all of its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(node) = cur.map(|c| &self.nodes[c.0]) {
            if !node.visible {
                return false;
            }
            cur = node.parent;
        }
        true
    }

    /// Bounding-box hit test in window coordinates.
    pub fn contains(&self, id: NodeId, x: i32, y: i32) -> bool {
        let node = &self.nodes[id.0];
        let origin = self.absolute(id);
        let (dx, dy) = (x - origin.x, y - origin.y);
        dx >= 0 && dy >= 0 && (dx as u32) < node.width && (dy as u32) < node.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_parent_moves_children() {
        let mut tree = NodeTree::new();
        let container = tree.add(tree.root(), "container", Point::new(0, 0), 0, 0);
        let sprite = tree.add(container, "sprite", Point::new(306, 0), 256, 256);
        let marker = tree.add(sprite, "marker", Point::new(10, 20), 12, 12);

        tree.set_offset(container, Point::new(115, 115));

        assert_eq!(tree.absolute(sprite), Point::new(421, 115));
        assert_eq!(tree.absolute(marker), Point::new(431, 135));
        assert_eq!(tree.parent(marker), Some(sprite));
        assert_eq!(tree.children(container), &[sprite]);
    }

    #[test]
    fn test_contains_is_half_open() {
        let mut tree = NodeTree::new();
        let node = tree.add(tree.root(), "picker", Point::new(10, 10), 4, 4);

        assert!(tree.contains(node, 10, 10));
        assert!(tree.contains(node, 13, 13));
        assert!(!tree.contains(node, 14, 10));
        assert!(!tree.contains(node, 9, 12));
    }

    #[test]
    fn test_visibility_inherits_from_ancestors() {
        let mut tree = NodeTree::new();
        let group = tree.add(tree.root(), "group", Point::default(), 0, 0);
        let label = tree.add_text(group, "label", Point::new(5, 5), "Illum. 2");

        assert!(tree.is_visible(label));
        tree.set_visible(group, false);
        assert!(!tree.is_visible(label));
        assert!(tree.node(label).visible);
        assert_eq!(tree.node(label).text.as_deref(), Some("Illum. 2"));
        assert_eq!(tree.find("label"), Some(label));
    }
}
