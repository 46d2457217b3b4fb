//! Demo surface: four image panels and one colour picker per illuminant.

use tracing::{debug, info};

use super::events::{Command, InputEvent, Key};
use crate::relight::common::error::Result;
use crate::relight::layout::{NodeId, NodeTree, Point};
use crate::relight::picker::ColorPicker;
use crate::relight::scene::SceneReader;
use crate::relight::session::{Direction, Session};

/// Side of one image tile.
pub const UNIT: u32 = 256;
pub const GAP: u32 = 50;
pub const FONT_SIZE: u32 = 35;
pub const PAD: u32 = 100;
/// Pitch of the panel grid.
pub const GRID: u32 = UNIT + GAP;

const PICKER_SLOTS: usize = 2;
const PANEL_NAMES: [&str; 4] = ["Ref. JPG", "Output", "RAW", "sRGB"];

/// What the frame loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Save,
    Quit,
}

pub struct DemoApp<R: SceneReader> {
    session: Session<R>,
    tree: NodeTree,
    /// Input preview, output preview, corrected raw, corrected sRGB.
    panels: [NodeId; 4],
    panel_labels: [NodeId; 4],
    pickers: Vec<ColorPicker>,
    readouts: Vec<NodeId>,
    dragging: Vec<bool>,
    frames_seen: u64,
}

impl<R: SceneReader> DemoApp<R> {
    pub fn new(session: Session<R>, picker_size: u32) -> Self {
        let mut tree = NodeTree::new();
        let root = tree.root();
        let container = tree.add(root, "container", Point::default(), 0, 0);

        let grid = GRID as i32;
        let offsets = [
            Point::new(0, 0),
            Point::new(grid, 0),
            Point::new(0, grid),
            Point::new(grid, grid),
        ];
        let panels: [NodeId; 4] =
            std::array::from_fn(|i| tree.add(container, PANEL_NAMES[i], offsets[i], UNIT, UNIT));
        let panel_labels: [NodeId; 4] = std::array::from_fn(|i| {
            let name = PANEL_NAMES[i];
            tree.add_text(panels[i], format!("{name} label"), Point::default(), name)
        });

        let ratio = session.chroma_limit();
        let mut pickers = Vec::with_capacity(PICKER_SLOTS);
        let mut readouts = Vec::with_capacity(PICKER_SLOTS);
        for slot in 0..PICKER_SLOTS {
            let offset = Point::new(
                grid * 2 + slot as i32 * grid / 2,
                grid + FONT_SIZE as i32,
            );
            let name = format!("Illum. {}", slot + 1);
            let picker = ColorPicker::new(&mut tree, container, &name, offset, picker_size, ratio);

            let size = picker_size as i32;
            tree.add_text(
                picker.node(),
                format!("{name} label"),
                Point::new(size / 2, size + GAP as i32 / 2 + 4),
                name.as_str(),
            );
            readouts.push(tree.add_text(
                picker.node(),
                format!("Tint {}", slot + 1),
                Point::new(size / 2, -10),
                format!("Tint {}", slot + 1),
            ));
            pickers.push(picker);
        }

        let inset = (PAD + 15) as i32;
        tree.set_offset(container, Point::new(inset, inset));

        let mut app = Self {
            session,
            tree,
            panels,
            panel_labels,
            pickers,
            readouts,
            dragging: vec![false; PICKER_SLOTS],
            frames_seen: 0,
        };
        app.sync_scene();
        app
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn pickers(&self) -> &[ColorPicker] {
        &self.pickers
    }

    pub fn panel(&self, index: usize) -> NodeId {
        self.panels[index]
    }

    pub fn readout(&self, slot: usize) -> Option<&str> {
        let id = *self.readouts.get(slot)?;
        self.tree.node(id).text.as_deref()
    }

    pub fn is_dragging(&self, slot: usize) -> bool {
        self.dragging.get(slot).copied().unwrap_or(false)
    }

    /// True once per new render, so each frame is written at most once.
    pub fn take_dirty(&mut self) -> bool {
        let count = self.session.render_count();
        let dirty = count != self.frames_seen;
        self.frames_seen = count;
        dirty
    }

    pub fn apply(&mut self, command: Command) -> Result<Control> {
        match command {
            Command::Input(event) => self.handle(event),
            Command::SetChromaticity { illuminant, value } => {
                self.session.set_chromaticity(illuminant, value)?;
                if let Some(picker) = self.pickers.get_mut(illuminant) {
                    picker.set_chromaticity(&mut self.tree, value.clamped(self.session.chroma_limit()));
                }
                self.sync_readouts();
                Ok(Control::Continue)
            }
            Command::Save => Ok(Control::Save),
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<Control> {
        match event {
            InputEvent::Key(Key::Quit) => return Ok(Control::Quit),
            InputEvent::Key(Key::Next) => {
                info!("Next");
                self.session.advance(Direction::Next)?;
                self.sync_scene();
            }
            InputEvent::Key(Key::Previous) => {
                info!("Previous");
                self.session.advance(Direction::Previous)?;
                self.sync_scene();
            }
            InputEvent::Key(Key::Reset) => {
                self.session.reset_chromaticities()?;
                self.sync_scene();
            }
            InputEvent::PointerDown { x, y } => {
                for slot in 0..self.pickers.len() {
                    if self.pickers[slot].contains(&self.tree, x, y) {
                        self.dragging[slot] = true;
                        self.pick(slot, x, y)?;
                    }
                }
            }
            InputEvent::PointerMove { x, y } => {
                for slot in 0..self.pickers.len() {
                    if self.dragging[slot] && self.pickers[slot].contains(&self.tree, x, y) {
                        self.pick(slot, x, y)?;
                    }
                }
            }
            InputEvent::PointerUp { .. } => self.dragging.fill(false),
        }
        Ok(Control::Continue)
    }

    fn pick(&mut self, slot: usize, x: i32, y: i32) -> Result<()> {
        let chroma = self.pickers[slot].set_by_position(&mut self.tree, x, y);
        self.session.set_chromaticity(slot, chroma)?;
        self.sync_readouts();
        Ok(())
    }

    /// Bring widgets and panels in line with the session after a scene
    /// change or reset.
    fn sync_scene(&mut self) {
        let count = self.session.illuminant_count();
        for (slot, picker) in self.pickers.iter_mut().enumerate() {
            let active = self.session.is_illuminant_active(slot);
            self.tree.set_visible(picker.node(), active);
            if let Some(chroma) = self.session.chromaticity(slot) {
                picker.set_chromaticity(&mut self.tree, chroma);
            }
        }
        self.dragging.fill(false);

        let grid = GRID as i32;
        let output_x = if count > 1 { grid } else { grid + UNIT as i32 / 4 };
        self.tree.set_offset(self.panels[1], Point::new(output_x, 0));

        let scene = self.session.scene();
        let rendered = self.session.rendered();
        let sizes = [
            scene.references.input.dimensions(),
            scene.references.result.dimensions(),
            rendered.corrected.dimensions(),
            rendered.display.dimensions(),
        ];
        for ((&panel, &label), (w, h)) in self.panels.iter().zip(&self.panel_labels).zip(sizes) {
            self.tree.set_size(panel, w, h);
            self.tree
                .set_offset(label, Point::new(w as i32 / 2, h as i32 + GAP as i32 / 2 + 4));
        }

        debug!(scene = self.session.scene_name(), illuminants = count, "Synced widgets");
        self.sync_readouts();
    }

    fn sync_readouts(&mut self) {
        for (slot, &id) in self.readouts.iter().enumerate() {
            if let Some(text) = self.session.readout(slot) {
                self.tree.set_text(id, text);
            }
        }
    }
}
