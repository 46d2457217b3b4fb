use std::fs::File;

use tempfile::TempDir;
use tiff::decoder::{Decoder, DecodingResult};

use super::*;
use crate::relight::common::error::RelightError;
use crate::relight::compositor::{composite, ColorMatrix};
use crate::relight::config::TiffCompression;
use crate::relight::layout::Point;
use crate::relight::scene::{Chromaticity, LinearImage, MixMap};
use crate::relight::session::Session;
use crate::relight::test_support::{three_scenes, MockReader};

/// Window position of picker 1's top-left corner: container inset + grid slot.
const PICKER1: (i32, i32) = (115 + 612, 115 + 341);
const PICKER2: (i32, i32) = (115 + 765, 115 + 341);

fn app_with(failing: &[&str]) -> DemoApp<MockReader> {
    let (reader, list) = three_scenes(failing);
    DemoApp::new(Session::open(reader, list, 3.0).unwrap(), 128)
}

fn key(app: &mut DemoApp<MockReader>, key: Key) -> Control {
    app.handle(InputEvent::Key(key)).unwrap()
}

#[test]
fn test_pickers_are_laid_out_in_the_grid() {
    let app = app_with(&[]);
    let tree = app.tree();

    assert_eq!(tree.absolute(app.pickers()[0].node()), Point::new(PICKER1.0, PICKER1.1));
    assert_eq!(tree.absolute(app.pickers()[1].node()), Point::new(PICKER2.0, PICKER2.1));
    assert_eq!(tree.absolute(app.panel(2)), Point::new(115, 115 + GRID as i32));
    assert_eq!(app.readout(0), Some("R: 1.20, G: 1.0, B: 0.80"));
    assert_eq!(app.readout(1), Some("R: 0.70, G: 1.0, B: 1.60"));
}

#[test]
fn test_drag_updates_chromaticity_live() {
    let mut app = app_with(&[]);

    app.handle(InputEvent::PointerDown { x: PICKER1.0 + 64, y: PICKER1.1 + 32 }).unwrap();
    assert!(app.is_dragging(0));
    assert_eq!(app.session().chromaticity(0), Some(Chromaticity::new(1.5, 0.75)));
    assert_eq!(app.readout(0), Some("R: 1.50, G: 1.0, B: 0.75"));

    app.handle(InputEvent::PointerMove { x: PICKER1.0 + 32, y: PICKER1.1 + 64 }).unwrap();
    assert_eq!(app.session().chromaticity(0), Some(Chromaticity::new(0.75, 1.5)));
    // Second illuminant untouched.
    assert_eq!(app.session().chromaticity(1), Some(Chromaticity::new(0.7, 1.6)));

    // Outside the widget the drag is ignored.
    app.handle(InputEvent::PointerMove { x: PICKER1.0 + 200, y: PICKER1.1 }).unwrap();
    assert_eq!(app.session().chromaticity(0), Some(Chromaticity::new(0.75, 1.5)));

    app.handle(InputEvent::PointerUp { x: 0, y: 0 }).unwrap();
    assert!(!app.is_dragging(0));
    app.handle(InputEvent::PointerMove { x: PICKER1.0, y: PICKER1.1 }).unwrap();
    assert_eq!(app.session().chromaticity(0), Some(Chromaticity::new(0.75, 1.5)));
}

#[test]
fn test_press_outside_pickers_does_nothing() {
    let mut app = app_with(&[]);
    let renders = app.session().render_count();

    app.handle(InputEvent::PointerDown { x: 10, y: 10 }).unwrap();

    assert!(!app.is_dragging(0) && !app.is_dragging(1));
    assert_eq!(app.session().render_count(), renders);
}

#[test]
fn test_single_illuminant_scene_hides_second_picker() {
    let mut app = app_with(&[]);
    key(&mut app, Key::Next);

    assert_eq!(app.session().scene_name(), "hall");
    let picker2 = app.pickers()[1].node();
    assert!(!app.tree().is_visible(picker2));
    assert!(!app.pickers()[1].contains(app.tree(), PICKER2.0 + 5, PICKER2.1 + 5));
    // Output preview slides right by a quarter tile.
    assert_eq!(app.tree().absolute(app.panel(1)).x, 115 + GRID as i32 + UNIT as i32 / 4);

    app.handle(InputEvent::PointerDown { x: PICKER2.0 + 5, y: PICKER2.1 + 5 }).unwrap();
    assert!(!app.is_dragging(1));

    key(&mut app, Key::Next);
    assert!(app.tree().is_visible(picker2));
    assert_eq!(app.tree().absolute(app.panel(1)).x, 115 + GRID as i32);
}

#[test]
fn test_reset_moves_markers_back() {
    let mut app = app_with(&[]);
    let loaded = app.pickers()[0].chromaticity();
    let marker = app.tree().absolute(app.pickers()[0].marker());

    app.handle(InputEvent::PointerDown { x: PICKER1.0 + 100, y: PICKER1.1 + 3 }).unwrap();
    app.handle(InputEvent::PointerUp { x: 0, y: 0 }).unwrap();
    assert_ne!(app.pickers()[0].chromaticity(), loaded);

    key(&mut app, Key::Reset);
    assert_eq!(app.pickers()[0].chromaticity(), loaded);
    assert_eq!(app.tree().absolute(app.pickers()[0].marker()), marker);
    assert_eq!(app.session().chromaticity(0), Some(loaded));
}

#[test]
fn test_failed_navigation_keeps_scene() {
    let mut app = app_with(&["hall"]);

    let err = app.handle(InputEvent::Key(Key::Next)).unwrap_err();

    assert!(matches!(err, RelightError::MissingArtifact { .. }));
    assert_eq!(app.session().scene_name(), "kitchen");
    assert!(app.tree().is_visible(app.pickers()[1].node()));
}

#[test]
fn test_quit_and_save_controls() {
    let mut app = app_with(&[]);
    assert_eq!(key(&mut app, Key::Quit), Control::Quit);
    assert_eq!(app.apply(Command::Save).unwrap(), Control::Save);
}

#[test]
fn test_set_command_moves_marker() {
    let mut app = app_with(&[]);

    app.apply(Command::SetChromaticity {
        illuminant: 1,
        value: Chromaticity::new(3.0, 3.0),
    })
    .unwrap();

    assert_eq!(app.session().chromaticity(1), Some(Chromaticity::new(3.0, 3.0)));
    assert_eq!(
        app.tree().absolute(app.pickers()[1].marker()),
        Point::new(PICKER2.0 + 128 - 6, PICKER2.1 + 128 - 6)
    );
    assert_eq!(app.readout(1), Some("R: 3.00, G: 1.0, B: 3.00"));
}

#[test]
fn test_take_dirty_once_per_render() {
    let mut app = app_with(&[]);
    assert!(app.take_dirty());
    assert!(!app.take_dirty());

    app.handle(InputEvent::PointerDown { x: PICKER1.0 + 1, y: PICKER1.1 + 1 }).unwrap();
    assert!(app.take_dirty());
    assert!(!app.take_dirty());
}

#[test]
fn test_parse_commands() {
    assert_eq!(parse_command("n").unwrap(), Some(Command::Input(InputEvent::Key(Key::Next))));
    assert_eq!(parse_command(" p ").unwrap(), Some(Command::Input(InputEvent::Key(Key::Previous))));
    assert_eq!(parse_command("esc").unwrap(), Some(Command::Input(InputEvent::Key(Key::Quit))));
    assert_eq!(
        parse_command("down 12 -4").unwrap(),
        Some(Command::Input(InputEvent::PointerDown { x: 12, y: -4 }))
    );
    assert_eq!(
        parse_command("set 1 0.5 2.25").unwrap(),
        Some(Command::SetChromaticity {
            illuminant: 1,
            value: Chromaticity::new(0.5, 2.25)
        })
    );
    assert_eq!(parse_command("save").unwrap(), Some(Command::Save));
    assert_eq!(parse_command("").unwrap(), None);
    assert_eq!(parse_command("# comment").unwrap(), None);

    for bad in ["x", "down 1", "move a b", "set 0 1", "jump"] {
        assert!(matches!(parse_command(bad), Err(RelightError::InvalidCommand(_))), "{bad}");
    }
}

#[test]
fn test_frame_writer_outputs() {
    let dir = TempDir::new().unwrap();
    let raw = LinearImage::filled(5, 4, [0.5, 1.0, 0.0]);
    let rendered = composite(
        &[MixMap::filled(5, 4, 1.0)],
        &[Chromaticity::NEUTRAL],
        &raw,
        &ColorMatrix::CAM_TO_SRGB,
    )
    .unwrap();

    let writer = PngFrameWriter::new(dir.path().join("frames"), true, TiffCompression::Lzw).unwrap();
    writer.write_frame("Place684_12", &rendered).unwrap();

    let raw_png = image::open(writer.dir().join("Place684_12_raw.png")).unwrap().to_rgb8();
    assert_eq!(raw_png.as_raw(), rendered.corrected.as_raw());
    assert!(writer.dir().join("Place684_12_srgb.png").is_file());

    let mut decoder = Decoder::new(File::open(writer.dir().join("Place684_12_linear.tiff")).unwrap()).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (5, 4));
    match decoder.read_image().unwrap() {
        DecodingResult::U16(data) => assert_eq!(&data[..3], &[32768, 65535, 0]),
        _ => panic!("expected 16-bit samples"),
    }
}
