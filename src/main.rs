use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use aid_relight::logger;
use aid_relight::relight::app::parse_command;
use aid_relight::relight::compositor::composite_timed;
use aid_relight::relight::timing::RenderTimings;
use aid_relight::relight::{
    Control, DemoApp, DirectorySceneReader, FrameWriter, PngFrameWriter, RelightConfig,
    SceneList, SceneReader, Session, TiffCompression,
};

use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "aid-relight")]
#[command(version, about = "Re-render multi-illuminant white balance with editable tints", long_about = None)]
struct Cli {
    /// Directory holding the scene artifacts (defaults to $AID_ROOT or ./result)
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Scene list, one name per line
    #[arg(short, long, value_name = "FILE", default_value = "list.txt")]
    list: PathBuf,

    /// Write rendered frames to this directory
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Read commands from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Upper bound of the chromaticity picker axes
    #[arg(long, value_name = "FLOAT", default_value = "3.0", value_parser = parse_ratio)]
    ratio: f32,

    /// Also write the corrected linear image as 16-bit TIFF
    #[arg(long)]
    export_linear: bool,

    /// Compression for the linear TIFF: none, lzw, deflate-fast, deflate, deflate-best
    #[arg(long, value_name = "METHOD", default_value = "none")]
    compression: TiffCompression,

    /// Render every scene once with its loaded tints and exit
    #[arg(long)]
    render_all: bool,

    /// Print per-step render timings at exit
    #[arg(long)]
    timings: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_ratio(s: &str) -> std::result::Result<f32, String> {
    let ratio: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(format!("ratio must be finite and positive, got {ratio}"))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let mut builder = RelightConfig::builder()
        .scene_list(&cli.list)
        .picker_ratio(cli.ratio)
        .output_dir(cli.out.clone())
        .export_linear(cli.export_linear)
        .compression(cli.compression);
    if let Some(root) = &cli.root {
        builder = builder.root(root);
    }
    let config = builder.build();

    info!("Starting aid-relight...");
    info!("Result directory: {}", config.root.display());

    let scenes = SceneList::read(&config.scene_list)?;
    info!("{} scenes in {}", scenes.len(), config.scene_list.display());

    let reader = DirectorySceneReader::new(&config.root);
    let writer = match &config.output_dir {
        Some(dir) => Some(PngFrameWriter::new(dir, config.export_linear, config.compression)?),
        None => None,
    };

    let timings = if cli.render_all {
        render_all(&reader, &scenes, writer.as_ref())
    } else {
        run_interactive(reader, scenes, &config, writer.as_ref(), cli.script.as_ref())?
    };

    if cli.timings {
        println!("{}", timings.summary());
    }
    Ok(())
}

/// Batch mode: failures are reported per scene and do not stop the run.
fn render_all(
    reader: &DirectorySceneReader,
    scenes: &SceneList,
    writer: Option<&PngFrameWriter>,
) -> RenderTimings {
    let mut timings = RenderTimings::new();
    let mut failed = 0usize;

    for name in scenes.names() {
        let result = reader.read_scene(name).and_then(|scene| {
            let rendered = composite_timed(
                scene.illuminants.mix_maps(),
                scene.illuminants.chromaticities(),
                &scene.raw,
                &scene.cam_to_display,
                &mut timings,
            )?;
            match writer {
                Some(writer) => writer.write_frame(name, &rendered),
                None => Ok(()),
            }
        });
        match result {
            Ok(()) => info!(scene = %name, "Rendered"),
            Err(e) => {
                failed += 1;
                error!(scene = %name, "Render failed: {}", e);
            }
        }
    }

    info!("Rendered {}/{} scenes", scenes.len() - failed, scenes.len());
    timings
}

fn run_interactive(
    reader: DirectorySceneReader,
    scenes: SceneList,
    config: &RelightConfig,
    writer: Option<&PngFrameWriter>,
    script: Option<&PathBuf>,
) -> Result<RenderTimings> {
    let session = Session::open(reader, scenes, config.picker_ratio)
        .context("failed to open the first scene")?;
    let mut app = DemoApp::new(session, config.picker_size);

    println!("Commands, one per line:");
    println!("  n / p          next / previous scene");
    println!("  r              reset tints to the loaded values");
    println!("  q or esc       quit");
    println!("  down X Y, move X Y, up X Y   pointer input in window pixels");
    println!("  set I R B      set illuminant I to red R, blue B");
    println!("  save           write the current frame");

    let input: Box<dyn BufRead> = match script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    write_if_dirty(&mut app, writer, false);
    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match app.apply(command) {
            Ok(Control::Quit) => break,
            Ok(Control::Save) => write_if_dirty(&mut app, writer, true),
            Ok(Control::Continue) => write_if_dirty(&mut app, writer, false),
            Err(e) => error!("{}", e),
        }
    }

    Ok(app.session().timings().clone())
}

fn write_if_dirty<R: SceneReader>(app: &mut DemoApp<R>, writer: Option<&PngFrameWriter>, force: bool) {
    let dirty = app.take_dirty();
    if !(dirty || force) {
        return;
    }
    let Some(writer) = writer else {
        if force {
            warn!("No output directory configured, nothing saved");
        }
        return;
    };
    let session = app.session();
    if let Err(e) = writer.write_frame(session.scene_name(), session.rendered()) {
        error!("{}", e);
    }
}
