use anyhow::{Context, Result};
use log::info;
use lumen::color::{Color, OutputColor};
use lumen::renderer::Renderer;
use lumen::scene;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const HELP: &str = "\
lumen - stochastic path tracer for animated sphere scenes

USAGE:
  lumen [OPTIONS] <scene.json>

OPTIONS:
  --width N       Rendered image width (default 400)
  --height N      Rendered image height (default 200)
  --samples N     Samples per pixel (default 100)
  --startframe N  Animation start frame (default 1)
  --length N      Animation length in frames (default 1)
  --prefix S      Output file prefix
  -h, --help      Print this help
";

struct Args {
    width: usize,
    height: usize,
    samples: u32,
    startframe: i64,
    length: i64,
    prefix: String,
    scene: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }
    Ok(Args {
        width: args.opt_value_from_str("--width")?.unwrap_or(400),
        height: args.opt_value_from_str("--height")?.unwrap_or(200),
        samples: args.opt_value_from_str("--samples")?.unwrap_or(100),
        startframe: args.opt_value_from_str("--startframe")?.unwrap_or(1),
        length: args.opt_value_from_str("--length")?.unwrap_or(1),
        prefix: args
            .opt_value_from_str("--prefix")?
            .unwrap_or_else(String::new),
        scene: args.free_from_str().context("no scene file provided")?,
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = parse_args()?;
    let aspect_ratio = args.width as f32 / args.height as f32;
    let mut world = scene::load(&args.scene, aspect_ratio)?;
    let renderer = Renderer::new(args.width, args.height, args.samples);

    for frame in args.startframe..args.startframe + args.length {
        let start = Instant::now();
        let pixels = renderer.render(&mut world, frame as f32);
        let path = format!("{}{:03}.png", args.prefix, frame);
        write_png(&path, args.width, args.height, &pixels)?;
        let elapsed = Duration::from_millis(start.elapsed().as_millis() as u64);
        info!(
            "frame {} rendered to {} in {}",
            frame,
            path,
            humantime::format_duration(elapsed)
        );
    }

    Ok(())
}

/// Quantize to 16 bits per channel and encode as PNG.
fn write_png(path: impl AsRef<Path>, width: usize, height: usize, pixels: &[Color]) -> Result<()> {
    let path = path.as_ref();
    let mut data = Vec::with_capacity(pixels.len() * 6);
    for &pixel in pixels {
        for channel in OutputColor::from(pixel) {
            data.extend_from_slice(&channel.to_be_bytes());
        }
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create output file {}", path.display()))?;
    let w = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, u32::try_from(width)?, u32::try_from(height)?);
    encoder.set_color(png::ColorType::RGB);
    encoder.set_depth(png::BitDepth::Sixteen);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    Ok(())
}
