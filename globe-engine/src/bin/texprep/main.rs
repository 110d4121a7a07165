// texprep - Prepare the globe's texture assets
//
// Pipeline:
//   1. Resize each earth map found in <src-dir> to N x N/2 (equirectangular)
//   2. Write it to <out-dir> under the file name the globe loads
//   3. Render the radial star sprite to <out-dir>/stars/circle.png
//
// Usage: cargo run --bin texprep -- <src-dir> <out-dir> [--width N] [--star-size N]

mod maps;
mod sprite;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use globe_engine::scene::texture::{EARTH_TEXTURES, STAR_SPRITE_FILE};

#[derive(Parser, Debug)]
#[command(name = "texprep")]
#[command(about = "Resize earth maps and render the star sprite", long_about = None)]
struct Args {
    /// Directory holding the source earth maps
    src_dir: PathBuf,

    /// Directory the globe loads textures from
    out_dir: PathBuf,

    /// Output map width; height is half of it
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Star sprite edge length in pixels
    #[arg(long = "star-size", default_value_t = 32)]
    star_size: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (width, height) = maps::target_size(args.width)?;
    fs::create_dir_all(&args.out_dir).with_context(|| format!("creating {}", args.out_dir.display()))?;

    log::info!("Resizing earth maps to {width}x{height}...");
    let mut written = 0;
    for &(role, file, _) in EARTH_TEXTURES.iter() {
        let src = args.src_dir.join(file);
        if !src.exists() {
            log::warn!("  {file} ({role:?}) missing, skipped");
            continue;
        }
        maps::resize_map(&src, &args.out_dir.join(file), width, height)?;
        log::info!("  {file}");
        written += 1;
    }
    if written == 0 {
        bail!("no earth maps found in {}", args.src_dir.display());
    }

    if args.star_size < 2 {
        bail!("--star-size must be at least 2");
    }
    let sprite_path = args.out_dir.join(STAR_SPRITE_FILE);
    if let Some(dir) = sprite_path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    sprite::radial(args.star_size)
        .save(&sprite_path)
        .with_context(|| format!("writing {}", sprite_path.display()))?;
    log::info!("  {STAR_SPRITE_FILE} ({0}x{0})", args.star_size);

    log::info!("Done: {written} maps + sprite in {}", args.out_dir.display());
    Ok(())
}
