use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use kn5export::scene_graph::gltf_import::import_gltf;
use kn5export::{NodeWriter, Settings};

const USAGE: &str = "Usage: kn5export <input.gltf|input.glb> <output> [--root-name NAME]";

struct Args {
    input: PathBuf,
    output: PathBuf,
    root_name: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut root_name = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root-name" => root_name = Some(args.next().context(USAGE)?),
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [input, output]: [PathBuf; 2] = positional.try_into().ok().context(USAGE)?;

    Ok(Args {
        input,
        output,
        root_name,
    })
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    let (scene, materials) = import_gltf(&args.input)?;

    let settings_dir = args
        .output
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let settings = Settings::load_from_dir(settings_dir).context("Failed to load settings")?;

    let mut writer = NodeWriter::new(&scene, &settings, &materials);
    if let Some(root_name) = args.root_name {
        writer = writer.with_root_name(root_name);
    }

    let mut out = Vec::new();
    let mut warnings = Vec::new();
    writer.write(&mut out, &mut warnings).context("Export failed")?;

    fs::write(&args.output, &out)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(())
}
