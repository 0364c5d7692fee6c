//! `objinfo`: load a Wavefront OBJ file and report what the renderer would get.
//!
//! Usage: `objinfo <path> [--tangents[=on|off]] [--dump-layout]`

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use asset::{LoadOptions, MeshBuffer};
use renderer::{GpuVertexLayout, shader_location};

#[derive(Debug, Default)]
struct Args {
    path: Option<PathBuf>,
    tangents: bool,
    dump_layout: bool,
}

fn parse_switch(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    for arg in args {
        if arg == "--tangents" {
            parsed.tangents = true;
        } else if let Some(val) = arg.strip_prefix("--tangents=") {
            parsed.tangents = parse_switch(val);
        } else if arg == "--dump-layout" {
            parsed.dump_layout = true;
        } else if arg.starts_with("--") {
            log::warn!("Unknown flag '{}', ignoring.", arg);
        } else if parsed.path.is_none() {
            parsed.path = Some(PathBuf::from(arg));
        } else {
            bail!("unexpected extra argument '{}'", arg);
        }
    }
    Ok(parsed)
}

fn write_report(out: &mut impl Write, mesh: &MeshBuffer) -> io::Result<()> {
    let stats = mesh.stats();
    writeln!(out, "positions:   {}", stats.positions)?;
    writeln!(out, "normals:     {}", stats.normals)?;
    writeln!(out, "texcoords:   {}", stats.texcoords)?;
    writeln!(out, "faces:       {} ({} triangles)", stats.faces, stats.triangles)?;
    writeln!(out, "vertices:    {} unique", mesh.vertex_count())?;
    writeln!(out, "indices:     {}", mesh.index_count())?;
    writeln!(out, "vertex size: {} bytes", mesh.layout().stride)?;
    writeln!(out, "VBO size:    {} bytes", mesh.vertex_buffer_size())?;
    writeln!(out, "IBO size:    {} bytes", mesh.index_buffer_size())?;
    writeln!(
        out,
        "total size:  {} bytes",
        mesh.vertex_buffer_size() + mesh.index_buffer_size()
    )?;
    writeln!(out, "naive size:  {} bytes (without IBO)", mesh.naive_size())?;
    writeln!(out, "bounds:      {}", stats.bounds)?;
    if !stats.bounds.is_empty() {
        writeln!(out, "center:      {}", stats.bounds.center())?;
    }
    Ok(())
}

fn print_layout(mesh: &MeshBuffer) {
    let gpu = GpuVertexLayout::new(mesh.layout());
    println!("layout (stride {} bytes):", gpu.array_stride());
    for ((attribute, slot), gpu_attr) in mesh.layout().attributes().zip(gpu.attributes()) {
        debug_assert_eq!(gpu_attr.shader_location, shader_location(attribute));
        println!(
            "  @location({}) {:<9} {} x f32 at offset {:>2} -> {:?}",
            gpu_attr.shader_location, attribute, slot.components, slot.offset, gpu_attr.format
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let Some(path) = args.path else {
        bail!("usage: objinfo <path> [--tangents[=on|off]] [--dump-layout]");
    };

    let options = LoadOptions::default().with_tangents(args.tangents);
    let mesh = asset::load_obj_from_path(&path, &options)
        .with_context(|| format!("Failed to load mesh '{}'", path.display()))?;

    write_report(&mut io::stdout().lock(), &mesh).context("Failed to write report")?;
    if args.dump_layout {
        print_layout(&mesh);
    }
    Ok(())
}
