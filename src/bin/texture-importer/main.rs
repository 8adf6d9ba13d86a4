//! Texture importer CLI - scan texture directories with channel configs.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use texture_importer::prelude::*;
use tracing_subscriber::EnvFilter;

/// Verbosity level
#[derive(Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Quiet,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

fn init_logging(verbosity: Verbosity) {
    // RUST_LOG wins over the command-line flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut verbosity = Verbosity::Info;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => verbosity = Verbosity::Debug,
            "-vv" | "--trace" => verbosity = Verbosity::Trace,
            "-q" | "--quiet" => verbosity = Verbosity::Quiet,
            _ => filtered_args.push(arg),
        }
    }
    init_logging(verbosity);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Scan command - resolve networks
        "scan" | "s" => cmd_scan(&filtered_args[1..]),

        // Expand command - show resolved patterns
        "expand" | "e" => cmd_expand(&filtered_args[1..]),

        // Configs command - list configs
        "configs" | "c" => cmd_configs(filtered_args.get(1).copied()),

        "version" | "-V" | "--version" => {
            print_version();
            Ok(())
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_help();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn print_version() {
    println!(
        "texture-importer {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("TEXTURE_IMPORTER_BUILD_DATE"),
        env!("TEXTURE_IMPORTER_BUILD_TIME"),
    );
}

fn print_help() {
    println!("texture-importer - Infer texture networks from filename patterns");
    println!();
    println!("USAGE:");
    println!("    texture-importer [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    s, scan <dir> <config.json>   Resolve texture networks in a directory");
    println!("        --subfolders              Search sub-directories too");
    println!("        --mesh <path>             Add a selected mesh (repeatable)");
    println!("        --existing <node>         Mark a node name as existing (repeatable)");
    println!("        --json                    Print networks as JSON");
    println!("    e, expand <pattern>           Show the glob patterns a channel pattern expands to");
    println!("        --regex                   Show regex patterns instead");
    println!("        --mesh <name>             Value for $mesh");
    println!("        --material <name>         Value for $material");
    println!("    c, configs [dir]              List configs (default: settings config directory)");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!("    -V, --version    Show version");
    println!();
    println!("EXAMPLES:");
    println!("    texture-importer scan sourceimages configs/arnold.json --mesh '|chair'");
    println!("    texture-importer expand '$mesh_$material_(BaseColor|Albedo).$udim.png'");
    println!("    texture-importer -v scan textures default.json --json");
}

/// Value following a flag, or an error naming the flag.
fn flag_value<'a>(args: &[&'a str], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value),
        None => bail!("missing value for {}", flag),
    }
}

fn cmd_scan(args: &[&str]) -> Result<()> {
    let mut positional: Vec<&str> = Vec::new();
    let mut include_subfolders = false;
    let mut json_mode = false;
    let mut host = OfflineHost::new();

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--subfolders" | "-s" => include_subfolders = true,
            "--json" | "-j" => json_mode = true,
            "--mesh" | "-m" => host = host.with_mesh(Mesh::from_path(flag_value(args, &mut i, "--mesh")?)),
            "--existing" | "-e" => host = host.with_node(flag_value(args, &mut i, "--existing")?),
            other => positional.push(other),
        }
        i += 1;
    }

    let [dir, config_path] = positional[..] else {
        bail!("usage: texture-importer scan <dir> <config.json> [--subfolders] [--mesh <path>]... [--json]");
    };

    let config = Config::load(config_path).with_context(|| format!("loading config {}", config_path))?;
    tracing::info!("Scanning {} with config '{}'", dir, config.name);

    let mut settings = Settings::load();
    let builder = NetworkBuilder::new(&host, &host, &settings);
    let networks = builder.get_networks(dir, &config, include_subfolders)?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&networks)?);
    } else {
        print_networks(&networks);
    }

    settings.add_recent(std::path::absolute(dir).unwrap_or_else(|_| PathBuf::from(dir)));
    settings.current_config = Some(config.name.clone());
    settings.include_subfolders = include_subfolders;
    settings.save();
    Ok(())
}

fn print_networks(networks: &[Network]) {
    for network in networks {
        let status = if network.exists { "exists" } else { "new" };
        match network.mesh_name() {
            Some(mesh) => println!("{} [{}] (mesh: {})", network.material_node_name, status, mesh),
            None => println!("{} [{}]", network.material_node_name, status),
        }
        for channel in &network.channels {
            match &channel.file_path {
                Some(path) => println!(
                    "  {:<20} {:<32} {} ({}{})",
                    channel.attribute_name,
                    channel.file_node_name,
                    file_name(path),
                    channel.colorspace,
                    if channel.exists { ", exists" } else { "" }
                ),
                None => println!("  {:<20} (no file)", channel.attribute_name),
            }
        }
    }
    println!();
    println!("Networks: {}", networks.len());
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_expand(args: &[&str]) -> Result<()> {
    let mut pattern: Option<&str> = None;
    let mut regex_mode = false;
    let mut mesh: Option<&str> = None;
    let mut material: Option<&str> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--regex" | "-r" => regex_mode = true,
            "--mesh" | "-m" => mesh = Some(flag_value(args, &mut i, "--mesh")?),
            "--material" => material = Some(flag_value(args, &mut i, "--material")?),
            other if pattern.is_none() => pattern = Some(other),
            other => bail!("unexpected argument: {}", other),
        }
        i += 1;
    }
    let Some(pattern) = pattern else {
        bail!("usage: texture-importer expand <pattern> [--regex] [--mesh <name>] [--material <name>]");
    };

    let patterns = if regex_mode {
        let mut tokens = Tokens::regex();
        if let Some(mesh) = mesh {
            tokens = tokens.mesh(mesh);
        }
        if let Some(material) = material {
            tokens = tokens.material(regex::escape(material));
        }
        regex_patterns(pattern, &tokens)
    } else {
        let mut tokens = Tokens::glob();
        if let Some(mesh) = mesh {
            tokens = tokens.mesh(mesh);
        }
        if let Some(material) = material {
            tokens = tokens.material(material);
        }
        glob_patterns(pattern, &tokens)
    };

    for p in &patterns {
        println!("{}", p);
    }
    tracing::debug!("{} patterns", patterns.len());
    Ok(())
}

fn cmd_configs(dir: Option<&str>) -> Result<()> {
    let dir = match dir {
        Some(dir) => PathBuf::from(dir),
        None => Settings::load().configs_dir(),
    };
    if !dir.is_dir() {
        bail!("config directory {} does not exist", dir.display());
    }

    let configs = Config::load_dir(&dir);
    println!("Configs in {}:", dir.display());
    for config in &configs {
        let flags = match (config.has_mesh(), config.has_material()) {
            (true, true) => "per mesh and material",
            (true, false) => "per mesh",
            (false, true) => "per material",
            (false, false) => "single network",
        };
        println!(
            "  {:<24} renderer: {:<10} channels: {:<3} {}",
            config.name,
            config.renderer.as_deref().unwrap_or("-"),
            config.channels.len(),
            flags
        );
    }
    println!();
    println!("Total configs: {}", configs.len());
    Ok(())
}
