use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use personalspace_kernel::{DimensionConfig, ReplicatedState, ServerSettings};
use personalspace_preset::{AllowList, AnyMaterial, is_admissible, is_builtin, try_parse_layers};
use personalspace_protocol::{Packet, encode_world_list};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "personalspace-cli",
    about = "CLI tool for personal dimension presets"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a preset and check it against the allow-list
    Check {
        preset: String,
        /// Allowed material; overrides the settings list when given
        #[arg(short, long = "allow")]
        allow: Vec<String>,
        /// Server settings file (YAML)
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Infer settings for a legacy world folder name
    Legacy { folder: String },
    /// List the configured default presets
    Presets {
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Write a world-list payload built from the default presets
    EncodeDemo {
        #[arg(short, long)]
        out: PathBuf,
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
    /// Decode a raw payload and print it as JSON
    Decode { tag: u32, file: PathBuf },
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<ServerSettings> {
    match path {
        Some(path) => ServerSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(ServerSettings::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Check {
            preset,
            allow,
            settings,
        } => {
            let allowed: AllowList = if allow.is_empty() {
                load_settings(settings.as_deref())?.allow_lists().materials
            } else {
                allow.into_iter().collect()
            };
            let layers = try_parse_layers(&preset, &AnyMaterial)
                .with_context(|| format!("parsing preset {preset:?}"))?;
            println!("normalised: {layers}");
            println!("ground level: {}", layers.ground_level());
            println!("built-in: {}", is_builtin(&preset));
            println!("admissible: {}", is_admissible(&preset, &allowed));
        }
        Commands::Legacy { folder } => {
            let (config, dim) = DimensionConfig::from_legacy_folder(&folder, &AnyMaterial)
                .with_context(|| format!("{folder} is not a legacy world folder"))?;
            println!("dimension: {dim}");
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Presets { settings } => {
            let settings = load_settings(settings.as_deref())?;
            for (i, preset) in settings.default_presets.iter().enumerate() {
                let config = DimensionConfig::from_preset(preset, &AnyMaterial);
                println!("{i}: ground={} {preset:?}", config.ground_level());
            }
        }
        Commands::EncodeDemo { out, settings } => {
            let settings = load_settings(settings.as_deref())?;
            let state = ReplicatedState::with_allow_lists(settings.allow_lists());
            for preset in &settings.default_presets {
                let dim = state.registry.next_free_id(settings.first_dimension_id());
                state
                    .registry
                    .register(dim, DimensionConfig::from_preset(preset, &AnyMaterial));
            }
            let payload = encode_world_list(&state);
            std::fs::write(&out, &payload)
                .with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(
                bytes = payload.len(),
                dimensions = state.registry.len(),
                path = %out.display(),
                "world list written"
            );
        }
        Commands::Decode { tag, file } => {
            let payload =
                std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let packet = Packet::decode(tag, &payload)?;
            tracing::debug!(tag, bytes = payload.len(), "payload decoded");
            println!("{}", serde_json::to_string_pretty(&packet)?);
        }
    }

    Ok(())
}
