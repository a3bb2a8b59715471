//! edidgen — entry point.
//!
//! ```text
//! edidgen generate --preset cea-1920x1080-60
//! edidgen generate --params display.json --patch update.json
//! edidgen validate --params display.json
//! edidgen presets
//! edidgen --gen-config            Dump default config TOML and exit
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use edidgen_core::{
    BLOCK_LEN, DisplayTimingParams, EdidError, Locks, ParamsPatch, apply_external_update,
    artifact_filename, encode, presets, validate,
};

use edidgen_cli::config::CliConfig;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "edidgen", about = "EDID 1.3 binary generator")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "edidgen.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a parameter set into an EDID `.bin` artifact.
    Generate {
        /// Parameter JSON file (defaults to the built-in 1080p60 record).
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Start from a preset instead of a params file.
        #[arg(long, conflicts_with = "params")]
        preset: Option<String>,

        /// Sparse update JSON applied on top, with assistant merge
        /// semantics (malformed fields dropped, one derived recompute).
        #[arg(long)]
        patch: Option<PathBuf>,

        /// Hold the refresh rate during the patch merge.
        #[arg(long)]
        lock_refresh: bool,

        /// Hold the pixel clock during the patch merge.
        #[arg(long)]
        lock_pixel_clock: bool,

        /// Output path (defaults to the artifact name in the configured
        /// output directory).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a parameter JSON file and report field errors.
    Validate {
        #[arg(short, long)]
        params: PathBuf,
    },
    /// List the preset catalog.
    Presets,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> Result<(), EdidError> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&CliConfig::default())
            .map_err(|e| EdidError::Other(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    let config = CliConfig::load(&cli.config);
    init_tracing(&config);

    match cli.command {
        Some(Commands::Generate {
            params,
            preset,
            patch,
            lock_refresh,
            lock_pixel_clock,
            output,
        }) => {
            let locks = Locks {
                refresh_rate: lock_refresh,
                pixel_clock: lock_pixel_clock,
            };
            run_generate(&config, params.as_deref(), preset.as_deref(), patch.as_deref(), locks, output)
        }
        Some(Commands::Validate { params }) => run_validate(&params),
        Some(Commands::Presets) => {
            run_presets();
            Ok(())
        }
        None => {
            // No subcommand: behave like `generate` with defaults.
            run_generate(&config, None, None, None, Locks::default(), None)
        }
    }
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.file.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        match fs::File::create(&config.logging.file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::sync::Arc::new(file))
                    .with_ansi(false)
                    .init();
            }
            Err(_) => {
                tracing_subscriber::fmt().with_env_filter(filter).init();
                warn!("could not open log file {}", config.logging.file);
            }
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────

fn run_generate(
    config: &CliConfig,
    params_path: Option<&Path>,
    preset: Option<&str>,
    patch_path: Option<&Path>,
    locks: Locks,
    output: Option<PathBuf>,
) -> Result<(), EdidError> {
    let mut params = load_params(params_path, preset)?;

    if let Some(path) = patch_path {
        let patch: ParamsPatch = serde_json::from_str(&fs::read_to_string(path)?)?;
        params = apply_external_update(&params, &patch, locks);
        info!("applied external update from {}", path.display());
    }

    let errors = validate(&params);
    if !errors.is_empty() {
        for (field, message) in errors.iter() {
            warn!("{field}: {message}");
        }
        return Err(EdidError::Validation(errors));
    }

    let bytes = encode(&params);
    if bytes.len() != BLOCK_LEN && bytes.len() != 2 * BLOCK_LEN {
        return Err(EdidError::InvalidBlockLength { actual: bytes.len() });
    }

    let path = output.unwrap_or_else(|| {
        Path::new(&config.output.dir).join(artifact_filename(&params.display_name))
    });
    if path.exists() && !config.output.overwrite {
        return Err(EdidError::Other(format!(
            "refusing to overwrite {} (set output.overwrite in the config)",
            path.display()
        )));
    }

    fs::write(&path, &bytes)?;
    info!("wrote {} bytes to {}", bytes.len(), path.display());
    println!("{}", path.display());
    Ok(())
}

fn run_validate(params_path: &Path) -> Result<(), EdidError> {
    let params: DisplayTimingParams = serde_json::from_str(&fs::read_to_string(params_path)?)?;
    let errors = validate(&params);

    if errors.is_empty() {
        println!("ok");
        return Ok(());
    }
    for (field, message) in errors.iter() {
        println!("{field}: {message}");
    }
    Err(EdidError::Validation(errors))
}

fn run_presets() {
    for preset in presets::all() {
        let p = &preset.params;
        println!(
            "{:<20} {:<28} {}x{} @ {} Hz, {} kHz",
            preset.id, preset.label, p.h_addressable, p.v_addressable, p.refresh_rate, p.pixel_clock
        );
    }
}

fn load_params(
    params_path: Option<&Path>,
    preset: Option<&str>,
) -> Result<DisplayTimingParams, EdidError> {
    if let Some(id) = preset {
        return presets::find(id).ok_or_else(|| EdidError::UnknownPreset(id.to_string()));
    }
    match params_path {
        Some(path) => {
            let params = serde_json::from_str(&fs::read_to_string(path)?)?;
            info!("loaded parameters from {}", path.display());
            Ok(params)
        }
        None => Ok(DisplayTimingParams::default()),
    }
}
