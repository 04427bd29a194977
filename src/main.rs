use clap::{Parser, Subcommand};
use photodiag::config::{self, DiagConfig};
use photodiag::diagnose::{self, DiagnoseError};
use photodiag::grid::{GridCatalog, PRESET_NAMES};
use photodiag::imaging::{LoadError, RustLoader, is_supported_image};
use photodiag::output;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "photodiag")]
#[command(about = "Histogram, clipping, focus peaking and composition grids for photographs")]
#[command(long_about = "\
Histogram, clipping, focus peaking and composition grids for photographs

For every image, photodiag reports:

  Histogram   256-bin counts per channel (gray, or red/green/blue)
  Clipping    pixels whose brightest channel reaches the clip threshold
  Focus       pixels with strong fine detail (focus peaking)
  Grid        a composition grid scaled to the image's pixel size

Grids are built-in presets (thirds, golden, diagonals) or CSV files in a
directory passed with --grids:

  grids/
  ├── thirds.csv       # overrides the built-in preset
  └── triangles.csv    # one line per polyline: x1,y1,x2,y2,... in 0..1

Run 'photodiag gen-config' to generate a documented photodiag.toml.
Set RUST_LOG=debug for timings and loader details.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Flags for the analyze command.
#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Image files, or directories whose supported images are analyzed
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Config file (defaults apply to every key it leaves out)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding grid CSV files
    #[arg(long)]
    grids: Option<PathBuf>,

    /// Grid to overlay: a preset name or a CSV file in --grids
    #[arg(long, conflicts_with = "no_grid")]
    grid: Option<String>,

    /// Skip the grid overlay
    #[arg(long)]
    no_grid: bool,

    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze one or more images
    Analyze(AnalyzeArgs),
    /// Print a stock photodiag.toml with all options documented
    GenConfig,
    /// List grids available to --grid
    Presets {
        /// Directory holding grid CSV files
        #[arg(long)]
        grids: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
        Command::Presets { grids } => {
            let catalog = grids.map(GridCatalog::new).unwrap_or_default();
            for line in output::format_grid_names(&catalog.available(), PRESET_NAMES) {
                println!("{}", line);
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn analyze(args: AnalyzeArgs) -> Result<(), DiagnoseError> {
    let config = build_config(&args)?;
    init_thread_pool(&config.processing);

    let paths = expand_inputs(&args.images)?;
    if paths.is_empty() {
        return Err(DiagnoseError::NoImages);
    }

    let grid = diagnose::load_grid_or_warn(&config.grid);

    let results = diagnose::diagnose_files(&RustLoader::new(), &paths, &config, grid.as_ref());

    if args.json {
        println!("{}", output::format_json(&paths, &results)?);
    } else {
        output::print_batch(&paths, &results);
    }

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        return Err(DiagnoseError::Failed {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

/// Config file (or stock defaults) with command-line overrides applied.
fn build_config(args: &AnalyzeArgs) -> Result<DiagConfig, DiagnoseError> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::resolve_config(None)?,
    };
    if let Some(dir) = &args.grids {
        config.grid.directory = Some(dir.clone());
    }
    if let Some(name) = &args.grid {
        config.grid.preset = name.clone();
    }
    if args.no_grid {
        config.grid.enabled = false;
    }
    Ok(config)
}

/// Files pass through as given; directories expand to their supported
/// images, sorted by name.
fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(images_in(input)?);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

fn images_in(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_supported_image(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
