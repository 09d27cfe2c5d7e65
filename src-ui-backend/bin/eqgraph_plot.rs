use clap::Parser;
use eqgraph_backend::{EditorConfig, Filter, FilterId, FilterSet, plot_filter_set, preamp_gain};
use std::path::PathBuf;

/// Render a filter set the way the EQ graph draws it
#[derive(Parser)]
#[command(name = "eqgraph_plot")]
#[command(about = "Plot the response curves and drag handles of a filter set")]
#[command(long_about = "Reads a JSON array of filters, e.g.\n\n\
[{\"type\": \"peaking\", \"hz\": 1000, \"db\": 6, \"q\": 1},\n \
{\"type\": \"lowshelf\", \"hz\": 100, \"db\": -3, \"q\": 0.7}]\n\n\
and writes an HTML page with one curve per filter and their sum.")]
struct Cli {
    /// Input JSON file with the filters
    input: PathBuf,

    /// Output HTML file (defaults to input filename with .html extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML config file (defaults to $EQGRAPH_CONFIG, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Graph width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Graph height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Distance between curve samples in pixels
    #[arg(long)]
    step: Option<f64>,

    /// Show the drag handles of the filter at this position (0-based)
    #[arg(short, long)]
    select: Option<u32>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::from_env()?,
    };
    if let Some(width) = cli.width {
        config.width_px = width;
    }
    if let Some(height) = cli.height {
        config.height_px = height;
    }
    if let Some(step) = cli.step {
        config.sample_step_px = step;
    }
    config.validate()?;

    let text = std::fs::read_to_string(&cli.input)
        .map_err(|e| format!("failed to read {:?}: {}", cli.input, e))?;
    let filters: Vec<Filter> = serde_json::from_str(&text)?;
    let set: FilterSet = filters.into_iter().collect();
    log::info!("loaded {} filters from {:?}", set.len(), cli.input);
    for (id, filter) in set.iter() {
        log::info!("  {} {}", id, filter);
    }
    log::info!("preamp gain: {:.1} dB", preamp_gain(&set));

    let selected = cli.select.map(FilterId);
    if let Some(id) = selected {
        if !set.contains(id) {
            return Err(format!("no filter at position {}", id.0).into());
        }
    }

    let plot = plot_filter_set(&set, selected, &config);
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("html"));
    std::fs::write(&output, plot.to_html())
        .map_err(|e| format!("failed to write {:?}: {}", output, e))?;
    log::info!("wrote {:?}", output);
    Ok(())
}
