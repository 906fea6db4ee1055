use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::Path;

// Import from colgrid-core
use colgrid_core::export::extension_for_format;
use colgrid_core::{
    source_for_path, ExtractionConfig, Layout, LayoutPresets, Overlay, PageIndex, TableExtractor,
};

const DEFAULT_PRESET: &str = "borelog";

#[derive(Parser)]
#[command(name = "colgrid")]
#[command(about = "Rebuild tables from positioned PDF text using column boundaries")]
struct Args {
    /// Fragment file to read (.json, or positioned-span .xhtml/.html)
    #[arg(short, long)]
    input: Option<String>,

    /// Layout file with column boundaries and cutoffs (YAML or JSON)
    #[arg(short, long)]
    layout: Option<String>,

    /// Built-in layout to use when no layout file is given
    #[arg(long)]
    preset: Option<String>,

    /// Path to extraction config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Page to extract (repeatable); defaults to every page
    #[arg(short, long = "page")]
    pages: Vec<PageIndex>,

    /// Extract every page in the document
    #[arg(long)]
    all: bool,

    /// Output format: table, records, or csv
    #[arg(short = 'f', long, default_value = "table")]
    output_format: String,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Also write the extraction report (stats, fingerprint) to this path
    #[arg(long)]
    report: Option<String>,

    /// Print overlay geometry for the active layout and exit
    #[arg(long)]
    show_overlay: bool,

    /// List built-in layouts and exit
    #[arg(long)]
    show_presets: bool,

    /// Log per-stage timings for every page
    #[arg(long)]
    profile: bool,

    /// Trace fragments whose text matches this pattern (regex or substring)
    #[arg(long)]
    debug_filter: Vec<String>,

    /// Process pages one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.debug_filter.is_empty() {
        "info"
    } else {
        "info,colgrid_core=debug"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    println!("🦀 Colgrid Table Extractor");

    if args.show_presets {
        show_presets();
        return Ok(());
    }

    let layout = load_layout(&args)?;

    if args.show_overlay {
        show_overlay(&layout);
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        show_help();
        return Ok(());
    };

    ensure_input_exists(input)?;

    let mut config = ExtractionConfig::load_requested(args.config.as_deref())?;
    if let Some(config_path) = &args.config {
        println!("📋 Loaded config from: {}", config_path);
    } else {
        println!("📋 Using default config");
    }

    // Apply CLI overrides to config
    if args.profile {
        config.profile = true;
    }
    if args.sequential {
        config.parallel = false;
    }
    if !args.debug_filter.is_empty() {
        config.debug.enabled = true;
        config.debug.filter_patterns.extend(args.debug_filter.iter().cloned());
    }

    let source = source_for_path(Path::new(input))?;
    println!("📄 Reading {} fragments: {}", source.name(), input);
    let document = source.read_file(Path::new(input))?;

    let pages: Vec<PageIndex> = if args.all || args.pages.is_empty() {
        document.page_numbers()
    } else {
        args.pages.clone()
    };

    let snapshot = layout.snapshot();
    let extractor = TableExtractor::new(&document, &config);
    let extraction = match extractor.extract_with_report(&pages, &snapshot, None) {
        Ok(extraction) => extraction,
        Err(e) => {
            eprintln!("❌ Extraction failed: {e}");
            std::process::exit(1);
        }
    };

    let table = &extraction.table;
    let report = &extraction.report;
    println!("✅ Successfully extracted table");
    println!("📊 Table metrics:");
    println!("   - Columns: {}", table.columns.len());
    println!("   - Rows: {}", table.len());
    println!("   - Pages: {}", report.pages.len());
    println!(
        "   - Fragments: {} ({} cut off, {} dropped, {} invalid)",
        report.total_fragments(),
        report.total_cut_off(),
        report.total_dropped(),
        report.total_invalid()
    );

    // Generate output path
    let output_path = if let Some(output) = &args.output {
        output.clone()
    } else {
        let input_name = Path::new(input)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        format!(
            "{input_name}_colgrid.{}",
            extension_for_format(&args.output_format)
        )
    };

    table.save_with_format(&output_path, &args.output_format)?;
    println!("💾 {} format results saved to: {}", args.output_format, output_path);

    if let Some(report_path) = &args.report {
        std::fs::write(report_path, serde_json::to_string_pretty(report)?)?;
        println!("💾 Extraction report saved to: {}", report_path);
    }

    Ok(())
}

/// Layout file wins over a named preset; with neither, the default preset
fn ensure_input_exists(input: &str) -> Result<()> {
    if !Path::new(input).exists() {
        println!("⚠️  Input file not found at: {}", input);
        println!("   Please check the file path.");
        return Err(anyhow!("input file not found: {}", input));
    }
    Ok(())
}

fn load_layout(args: &Args) -> Result<Layout> {
    if let Some(path) = &args.layout {
        let layout = Layout::load_from_file(path)?;
        println!("📐 Loaded layout from: {}", path);
        return Ok(layout);
    }

    let name = args.preset.as_deref().unwrap_or(DEFAULT_PRESET);
    let presets = LayoutPresets::new();
    let layout = presets
        .get(name)
        .ok_or_else(|| anyhow!("Unknown preset '{}'. Available: {}", name, presets.names().join(", ")))??;
    println!("📐 Using built-in layout: {}", name);
    Ok(layout)
}

fn show_overlay(layout: &Layout) {
    let overlay = Overlay::from_snapshot(&layout.snapshot());

    println!("\n📏 Column guides:");
    for guide in &overlay.columns {
        println!(
            "  {:<16} x=[{:.1}, {:.1}]  {}",
            guide.name, guide.xmin, guide.xmax, guide.color
        );
    }

    if overlay.cutoffs.is_empty() {
        println!("\n✂️  No cutoffs");
    } else {
        println!("\n✂️  Cutoff bands:");
        for guide in &overlay.cutoffs {
            println!("  {:<8} edge at y={:.1}", guide.kind.to_string(), guide.edge_y);
        }
    }
}

fn show_presets() {
    let presets = LayoutPresets::new();
    println!("\n📐 Built-in layouts:");
    for name in presets.names() {
        if let Some(Ok(layout)) = presets.get(name) {
            println!("  {:<12} {} columns: {}", name, layout.boundaries.len(), layout.boundaries.names().join(", "));
        }
    }
}

fn show_help() {
    println!("\n📋 Available Options:");
    println!("  --input <path>          Fragment file (.json or .xhtml)");
    println!("  --layout <path>         Layout file with columns and cutoffs");
    println!("  --preset <name>         Built-in layout (default: {})", DEFAULT_PRESET);
    println!("  --config <path>         Extraction config file");
    println!("  --page <n>              Page to extract, repeatable (default: all)");
    println!("  --output <path>         Output file path (auto-generated if not specified)");
    println!("  --output-format <fmt>   Output format: table, records, or csv");

    println!("\n📄 Output Formats:");
    println!("  table    - Column schema plus rows with page and y position (default)");
    println!("  records  - One JSON object per row, keyed by column name plus Page (_page if taken)");
    println!("  csv      - Header row, one line per row, trailing Page column");

    println!("\n📝 Usage Examples:");
    println!("  cargo run -- -i log.json");
    println!("  cargo run -- -i log.xhtml -l layout.yaml -p 2 -p 3 -f csv");
    println!("  cargo run -- --preset borelog --show-overlay");
}
