//! `tsref`: highlight TypeScript samples with links to their type definitions.
//!
//! - `tsref highlight sample.ts --page api/wallet --symbols symbols.json`
//! - `tsref build manifest.json -o site`
//! - `tsref resolve Amount --from api/wallet --symbols symbols.json`

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tsref::build::{self, BuildManifest};
use tsref::render::{create_renderer, html::escape_html};
use tsref::{
    RenderContext, RenderOptions, SourceLocation, StandardLabels, SymbolRegistry, TracingSink,
    TypeDomain,
};

#[derive(Parser)]
#[command(
    name = "tsref",
    version,
    about = "Cross-referencing TypeScript highlighter for documentation"
)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one code sample to stdout
    Highlight(HighlightArgs),
    /// Register definitions and render every page of a manifest
    Build(BuildArgs),
    /// Resolve a type reference written in prose
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct Inputs {
    /// Symbol dump: {"types": {"Name": {"page": ..., "anchor": ...}}}
    #[arg(long)]
    symbols: Option<PathBuf>,

    /// Label index: {"labels": {...}, "anonlabels": {...}}
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Suffix appended to page identifiers in links
    #[arg(long, default_value = ".html")]
    link_suffix: String,
}

#[derive(Args)]
struct HighlightArgs {
    /// Sample file. If omitted, reads from stdin.
    file: Option<PathBuf>,

    /// Page the sample belongs to
    #[arg(long, default_value = "index")]
    page: String,

    /// Line of the sample's first line in the page source
    #[arg(long, default_value_t = 1)]
    line: usize,

    /// Output format: html (default), tokens
    #[arg(short = 'f', long, default_value = "html")]
    format: String,

    #[command(flatten)]
    inputs: Inputs,
}

#[derive(Args)]
struct BuildArgs {
    /// Build manifest (JSON)
    manifest: PathBuf,

    /// Output directory
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Write the registered symbols here after the build
    #[arg(long)]
    dump_symbols: Option<PathBuf>,

    #[command(flatten)]
    inputs: Inputs,
}

#[derive(Args)]
struct ResolveArgs {
    /// Type name to resolve
    target: String,

    /// Page the reference appears on
    #[arg(long = "from", default_value = "index")]
    from_page: String,

    /// Line of the reference, for warnings
    #[arg(long, default_value_t = 1)]
    line: usize,

    /// Resolve without a known role and list every match
    #[arg(long)]
    any: bool,

    #[command(flatten)]
    inputs: Inputs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let sink = TracingSink::new();
    match &cli.command {
        Command::Highlight(args) => highlight(args, &sink)?,
        Command::Build(args) => run_build(args, &sink)?,
        Command::Resolve(args) => resolve(args, &sink)?,
    }

    if sink.count() > 0 {
        eprintln!("tsref: {} warning(s)", sink.count());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(filter)
        .init();
}

fn load_symbols(path: Option<&Path>) -> Result<SymbolRegistry> {
    let Some(path) = path else {
        return Ok(SymbolRegistry::new());
    };
    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read symbols {}", path.display()))?;
    let dump = serde_json::from_str(&input)
        .with_context(|| format!("invalid symbol dump {}", path.display()))?;
    Ok(SymbolRegistry::from_dump(dump))
}

fn load_labels(path: Option<&Path>) -> Result<StandardLabels> {
    let Some(path) = path else {
        return Ok(StandardLabels::new());
    };
    let input = fs::read_to_string(path)
        .with_context(|| format!("failed to read labels {}", path.display()))?;
    StandardLabels::from_json(&input)
        .with_context(|| format!("invalid label index {}", path.display()))
}

fn highlight(args: &HighlightArgs, sink: &TracingSink) -> Result<()> {
    let source = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            input
        }
    };

    let symbols = load_symbols(args.inputs.symbols.as_deref())?;
    let labels = load_labels(args.inputs.labels.as_deref())?;
    let options = RenderOptions {
        link_suffix: args.inputs.link_suffix.clone(),
    };
    let ctx = RenderContext {
        symbols: &symbols,
        labels: &labels,
        diagnostics: sink,
        options: &options,
    };

    let renderer = create_renderer(&args.format, ctx)?;
    print!(
        "{}",
        renderer.render(&source, &SourceLocation::new(args.page.as_str(), args.line))
    );
    Ok(())
}

fn run_build(args: &BuildArgs, sink: &TracingSink) -> Result<()> {
    let manifest = BuildManifest::load(&args.manifest)?;
    let symbols = load_symbols(args.inputs.symbols.as_deref())?;
    let labels = load_labels(args.inputs.labels.as_deref())?;
    let options = RenderOptions {
        link_suffix: args.inputs.link_suffix.clone(),
    };
    let ctx = RenderContext {
        symbols: &symbols,
        labels: &labels,
        diagnostics: sink,
        options: &options,
    };

    fs::create_dir_all(&args.output).with_context(|| {
        format!("failed to create output directory: {}", args.output.display())
    })?;
    let summary = build::build(&manifest, ctx, &args.output)?;

    if let Some(path) = &args.dump_symbols {
        let json = serde_json::to_string_pretty(&symbols.dump())
            .context("failed to serialize symbols")?;
        fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    eprintln!(
        "tsref: {} page(s), {} sample(s), {} definition(s)",
        summary.pages, summary.samples, summary.definitions
    );
    Ok(())
}

fn resolve(args: &ResolveArgs, sink: &TracingSink) -> Result<()> {
    let symbols = load_symbols(args.inputs.symbols.as_deref())?;
    let options = RenderOptions {
        link_suffix: args.inputs.link_suffix.clone(),
    };
    let domain = TypeDomain::new(&symbols, sink, &options);

    if args.any {
        for (role, reference) in domain.resolve_any_ref(&args.from_page, &args.target) {
            println!("{role}\t{}", reference.to_html(&escape_html(&args.target)));
        }
        return Ok(());
    }

    let location = SourceLocation::new(args.from_page.as_str(), args.line);
    match domain.resolve_type_ref(&location, &args.target) {
        Some(reference) => {
            println!("{}", reference.to_html(&escape_html(&args.target)));
            Ok(())
        }
        None => bail!("unresolved type reference: {}", args.target),
    }
}
