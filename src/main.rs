//! adoc-chunker - split Asciidoctor HTML books into pages

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use adoc_chunker::{Config, DepthPolicy, chunk_file};

#[derive(Parser)]
#[command(name = "adoc-chunker")]
#[command(version, about = "Split a single-page Asciidoctor HTML book into linked pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    adoc-chunker book.html                  One page per chapter in html_chunks/
    adoc-chunker book.html -o site          Write pages to site/
    adoc-chunker book.html --depth 1,2:3    Split chapter 2 down to subsections
    adoc-chunker book.html --depth 2,5-8:1  Sections everywhere except chapters 5 to 8")]
struct Cli {
    /// Single-page HTML produced by Asciidoctor
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory [default: html_chunks]
    #[arg(short, long, value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Split depth: a default level plus chapter overrides, e.g. 1,3:2,5-7:3
    #[arg(long, value_name = "SPEC")]
    depth: Option<DepthPolicy>,

    /// Stylesheets to link and copy, comma separated [default: asciidoctor-chunker.css]
    #[arg(long, value_name = "FILES", value_delimiter = ',')]
    css: Option<Vec<PathBuf>>,

    /// Keep non-Asciidoctor content found under #content on every page
    #[arg(long)]
    no_strict_mode: bool,

    /// TOC entry text for the first page [default: Titlepage]
    #[arg(long, value_name = "TEXT")]
    title_page: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> adoc_chunker::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(outdir) = &self.outdir {
            config.outdir = outdir.clone();
        }
        if let Some(depth) = &self.depth {
            config.depth = depth.clone();
        }
        if let Some(css) = &self.css {
            config.css = css.clone();
        }
        if self.no_strict_mode {
            config.strict_mode = false;
        }
        if let Some(title) = &self.title_page {
            config.title_page = title.clone();
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> adoc_chunker::Result<()> {
    let config = cli.config()?;
    let report = chunk_file(&cli.input, &config)?;

    if !report.is_complete() {
        log::warn!("{} pages could not be written", report.failed_pages.len());
    }
    if !cli.quiet {
        println!(
            "Successfully chunked! => {}",
            config.outdir.join("index.html").display()
        );
    }
    Ok(())
}
