use crate::config::{load_config, Config};
use crate::i18n::MessageCatalog;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::request::{layout_request, parse_requests};
use crate::theme::ThemeName;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "asvg", version, about = "Analytics badges and charts as SVG")]
pub struct Args {
    /// Input file with one render request or a JSON array of them; '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for a single SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    #[arg(short = 'w', long = "width")]
    pub width: Option<u32>,

    #[arg(short = 'H', long = "height")]
    pub height: Option<u32>,

    #[arg(long = "theme")]
    pub theme: Option<ThemeName>,

    /// Locale used when a request names none
    #[arg(long = "locale")]
    pub locale: Option<String>,

    /// Directory holding `<locale>.json` message bundles
    #[arg(long = "messagesDir")]
    pub messages_dir: Option<PathBuf>,

    /// Seed for synthetic trend series; random when omitted
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Write the computed layouts as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = apply_args(load_config(args.config.as_deref())?, &args);
    let catalog = MessageCatalog::new(config.locale.messages_dir.clone());
    if catalog.dir().is_some() {
        catalog.preload(config.locale.preload.as_slice());
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let input = read_input(args.input.as_deref())?;
    let requests = parse_requests(&input)?;
    if requests.is_empty() {
        return Err(anyhow::anyhow!("No render requests found in input"));
    }

    let mut layouts = Vec::with_capacity(requests.len());
    for (idx, request) in requests.iter().enumerate() {
        let layout = layout_request(request, &config, &catalog, &mut rng)
            .map_err(|err| anyhow::anyhow!("Request {}: {err}", idx + 1))?;
        layouts.push(layout);
    }

    if layouts.len() == 1 {
        let layout = &layouts[0];
        let svg = render_svg(layout);
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
            OutputFormat::Png => {
                let output = ensure_output(&args.output, "png")?;
                write_output_png(&svg, &output, layout.width, layout.height)?;
            }
        }
    } else {
        let outputs =
            resolve_multi_outputs(args.output.as_deref(), args.output_format, layouts.len());
        for (layout, output) in layouts.iter().zip(&outputs) {
            let svg = render_svg(layout);
            match args.output_format {
                OutputFormat::Svg => write_output_svg(&svg, Some(output))?,
                OutputFormat::Png => write_output_png(&svg, output, layout.width, layout.height)?,
            }
            log::debug!("Wrote {}", output.display());
        }
    }

    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layouts)?;
    }

    Ok(())
}

/// Command line flags win over the config file.
fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(theme) = args.theme {
        config.render.theme = theme;
    }
    if let Some(locale) = &args.locale {
        config.locale.default_locale = locale.clone();
    }
    if let Some(dir) = &args.messages_dir {
        config.locale.messages_dir = Some(dir.clone());
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

/// Numbered outputs for multi-request input: `<stem>-N.<ext>` next to
/// `output`, inside it when it is a directory, or `chart-N.<ext>` in the
/// working directory when no output was given.
fn resolve_multi_outputs(output: Option<&Path>, format: OutputFormat, count: usize) -> Vec<PathBuf> {
    let ext = format.extension();
    let (parent, stem) = match output {
        Some(base) if base.is_dir() => (base.to_path_buf(), "chart"),
        Some(base) => (
            base.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
            base.file_stem().and_then(|s| s.to_str()).unwrap_or("chart"),
        ),
        None => (PathBuf::from("."), "chart"),
    };
    (0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect()
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            match record.level() {
                log::Level::Error => eprintln!("Error ({}): {}", target, record.args()),
                log::Level::Warn => eprintln!("Warning ({}): {}", target, record.args()),
                log::Level::Info => eprintln!("Info ({}): {}", target, record.args()),
                log::Level::Debug => eprintln!("Debug ({}): {}", target, record.args()),
                log::Level::Trace => eprintln!("Trace ({}): {}", target, record.args()),
            }
        }
    }

    fn flush(&self) {}
}

fn init_logger(verbose: bool) {
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }
}
