use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::{WrapErr, bail};
use glyphfall_config::Config;
use glyphfall_effects::EffectKind;
use glyphfall_engine::Terminal;
use ratatui::{TerminalOptions, Viewport};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;

use app::App;

/// Animate text into place in the terminal.
#[derive(Debug, Parser)]
#[command(name = "glyphfall", version, about)]
struct Cli {
    /// Text file to animate; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Effect to play (expand, rain, slide).
    #[arg(short, long)]
    effect: Option<String>,

    /// Config file; defaults to <config dir>/glyphfall/config.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for reproducible randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. Filter with RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the available effects and exit.
    #[arg(long)]
    list_effects: bool,
}

impl Cli {
    /// Flags take priority over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(effect) = &self.effect {
            config.effect = effect.clone();
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.list_effects {
        for kind in EffectKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    let resolved = config.resolve()?;

    let text = read_input(cli.input.as_deref())?;
    if text.trim().is_empty() {
        return Ok(());
    }

    let (width, rows) = crossterm::terminal::size()?;
    let mut terminal_config = resolved.terminal;
    let height = input_rows(&text, &terminal_config, width)
        .min(rows)
        .min(resolved.max_height.unwrap_or(u16::MAX))
        .max(1);
    terminal_config.viewport = Some((width, height));

    let mut terminal = Terminal::new(&text, &terminal_config)?;
    let mut effect = resolved.effect.build(resolved.settings);
    effect.prepare(&mut terminal)?;
    info!(effect = %resolved.effect, width, height, "starting");

    let tui = ratatui::init_with_options(TerminalOptions {
        viewport: Viewport::Inline(height),
    });
    let result = App::new(effect, terminal, resolved.fps).run(tui);
    ratatui::restore();
    result
}

fn init_logging(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn read_input(path: Option<&Path>) -> color_eyre::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display())),
        None => {
            let mut stdin = io::stdin();
            if stdin.is_terminal() {
                bail!("no input: pass a file or pipe text on stdin");
            }
            let mut text = String::new();
            stdin.read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Rows the text occupies once laid out.
fn input_rows(text: &str, config: &glyphfall_engine::TerminalConfig, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .lines()
        .map(|line| {
            let len = line.replace('\t', &" ".repeat(config.tab_width)).trim_end().chars().count();
            if config.wrap_text { len.div_ceil(width).max(1) } else { 1 }
        })
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
