//! Cirneco - render code selections as snippet card PNGs.
//!
//! # Usage
//!
//! ```bash
//! cirneco generate src/main.rs --lines 10:24
//! cat query.sql | cirneco generate --language sql
//! cirneco generate-with-theme src/lib.rs
//! cirneco generate-with-theme --theme nord src/lib.rs
//! cirneco themes
//! ```

use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};

use cirneco::language::{file_name, language_id_for_path};
use cirneco::{CardStyle, RenderConfig, RenderRequest, SnippetOptions, ThemeCatalog, ThemeSource, Workspace};

/// Render code selections as themed snippet card images
#[derive(Parser, Debug)]
#[command(name = "cirneco", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a snippet with the default theme
    Generate(GenerateArgs),
    /// Pick a theme from the catalog, then generate a snippet
    GenerateWithTheme {
        /// Theme key; prompts with the catalog when omitted
        #[arg(long)]
        theme: Option<String>,
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// List available themes
    Themes(ProjectArgs),
}

#[derive(Args, Debug)]
struct ProjectArgs {
    /// Project root (receives `.cirneco/` output and configuration)
    #[arg(long, value_name = "DIR", default_value = ".")]
    project: PathBuf,

    /// Directory with a `themes.json` manifest replacing the bundled themes
    #[arg(long, value_name = "DIR")]
    themes_dir: Option<PathBuf>,
}

impl ProjectArgs {
    fn theme_source(&self) -> ThemeSource {
        self.themes_dir.as_ref().map(|dir| ThemeSource::directory(dir)).unwrap_or_default()
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source file; code is read from stdin when omitted
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// 1-based inclusive line range of FILE, e.g. `10:24` or `7`
    #[arg(long, value_name = "A:B", requires = "file")]
    lines: Option<String>,

    /// Editor language id (defaults to one inferred from FILE's extension)
    #[arg(long)]
    language: Option<String>,

    /// File name shown in the title bar (defaults to FILE's name)
    #[arg(long)]
    filename: Option<String>,

    /// Card header style
    #[arg(long, value_enum, default_value = "title-bar")]
    style: StyleArg,

    /// Reveal the output folder in the file browser afterwards
    #[arg(long)]
    open: bool,

    #[command(flatten)]
    project: ProjectArgs,

    /// Viewport width in CSS pixels
    #[arg(long)]
    width: Option<u32>,

    /// Device pixel ratio
    #[arg(long)]
    scale: Option<f64>,

    /// Extra height added to the measured card before capture
    #[arg(long)]
    padding: Option<u32>,

    /// Milliseconds to wait for layout before measuring
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Chrome/Chromium executable
    #[arg(long, value_name = "PATH")]
    browser: Option<PathBuf>,

    /// Launch the browser without its sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum StyleArg {
    TitleBar,
    Plain,
}

impl From<StyleArg> for CardStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::TitleBar => CardStyle::TitleBar,
            StyleArg::Plain => CardStyle::Plain,
        }
    }
}

impl GenerateArgs {
    fn render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            viewport_width: self.width.unwrap_or(defaults.viewport_width),
            device_scale_factor: self.scale.unwrap_or(defaults.device_scale_factor),
            padding: self.padding.unwrap_or(defaults.padding),
            settle_delay_ms: self.settle_ms.unwrap_or(defaults.settle_delay_ms),
            browser_path: self.browser.clone(),
            sandbox: !self.no_sandbox,
            ..defaults
        }
    }

    /// Build the request from FILE (or stdin), standing in for the editor selection.
    fn request(&self) -> Result<RenderRequest> {
        let (code, language, filename) = match &self.file {
            Some(path) => {
                let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
                let code = match &self.lines {
                    Some(range) => select_lines(&text, range)?,
                    None => text,
                };
                let shown = path.to_string_lossy();
                (code, language_id_for_path(&shown).to_string(), Some(file_name(&shown).to_string()))
            }
            None => {
                if io::stdin().is_terminal() {
                    return Err(cirneco::Error::NoActiveContext.into());
                }
                let mut code = String::new();
                io::stdin().read_to_string(&mut code).context("Failed to read stdin")?;
                (code, "plaintext".to_string(), None)
            }
        };

        if code.trim().is_empty() {
            return Err(cirneco::Error::EmptySelection.into());
        }

        let mut request = RenderRequest::new(code, self.language.clone().unwrap_or(language)).with_style(self.style.into());
        request.filename = self.filename.clone().or(filename);
        Ok(request)
    }
}

fn select_lines(text: &str, range: &str) -> Result<String> {
    let (start, end) = match range.split_once(':') {
        Some((a, b)) => (a.trim().parse::<usize>()?, b.trim().parse::<usize>()?),
        None => {
            let line = range.trim().parse::<usize>()?;
            (line, line)
        }
    };
    if start == 0 || end < start {
        bail!("Invalid line range '{}'", range);
    }
    Ok(text
        .lines()
        .skip(start - 1)
        .take(end - start + 1)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn print_catalog(catalog: &ThemeCatalog, out: &mut impl Write) -> io::Result<()> {
    let default_key = catalog.default_theme_key();
    for (index, (key, theme)) in catalog.iter().enumerate() {
        let marker = if Some(key) == default_key { "*" } else { " " };
        writeln!(out, "{:>3} {} {:<16} {:<18} {}", index + 1, marker, key, theme.name, theme.description)?;
    }
    Ok(())
}

/// Ask for a theme on stdin; `None` means the user cancelled.
fn prompt_theme(catalog: &ThemeCatalog) -> Result<Option<String>> {
    let mut err = io::stderr();
    print_catalog(catalog, &mut err)?;
    write!(err, "Theme (number or key, empty to cancel): ")?;
    err.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    let picked = match answer.parse::<usize>() {
        Ok(n) if n >= 1 => catalog.keys().nth(n - 1).map(str::to_string),
        _ => catalog.contains(answer).then(|| answer.to_string()),
    };
    if picked.is_none() {
        warn!("Unknown theme '{}'", answer);
    }
    Ok(picked)
}

fn reveal_in_file_browser(dir: &Path) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };
    if let Err(e) = std::process::Command::new(opener).arg(dir).spawn() {
        warn!("Failed to open {}: {}", dir.display(), e);
    }
}

async fn generate(args: GenerateArgs, theme: Option<String>) -> Result<()> {
    let workspace = Workspace::open(&args.project.project)?;
    let mut request = args.request()?;
    request.theme = theme;

    let options = SnippetOptions {
        theme_source: args.project.theme_source(),
        render: args.render_config(),
    };

    info!("Generating snippet...");
    let artifact = cirneco::async_api::generate_snippet(workspace, request, options).await?;
    println!("{}", artifact.path.display());
    eprintln!("Snippet generated successfully: {}", artifact.file_name);

    if args.open {
        if let Some(dir) = artifact.path.parent() {
            reveal_in_file_browser(dir);
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate(args, None).await,
        Command::GenerateWithTheme { theme, args } => {
            let theme = match theme {
                Some(theme) => theme,
                None => {
                    if args.file.is_none() {
                        bail!("Pass --theme when reading code from stdin");
                    }
                    let workspace = Workspace::open(&args.project.project)?;
                    let catalog = workspace.catalog(&args.project.theme_source());
                    match prompt_theme(&catalog)? {
                        Some(theme) => theme,
                        None => {
                            info!("No theme selected; nothing generated");
                            return Ok(());
                        }
                    }
                }
            };
            generate(args, Some(theme)).await
        }
        Command::Themes(project) => {
            let workspace = Workspace::open(&project.project)?;
            let catalog = workspace.catalog(&project.theme_source());
            print_catalog(&catalog, &mut io::stdout().lock())?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cirneco=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to generate snippet: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
