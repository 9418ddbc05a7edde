//! CLI for ProEdit - compose prompts and edit images with Gemini.

use clap::{Args, Parser, Subcommand};
use proedit::credentials::{CredentialResolver, CredentialStore, FileCredentialStore, PlatformCapability};
use proedit::prompt::{LineStyle, Mode, Orientation, Paper, PreservationMode, Style, StyleGroup};
use proedit::session::{intake_files, Controller};
use proedit::{GeminiModel, GeminiProvider, ImageResolution, Locale};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "proedit")]
#[command(about = "Compose styled prompts and generate or edit images with Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a prompt and up to ten source images
    Generate(GenerateArgs),

    /// Print the composed prompt and aspect ratio without calling the API
    Prompt(SelectionArgs),

    /// Manage the locally stored API key
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },

    /// List the available styles, modes, papers and models
    Options,
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Store an API key
    Set {
        /// The Gemini API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show where a key would come from
    Status,
}

#[derive(Args)]
struct SelectionArgs {
    /// The text prompt
    #[arg(default_value = "")]
    prompt: String,

    /// Style as <group>/<id>, e.g. anime/90s
    #[arg(long)]
    style: Option<Style>,

    /// Line art / finish
    #[arg(long)]
    line_style: Option<LineStyle>,

    /// Layout mode
    #[arg(long)]
    mode: Option<Mode>,

    /// How much of the source image to keep
    #[arg(long, default_value = "none")]
    preservation: PreservationMode,

    /// Output paper
    #[arg(long, default_value = "a3a4")]
    paper: Paper,

    /// Paper orientation
    #[arg(long, default_value = "portrait")]
    orientation: Orientation,

    /// Recompose the image to fill the paper exactly
    #[arg(long)]
    fit_to_paper: bool,

    /// Language for interpolated labels and messages
    #[arg(long, default_value = "ja")]
    lang: Locale,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Source image (repeatable, at most 10)
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,

    /// Output resolution (only honored by gemini-3-pro-image-preview)
    #[arg(long, default_value = "2K")]
    resolution: ImageResolution,

    /// Model variant
    #[arg(short, long, default_value = "gemini-3-pro-image-preview")]
    model: GeminiModel,

    /// Output file path (defaults to proedit-ai-<timestamp>.png)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate(args, cli.json).await?,
        Commands::Prompt(args) => print_prompt(args, cli.json)?,
        Commands::Key { command } => manage_key(command, cli.json)?,
        Commands::Options => list_options(cli.json)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("proedit={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn controller_from(args: &SelectionArgs) -> Controller {
    let mut controller = Controller::new();
    controller.set_locale(args.lang);
    controller.set_prompt(&args.prompt);
    if let Some(style) = args.style {
        controller.set_style(style);
    }
    if let Some(line_style) = args.line_style {
        controller.set_line_style(line_style);
    }
    if let Some(mode) = args.mode {
        controller.set_mode(mode);
    }
    controller.set_preservation(args.preservation);
    controller.set_paper(args.paper);
    controller.set_orientation(args.orientation);
    controller.set_fit_to_paper(args.fit_to_paper);
    controller
}

fn resolver(locale: Locale) -> anyhow::Result<CredentialResolver> {
    Ok(CredentialResolver::new(
        Arc::new(FileCredentialStore::default_location()?),
        PlatformCapability::from_env(),
    )
    .with_locale(locale))
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let locale = args.selection.lang;
    let mut controller = controller_from(&args.selection);
    controller.set_resolution(args.resolution);
    controller.set_model(args.model);

    let report = intake_files(&mut controller, &args.images).await;
    for path in &report.over_limit {
        eprintln!("Ignored {} (limit of 10 images reached)", path.display());
    }
    for path in &report.skipped {
        eprintln!("Ignored {} (not an image)", path.display());
    }
    if !report.failed.is_empty() {
        anyhow::bail!(
            "Could not read: {}",
            report
                .failed
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    if !controller.can_generate() {
        anyhow::bail!("Enter a prompt or provide at least one image");
    }

    let resolver = resolver(locale)?;
    if !resolver.can_attempt()? {
        anyhow::bail!(
            "{}\nStore one with `proedit key set <KEY>` or set GOOGLE_API_KEY.",
            locale.strings().key_missing
        );
    }

    let provider = GeminiProvider::builder().credentials(resolver).build()?;
    let result = match controller.generate(&provider).await {
        Ok(result) => result,
        Err(e) => {
            let message = controller
                .state()
                .error
                .clone()
                .unwrap_or_else(|| e.to_string());
            anyhow::bail!(message);
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(result.download_file_name()));
    result.save(&output)?;

    if json_output {
        let out = serde_json::json!({
            "success": true,
            "output": output.display().to_string(),
            "model": args.model.as_str(),
            "aspect_ratio": controller.aspect_ratio().as_str(),
            "resolution": args.model.supports_resolution().then(|| args.resolution.as_str()),
            "images": report.added.len(),
            "timestamp": result.timestamp,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "Generated image: {} via {} ({}, {} source images)",
            output.display(),
            args.model,
            controller.aspect_ratio(),
            report.added.len()
        );
    }

    Ok(())
}

fn print_prompt(args: SelectionArgs, json_output: bool) -> anyhow::Result<()> {
    let controller = controller_from(&args);
    let prompt = controller.composed_prompt();
    let aspect_ratio = controller.aspect_ratio();

    if json_output {
        let out = serde_json::json!({
            "prompt": prompt,
            "aspect_ratio": aspect_ratio.as_str(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{prompt}");
        eprintln!("Aspect ratio: {aspect_ratio}");
    }
    Ok(())
}

fn manage_key(command: KeyCommand, json_output: bool) -> anyhow::Result<()> {
    let store = FileCredentialStore::default_location()?;
    match command {
        KeyCommand::Set { key } => {
            if key.trim().is_empty() {
                anyhow::bail!("API key must not be empty");
            }
            store.set(&key)?;
            println!("Stored API key in {}", store.path().display());
        }
        KeyCommand::Clear => {
            store.clear()?;
            println!("Removed stored API key");
        }
        KeyCommand::Status => {
            let stored = store.get()?.is_some();
            let platform = PlatformCapability::from_env().is_available();
            if json_output {
                let out = serde_json::json!({
                    "stored_key": stored,
                    "platform_key": platform,
                    "path": store.path().display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let mark = |b: bool| if b { "✓" } else { "✗" };
                println!("{} Stored key ({})", mark(stored), store.path().display());
                println!("{} Platform key (GOOGLE_API_KEY / API_KEY)", mark(platform));
            }
        }
    }
    Ok(())
}

fn list_options(json_output: bool) -> anyhow::Result<()> {
    let styles: Vec<String> = StyleGroup::ALL
        .iter()
        .flat_map(|g| g.styles().iter().map(|s| s.to_string()))
        .collect();
    let line_styles: Vec<&str> = LineStyle::ALL.iter().map(|l| l.as_str()).collect();
    let modes: Vec<&str> = Mode::ALL.iter().map(|m| m.as_str()).collect();
    let preservation: Vec<&str> = PreservationMode::ALL.iter().map(|p| p.as_str()).collect();
    let papers: Vec<&str> = Paper::ALL.iter().map(|p| p.as_str()).collect();
    let resolutions: Vec<&str> = ImageResolution::ALL.iter().map(|r| r.as_str()).collect();
    let models: Vec<&str> = GeminiModel::ALL.iter().map(|m| m.as_str()).collect();

    if json_output {
        let out = serde_json::json!({
            "styles": styles,
            "line_styles": line_styles,
            "modes": modes,
            "preservation": preservation,
            "papers": papers,
            "orientations": ["portrait", "landscape"],
            "resolutions": resolutions,
            "models": models,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("STYLES:       {}", styles.join(", "));
    println!("LINE STYLES:  {}", line_styles.join(", "));
    println!("MODES:        {}", modes.join(", "));
    println!("PRESERVATION: {}", preservation.join(", "));
    println!("PAPERS:");
    for paper in Paper::ALL {
        let ratios = if paper.is_rectangular() {
            format!(
                "{} / {}",
                paper.aspect_ratio(Orientation::Portrait),
                paper.aspect_ratio(Orientation::Landscape)
            )
        } else {
            paper.aspect_ratio(Orientation::Portrait).to_string()
        };
        println!("  {:<8} {:<10} {}", paper.as_str(), ratios, paper.label(Locale::En));
    }
    println!("RESOLUTIONS:");
    for res in ImageResolution::ALL {
        println!("  {:<8} {}", res.as_str(), res.label(Locale::En));
    }
    println!("MODELS:");
    for model in GeminiModel::ALL {
        let note = if model.supports_resolution() {
            " (honors --resolution)"
        } else {
            ""
        };
        println!("  {}{}", model, note);
    }
    Ok(())
}
