use anyhow::{Context, Result};
use clap::Parser;
use ogpcard::export::{DirectorySink, ExportController};
use ogpcard::presets::{size_presets, theme_presets, SizeKey, ThemeKey};
use ogpcard::preview::{preview_scale, render_preview};
use ogpcard::{CardConfig, CardRenderer, Error, Locale, RenderOptions};
use std::path::PathBuf;
use std::sync::Arc;

/// Compose an Open Graph preview card and export it as PNG
#[derive(Parser, Debug)]
#[command(name = "ogpcard")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON card configuration (camelCase keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site name
    #[arg(long)]
    site_name: Option<String>,

    /// Article title; `\n` starts a new line
    #[arg(short, long)]
    title: Option<String>,

    /// Author name
    #[arg(long)]
    author_name: Option<String>,

    /// Author icon: URL, data URI or file path
    #[arg(long)]
    author_icon: Option<String>,

    /// Size preset (standard, wide)
    #[arg(long)]
    size: Option<SizeKey>,

    /// Theme preset
    #[arg(long)]
    theme: Option<ThemeKey>,

    /// Pixel density multiplier
    #[arg(long, default_value_t = 1.0)]
    density: f32,

    /// Placeholder language (en, ja)
    #[arg(long, default_value = "en")]
    locale: Locale,

    /// Font file for card text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Remote icon timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    icon_timeout_ms: u64,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write a preview sized for this many logical pixels
    #[arg(long)]
    preview_width: Option<u32>,

    /// Print the available presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn load_config(args: &Args) -> Result<CardConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid card configuration in {}", path.display()))?
        }
        None => CardConfig::default(),
    };

    if let Some(v) = &args.site_name {
        config.site_name = v.clone();
    }
    if let Some(v) = &args.title {
        config.article_title = v.replace("\\n", "\n");
    }
    if let Some(v) = &args.author_name {
        config.author_name = v.clone();
    }
    if let Some(v) = &args.author_icon {
        config.author_icon_url = v.clone();
    }
    if let Some(v) = args.size {
        config.size = v;
    }
    if let Some(v) = args.theme {
        config.theme = v;
    }
    Ok(config)
}

fn list_presets() {
    println!("sizes:");
    for s in size_presets() {
        println!("  {:<10} {}x{}  {}", s.key.as_str(), s.width_px, s.height_px, s.label);
    }
    println!("themes:");
    for t in theme_presets() {
        println!("  {:<10} {}", t.key.as_str(), t.label);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.list_presets {
        list_presets();
        return Ok(());
    }

    let config = load_config(&args)?;
    let options = RenderOptions {
        density: args.density,
        locale: args.locale,
        font_path: args.font.clone(),
        icon_timeout_ms: args.icon_timeout_ms,
    };
    let renderer = Arc::new(CardRenderer::new(&options).context("failed to set up the renderer")?);

    let controller = ExportController::new(
        Arc::clone(&renderer),
        Arc::new(DirectorySink::new(&args.out_dir)),
    )
    .with_density(options.density);

    if let Some(available) = args.preview_width {
        let preview = render_preview(&renderer, &config, available).context("preview failed")?;
        let canvas = ogpcard::presets::resolve_size(config.size).width_px;
        let scale = preview_scale(canvas, available);
        let path = args.out_dir.join("ogp-preview.png");
        std::fs::create_dir_all(&args.out_dir)
            .with_context(|| format!("failed to create {}", args.out_dir.display()))?;
        std::fs::write(&path, &preview.png_data)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!(
            "preview {}x{} (scale {:.3}) -> {}",
            preview.width,
            preview.height,
            scale,
            path.display()
        );
    }

    match controller.export(config).await {
        Ok(artifact) => {
            println!(
                "{} {}x{} {}",
                args.out_dir.join(&artifact.filename).display(),
                artifact.width,
                artifact.height,
                artifact.digest()
            );
            Ok(())
        }
        Err(Error::AlreadyInProgress) => Ok(()),
        Err(e) => Err(e).context("export failed"),
    }
}
