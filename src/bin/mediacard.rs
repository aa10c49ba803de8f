use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use mediacard::{CacheKind, CardRequest, DiskCache, ServiceConfig, Variant, fingerprint};

#[derive(Parser, Debug)]
#[command(name = "mediacard", version)]
struct Cli {
    /// Service configuration JSON. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one card and write the encoded image.
    ///
    /// Needs a title font: pass `--font`, or `--config` with `fonts.title` set.
    Render(RenderArgs),
    /// Print the cache fingerprint of a request.
    Key(RequestArgs),
    /// Remove expired entries from the disk cache.
    PruneCache(PruneArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantChoice {
    /// Opaque WebP with rating badge.
    Rated,
    /// Transparent PNG without badge.
    Plain,
}

impl From<VariantChoice> for Variant {
    fn from(v: VariantChoice) -> Self {
        match v {
            VariantChoice::Rated => Variant::Rated,
            VariantChoice::Plain => Variant::Plain,
        }
    }
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Card layout.
    #[arg(long, value_enum, default_value_t = VariantChoice::Rated)]
    variant: VariantChoice,

    /// Card title.
    #[arg(long)]
    title: String,

    /// Credits line.
    #[arg(long)]
    credits: Option<String>,

    /// Poster image URL.
    #[arg(long)]
    poster: String,

    /// Background image URL.
    #[arg(long)]
    background: Option<String>,

    /// Rating in 0..=10 (rated variant only).
    #[arg(long)]
    rating: Option<f64>,
}

impl RequestArgs {
    fn request(&self) -> anyhow::Result<CardRequest> {
        Ok(CardRequest::new(
            self.title.clone(),
            self.credits.clone(),
            self.poster.clone(),
            self.background.clone(),
            self.rating,
        )?)
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Output path. Defaults to `card.webp` or `card.png` by variant.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Font file for every text role; overrides `fonts.title` from the config.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PruneArgs {
    /// Cache directory; overrides the configured one.
    #[arg(long)]
    dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(config, args),
        Command::Key(args) => cmd_key(args),
        Command::PruneCache(args) => cmd_prune(&config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServiceConfig> {
    match path {
        Some(p) => ServiceConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(ServiceConfig::default()),
    }
}

fn cmd_render(mut config: ServiceConfig, args: RenderArgs) -> anyhow::Result<()> {
    let variant = Variant::from(args.request.variant);
    let request = args.request.request()?;
    if let Some(font) = args.font {
        config.fonts.title = font;
    }
    if config.fonts.title.as_os_str().is_empty() {
        anyhow::bail!("no title font configured; pass --font or set fonts.title in --config");
    }
    let service = config.build_service()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start tokio runtime")?;
    let image = match runtime.block_on(service.build(variant, &request)) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{}", serde_json::to_string(&err.payload())?);
            return Err(err.into());
        }
    };

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("card.{}", image.format.extension())));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &image.bytes).with_context(|| format!("write '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({}, {} bytes)",
        out.display(),
        image.content_type(),
        image.bytes.len()
    );
    Ok(())
}

fn cmd_key(args: RequestArgs) -> anyhow::Result<()> {
    let key = fingerprint(args.variant.into(), &args.request()?);
    println!("{key}");
    println!("{}", key.digest_hex());
    Ok(())
}

fn cmd_prune(config: &ServiceConfig, args: PruneArgs) -> anyhow::Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None if config.cache.kind == CacheKind::Disk => config.cache.dir.clone(),
        None => anyhow::bail!("no disk cache configured; pass --dir"),
    };
    let removed = DiskCache::open(&dir)?.prune()?;
    eprintln!("removed {removed} expired entries from {}", dir.display());
    Ok(())
}
