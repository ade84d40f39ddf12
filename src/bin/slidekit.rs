use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use sha2::Digest as _;
use slidekit::{
    FileSink, FontFace, NamingScheme, PreviewCache, RenderOpts, Session, Story, StoryRequest,
    package::zip::{Compression, read_entries},
    render::preview::DEFAULT_PREVIEW_CAPACITY,
    save_detached,
};

#[derive(Parser, Debug)]
#[command(name = "slidekit", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a story request into a zip archive.
    Render(RenderArgs),
    /// Render one slide of a story request as a PNG.
    Preview(PreviewArgs),
    /// Print the fallback story as JSON.
    Fallback(FallbackArgs),
    /// Print SHA-256 of every slide PNG, from a request or an existing archive.
    Digest(DigestArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input story request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// TTF/OTF file to use instead of the embedded face.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Background decode deadline in milliseconds.
    #[arg(long, default_value_t = 15_000)]
    timeout_ms: u64,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Archive file name; defaults to the request's name or `viral-tiktok-slides.zip`.
    #[arg(long)]
    name: Option<String>,

    /// Render slides in parallel.
    #[arg(long)]
    parallel: bool,

    /// Name entries by slide type instead of position.
    #[arg(long)]
    by_type: bool,

    /// Deflate entries instead of storing them.
    #[arg(long)]
    deflate: bool,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Slide index (0-based).
    #[arg(long)]
    slide: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FallbackArgs {
    /// App name used in the solution and call-to-action slides.
    #[arg(long)]
    app: String,

    /// Hook text.
    #[arg(long)]
    hook: String,
}

#[derive(Args, Debug)]
struct DigestArgs {
    /// Story request JSON to render and hash.
    #[arg(long = "in", conflicts_with = "archive", required_unless_present = "archive")]
    in_path: Option<PathBuf>,

    /// Existing archive to hash.
    #[arg(long)]
    archive: Option<PathBuf>,

    /// TTF/OTF file to use instead of the embedded face.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Preview(args) => cmd_preview(args).await,
        Command::Fallback(args) => cmd_fallback(args),
        Command::Digest(args) => cmd_digest(args).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_font(path: Option<&Path>) -> anyhow::Result<FontFace> {
    match path {
        Some(p) => Ok(FontFace::from_path(p)?),
        None => Ok(FontFace::default()),
    }
}

fn opts_for(common: &CommonArgs) -> anyhow::Result<RenderOpts> {
    Ok(RenderOpts {
        font: load_font(common.font.as_deref())?,
        decode_timeout: Duration::from_millis(common.timeout_ms),
        ..RenderOpts::default()
    })
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let req = StoryRequest::from_path(&args.common.in_path)?;
    let mut opts = opts_for(&args.common)?;
    opts.parallel = args.parallel;
    if args.by_type {
        opts.naming = Some(NamingScheme::ByType);
    }
    if args.deflate {
        opts.compression = Compression::Deflate;
    }
    let session = Session::new(opts);

    let out = session.render(&req).await?;
    let name = args.name.unwrap_or(out.archive_name);

    let saved = save_detached(FileSink::new(&args.out), name.clone(), out.zip)
        .await
        .context("archive save task")?;
    let Some(saved) = saved else {
        anyhow::bail!("failed to save '{name}' into '{}'", args.out.display());
    };

    eprintln!("wrote {} ({} bytes)", saved.location, saved.bytes);
    Ok(())
}

async fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let req = StoryRequest::from_path(&args.common.in_path)?;
    let session = Session::new(opts_for(&args.common)?);
    let mut cache = PreviewCache::new(session.opts().font.clone(), DEFAULT_PREVIEW_CAPACITY)?;
    let png = session.preview(&req, args.slide, &mut cache).await?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_fallback(args: FallbackArgs) -> anyhow::Result<()> {
    let story = Story::fallback(&args.app, &args.hook);
    let json = serde_json::to_string_pretty(&story).context("serialize fallback story")?;
    println!("{json}");
    Ok(())
}

async fn cmd_digest(args: DigestArgs) -> anyhow::Result<()> {
    let entries: Vec<(String, Vec<u8>)> = match (&args.in_path, &args.archive) {
        (_, Some(archive)) => {
            let bytes = std::fs::read(archive)
                .with_context(|| format!("read archive '{}'", archive.display()))?;
            read_entries(&bytes)?
                .into_iter()
                .map(|e| (e.name, e.data))
                .collect()
        }
        (Some(in_path), None) => {
            let req = StoryRequest::from_path(in_path)?;
            let session = Session::new(RenderOpts {
                font: load_font(args.font.as_deref())?,
                ..RenderOpts::default()
            });
            let out = session.render(&req).await?;
            out.archive
                .entries()
                .iter()
                .map(|e| (e.name.clone(), e.png.clone()))
                .collect()
        }
        (None, None) => anyhow::bail!("one of --in or --archive is required"),
    };

    for (name, bytes) in entries {
        println!("{}  {name}", sha256_hex(&bytes));
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
