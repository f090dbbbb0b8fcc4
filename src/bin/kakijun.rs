use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use kakijun::{
    Glyph, GlyphStore, HttpFetcherOpts, HttpGlyphFetcher, PlaybackEvent, PlayerOpts, StrokePlayer,
    SvgSurface,
};

#[derive(Parser, Debug)]
#[command(name = "kakijun", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a character's stroke order, writing one SVG frame per stroke.
    Play(PlayArgs),
    /// Print stroke metadata for a character.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Character to play (exactly one Han or kana character).
    character: String,

    /// Delay between strokes, in milliseconds.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// Base URL of the glyph data endpoint.
    #[arg(long)]
    data_url: Option<String>,

    /// Directory the SVG frames are written to.
    #[arg(long, default_value = "frames")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Character to describe.
    character: String,

    /// Base URL of the glyph data endpoint.
    #[arg(long)]
    data_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Play(args) => cmd_play(args).await,
        Command::Info(args) => cmd_info(args).await,
    }
}

fn build_store(data_url: Option<String>) -> anyhow::Result<Arc<GlyphStore>> {
    let mut opts = HttpFetcherOpts::default();
    if let Some(url) = data_url {
        opts.base_url = url;
    }
    let fetcher = HttpGlyphFetcher::new(opts).context("construct HTTP fetcher")?;
    Ok(Arc::new(GlyphStore::new(Arc::new(fetcher))))
}

async fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let glyph = Glyph::parse(&args.character)?;
    let store = build_store(args.data_url)?;
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;

    let surface = SvgSurface::new();
    let player = StrokePlayer::new(
        store,
        Box::new(surface.clone()),
        PlayerOpts {
            stroke_delay: Duration::from_millis(args.delay_ms),
        },
    );
    let mut events = player.subscribe();

    player.bind(glyph);
    loop {
        match events.recv().await {
            Some(PlaybackEvent::Ready { .. }) => break,
            Some(PlaybackEvent::Error { error, .. }) => return Err(error.into()),
            Some(_) => {}
            None => anyhow::bail!("player went away before readiness"),
        }
    }

    let idle = args.out.join("idle.svg");
    std::fs::write(&idle, surface.document())
        .with_context(|| format!("write '{}'", idle.display()))?;

    let total = player
        .stroke_count()
        .context("ready player has a stroke count")?;
    println!("{glyph}: {total} strokes, playing at {}ms", args.delay_ms);

    player.animate();
    let mut frames = 0usize;
    loop {
        match events.recv().await {
            Some(PlaybackEvent::StrokeDrawn { index, .. }) => {
                let frame = args.out.join(format!("stroke-{:02}.svg", index + 1));
                std::fs::write(&frame, surface.document())
                    .with_context(|| format!("write '{}'", frame.display()))?;
                frames += 1;
            }
            Some(PlaybackEvent::AnimationComplete { .. }) => break,
            Some(_) => {}
            None => anyhow::bail!("player went away mid-animation"),
        }
    }

    println!(
        "wrote idle.svg and {frames} stroke frames to '{}'",
        args.out.display()
    );
    Ok(())
}

async fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let glyph = Glyph::parse(&args.character)?;
    let store = build_store(args.data_url)?;
    let geometry = store
        .resolve(glyph)
        .await
        .with_context(|| format!("resolve '{glyph}'"))?;

    println!(
        "{glyph}: {} strokes ({} in the radical)",
        geometry.stroke_count(),
        geometry.radical_strokes().len()
    );
    Ok(())
}
