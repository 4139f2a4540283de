use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use thumbsmith::{BrandTheme, Style, ThumbnailSpec, render_thumbnail};

#[derive(Parser, Debug)]
#[command(name = "thumbsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a branded thumbnail PNG.
    Render(RenderArgs),
    /// List the available visual styles.
    Styles,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Article title displayed on the thumbnail.
    #[arg(long)]
    title: String,

    /// Primary tag shown as a label.
    #[arg(long)]
    tag: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Visual style.
    #[arg(long, value_enum, default_value_t = StyleChoice::Radar)]
    style: StyleChoice,

    /// Layout seed; identical seeds reproduce identical images.
    #[arg(long)]
    seed: Option<u64>,

    /// Brand theme JSON file (defaults to the stock dark theme).
    #[arg(long)]
    theme: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Radar,
    Waves,
    Scatter,
    Mesh,
}

impl From<StyleChoice> for Style {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Radar => Style::Radar,
            StyleChoice::Waves => Style::Waves,
            StyleChoice::Scatter => Style::Scatter,
            StyleChoice::Mesh => Style::Mesh,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Styles => {
            for style in Style::ALL {
                println!("{}", style.name());
            }
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let theme = match &args.theme {
        Some(path) => BrandTheme::from_json_file(path)
            .with_context(|| format!("load theme '{}'", path.display()))?,
        None => BrandTheme::default(),
    };

    let spec = ThumbnailSpec {
        title: args.title,
        tag: args.tag,
        output_path: args.out,
        seed: args.seed,
        style: args.style.into(),
    };

    let written = render_thumbnail(&spec, &theme)?;
    println!("wrote {}", written.display());
    Ok(())
}
