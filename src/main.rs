use clap::{Parser, Subcommand};
use genai_gallery::config::{self, GalleryConfig};
use genai_gallery::gallery::Gallery;
use genai_gallery::imaging::OutputFormat;
use genai_gallery::output;
use genai_gallery::reveal::{NoopRevealer, Revealer, SystemRevealer};
use genai_gallery::scan::SortOrder;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "genai-gallery")]
#[command(about = "Browse, preview, and prune a directory of generated images")]
#[command(long_about = "\
Browse, preview, and prune a directory of generated images

The gallery root is a directory of image outputs, optionally with a JSON
sidecar per image holding generation metadata. Every path given to a command
is relative to the root and may not leave it.

Gallery structure:

  outputs/
  ├── gallery.toml                 # Optional config (see gen-config)
  ├── 1730000000-fox.png           # Image
  ├── 1730000000-fox.json          # Sidecar: prompt, guidance, steps, seed
  └── portraits/
      └── owl.jpg                  # Subdirectories are walked too

Run 'genai-gallery gen-config' to generate a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Gallery root directory
    #[arg(long, short = 'd', default_value = ".", global = true)]
    directory: PathBuf,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    /// Maximum number of files read per listing
    #[arg(long, short = 'l', global = true)]
    load_limit: Option<usize>,

    /// Default preview width in pixels (0 disables resizing)
    #[arg(long, short = 'w', global = true)]
    resize_max_width: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List images, newest first by default
    List {
        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        order: SortOrder,
    },
    /// Count every image below the root, ignoring the load limit
    Count,
    /// Print a preview of one image as a data URI
    Render {
        /// Image path relative to the root
        path: PathBuf,
        /// Preview encoding (PNG, JPEG, WEBP, AVIF, TIFF)
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Preview width for this request
        #[arg(long)]
        width: Option<u32>,
    },
    /// Show preview dimensions and generation metadata for one image
    Preview {
        /// Image path relative to the root
        path: PathBuf,
        /// Preview width for this request
        #[arg(long)]
        width: Option<u32>,
    },
    /// Delete an image and its sidecar files
    Delete {
        /// Image path relative to the root
        path: PathBuf,
    },
    /// Show an image in the desktop file manager
    Reveal {
        /// Image path relative to the root
        path: PathBuf,
        /// Never launch a file manager (headless hosts)
        #[arg(long)]
        no_desktop: bool,
    },
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        directory,
        debug,
        load_limit,
        resize_max_width,
        command,
    } = Cli::parse();

    let filter = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let open = || -> Result<Gallery, Box<dyn std::error::Error>> {
        let config = load_config(&directory, load_limit, resize_max_width)?;
        Ok(Gallery::new(&directory, config)?)
    };

    match command {
        Command::List { order } => {
            let gallery = open()?;
            let listing = gallery.listing(order);
            let total = gallery.count()?;
            output::print_listing(&listing, Some(total));
        }
        Command::Count => {
            println!("{}", open()?.count()?);
        }
        Command::Render {
            path,
            format,
            width,
        } => {
            let gallery = open()?;
            let preview = gallery.preview_config(width, format);
            let result = gallery.render_with(&path, &preview)?;
            println!("{}", result.data_uri());
        }
        Command::Preview { path, width } => {
            let preview = open()?.preview(&path, width)?;
            output::print_preview(&preview);
        }
        Command::Delete { path } => {
            let gallery = open()?;
            let outcome = gallery.delete(&path)?;
            let remaining = gallery.count()?;
            output::print_delete(&outcome, Some(remaining));
        }
        Command::Reveal { path, no_desktop } => {
            let revealer: &dyn Revealer = if no_desktop {
                &NoopRevealer
            } else {
                &SystemRevealer
            };
            let outcome = open()?.reveal(revealer, &path)?;
            output::print_reveal(&outcome);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `gallery.toml` from the root, then apply command-line overrides.
fn load_config(
    dir: &Path,
    load_limit: Option<usize>,
    resize_max_width: Option<u32>,
) -> Result<GalleryConfig, config::ConfigError> {
    let mut config = config::load_config(dir)?;
    if let Some(limit) = load_limit {
        config.enumeration_limit = limit;
    }
    if let Some(width) = resize_max_width {
        config.default_max_width = width;
    }
    Ok(config)
}
