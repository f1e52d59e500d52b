use agl_site::{config, content, generate, output, sitemap, validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter, e.g. `agl_site=debug`.
const LOG_ENV: &str = "AGL_SITE_LOG";

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "agl-site")]
#[command(about = "Static site generator for the AGL Consulting website")]
#[command(long_about = "\
Static site generator for the AGL Consulting website

Every record is a Markdown file with a YAML front-matter header. The file
name (without .md) is the record's id and URL segment.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── public/                      # Copied verbatim to the output root
  ├── blog/my-first-post.md        # title, date, excerpt
  ├── projects/recall-kit.md       # title, date, description, features, links
  ├── products/mvp-development.md  # ... plus type (mobile-app | consulting), price
  ├── releases/recall-kit-2-0.md   # title, date, description
  ├── policies/terms-of-service.md # Markdown only, no header
  ├── partners/acme-hosting.md     # title, description, logo, url, order
  └── pages/about.md               # title, description

Listings are newest first. Products named everything-else always sort last.

Run 'agl-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Absolute origin of the published site, e.g. https://example.com
    #[arg(long, env = config::BASE_URL_ENV, global = true)]
    base_url: Option<String>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content and write the complete site
    Build,
    /// Load and list all content without writing anything
    Check,
    /// Print the sitemap entries
    Sitemap,
    /// Validate every JSON-LD object the site would emit
    Validate,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = load_site_config(&cli)?;
            println!("==> Loading {}", cli.source.display());
            let site = content::SiteContent::load(&cli.source)?;
            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let report = generate::generate_site(&site_config, &site, &cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            load_site_config(&cli)?;
            println!("==> Checking {}", cli.source.display());
            let site = content::SiteContent::load(&cli.source)?;
            output::print_content_output(&site, &cli.source);
            println!("==> Content is valid");
        }
        Command::Sitemap => {
            let site_config = load_site_config(&cli)?;
            let entries = sitemap::load_sitemap(&site_config, &cli.source)?;
            output::print_sitemap_output(&entries);
        }
        Command::Validate => {
            let site_config = load_site_config(&cli)?;
            let report = validate::validate_root(&site_config, &cli.source)?;
            output::print_validation_output(&report);
            if !report.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_site_config(cli: &Cli) -> Result<config::SiteConfig, config::ConfigError> {
    let site_config = config::load_config(&cli.source, cli.base_url.as_deref())?;
    tracing::debug!(base_url = %site_config.base_url, "resolved config");
    Ok(site_config)
}

/// Logs go to stderr so command output stays pipeable.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
