//! xscrape CLI - read-only Twitter/X scraping.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use xscrape::auth::{BrowserAuth, Session};
use xscrape::config::ScrapeOptions;
use xscrape::output;
use xscrape::page::{BrowserHandle, ChromiumPage};
use xscrape::scrape::{scrape_bookmarks, scrape_search, SearchFilter};

/// xscrape - scrape Twitter/X bookmarks and search results.
#[derive(Parser)]
#[command(name = "xscrape")]
#[command(about = "Read-only Twitter/X scraper")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Session file with auth cookies
    #[arg(long, global = true, default_value = ".twitter-session.json")]
    session: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape your bookmarks
    Bookmarks {
        /// Max bookmarks to fetch
        #[arg(long, default_value = "50")]
        count: usize,

        /// Max scroll iterations
        #[arg(long, default_value = "20")]
        max_scrolls: usize,

        /// Skip following quoted tweets for links
        #[arg(long)]
        no_quotes: bool,

        /// Skip following author threads for links
        #[arg(long)]
        no_threads: bool,

        /// Table output instead of JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Search tweets
    Search {
        /// Search query
        query: String,

        /// Max tweets to fetch
        #[arg(long, default_value = "50")]
        count: usize,

        /// Max scroll iterations
        #[arg(long, default_value = "20")]
        max_scrolls: usize,

        /// Result ordering: top or latest
        #[arg(long, default_value = "top")]
        filter: String,

        /// Skip following quoted tweets for links
        #[arg(long)]
        no_quotes: bool,

        /// Skip following author threads for links
        #[arg(long)]
        no_threads: bool,

        /// Table output instead of JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Manage X authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Interactive headed browser login; saves session cookies
    Save,
    /// Verify the saved session is still valid
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("xscrape=debug,info")
    } else {
        EnvFilter::new("xscrape=warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Bookmarks {
            count,
            max_scrolls,
            no_quotes,
            no_threads,
            pretty,
        } => {
            let options = ScrapeOptions {
                count,
                max_scrolls,
                follow_quotes: !no_quotes,
                follow_threads: !no_threads,
            };
            run_bookmarks(&cli.session, &options, pretty).await
        }
        Commands::Search {
            query,
            count,
            max_scrolls,
            filter,
            no_quotes,
            no_threads,
            pretty,
        } => {
            let filter = SearchFilter::parse(&filter)
                .ok_or_else(|| anyhow::anyhow!("Unknown filter: {filter} (use top or latest)"))?;
            let options = ScrapeOptions {
                count,
                max_scrolls,
                follow_quotes: !no_quotes,
                follow_threads: !no_threads,
            };
            run_search(&cli.session, &query, filter, &options, pretty).await
        }
        Commands::Auth { command } => match command {
            AuthCommands::Save => run_auth_save(&cli.session).await,
            AuthCommands::Check => run_auth_check(&cli.session).await,
        },
    }
}

/// Launch a headless browser with the saved session cookies injected.
async fn open_authenticated_page(
    session_path: &std::path::Path,
) -> Result<(BrowserHandle, ChromiumPage)> {
    let session = Session::load_or_env(session_path)?;
    let (handle, page) = BrowserHandle::launch(true).await?;
    page.authenticate(&session).await?;
    Ok((handle, page))
}

/// Close the browser, logging rather than failing on cleanup errors.
async fn close_browser(handle: BrowserHandle) {
    if let Err(e) = handle.close().await {
        tracing::warn!(error = %e, "Failed to close browser cleanly");
    }
}

async fn run_bookmarks(
    session_path: &std::path::Path,
    options: &ScrapeOptions,
    pretty: bool,
) -> Result<()> {
    let (handle, page) = open_authenticated_page(session_path).await?;
    let result = scrape_bookmarks(&page, options).await;
    close_browser(handle).await;
    let result = result?;

    if pretty {
        output::print_bookmarks_table(&result);
    } else {
        println!("{}", output::bookmarks_json(&result)?);
    }
    Ok(())
}

async fn run_search(
    session_path: &std::path::Path,
    query: &str,
    filter: SearchFilter,
    options: &ScrapeOptions,
    pretty: bool,
) -> Result<()> {
    let (handle, page) = open_authenticated_page(session_path).await?;
    let result = scrape_search(&page, query, filter, options).await;
    close_browser(handle).await;
    let result = result?;

    if pretty {
        output::print_search_table(&result);
    } else {
        println!("{}", output::search_json(&result)?);
    }
    Ok(())
}

async fn run_auth_save(session_path: &std::path::Path) -> Result<()> {
    println!("Twitter/X authentication setup\n");

    let auth = BrowserAuth::new(false);
    let session = auth.login().await?;
    session.save(session_path)?;

    println!("Session saved to: {}", session_path.display());
    Ok(())
}

async fn run_auth_check(session_path: &std::path::Path) -> Result<()> {
    let mut session = Session::load_or_env(session_path)?;

    let auth = BrowserAuth::new(true);
    if auth.validate_session(&session).await? {
        session.mark_validated();
        if session_path.exists() {
            session.save(session_path)?;
        }
        println!("Auth is valid.");
        Ok(())
    } else {
        println!("Auth is expired or missing. Run: xscrape auth save");
        std::process::exit(1);
    }
}
