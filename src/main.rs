use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use gutenberg2pdf::{
    BulkSearchOptions, ClientConfig, Gutenberg, SearchOptions, SearchQuery, SearchResult, SortOrder,
    DEFAULT_BASE_URL, DEFAULT_DOWNLOAD_FOLDER,
};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "gutenberg2pdf")]
#[command(about = "Search Project Gutenberg, read book metadata and save books as PDFs")]
#[command(version)]
struct Args {
    /// Report per-operation summaries
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Catalog base URL
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog's bookshelves
    Shelves {
        /// Print each shelf's link next to its title
        #[arg(long = "links")]
        links: bool,
    },
    /// Search one page of results for each query
    Search {
        /// Search terms, at least 3 characters each
        #[arg(required = true)]
        queries: Vec<String>,

        /// One of title, release_date, downloads
        #[arg(short = 's', long = "sort-order", default_value = "")]
        sort_order: String,

        /// Download every book found into the books folder
        #[arg(short = 'd', long = "download")]
        download: bool,

        /// Print results as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Walk every results page, saving each book and its metadata
    BulkSearch {
        /// Search terms, at least 3 characters each
        #[arg(required = true)]
        queries: Vec<String>,

        /// One of title, release_date, downloads
        #[arg(short = 's', long = "sort-order", default_value = "")]
        sort_order: String,

        /// Maximum number of results per query (0 for no limit)
        #[arg(short = 'l', long = "limit", default_value_t = 0)]
        limit: usize,

        /// Print results as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Print the bibliographic metadata of books, e.g. /ebooks/84
    Metadata {
        #[arg(required = true)]
        links: Vec<String>,
    },
    /// Save books as PDF, e.g. /ebooks/84
    Download {
        #[arg(required = true)]
        links: Vec<String>,

        /// Output directory used to save books
        #[arg(short = 'o', long = "out-dir", default_value = DEFAULT_DOWNLOAD_FOLDER)]
        out_dir: String,

        /// Also save each book's metadata.txt
        #[arg(short = 'm', long = "metadata")]
        metadata: bool,
    },
}

fn print_results(results: &[SearchResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }
    for book in results {
        let author = book.author.as_deref().unwrap_or("unknown author");
        match &book.extra {
            Some(extra) => println!("{}  {} by {} ({})", book.link.blue(), book.title.green(), author, extra),
            None => println!("{}  {} by {}", book.link.blue(), book.title.green(), author),
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::new()
        .base_url(args.base_url)
        .verbose(args.verbose);
    let client = Gutenberg::new(config)?;

    match args.command {
        Commands::Shelves { links } => {
            if links {
                for shelf in client.list_bookshelves_with_links().await? {
                    println!("{}  {}", shelf.title.green(), shelf.link.unwrap_or_default().blue());
                }
            } else {
                for title in client.list_bookshelves().await? {
                    println!("{}", title);
                }
            }
        }
        Commands::Search { queries, sort_order, download, json } => {
            let queries = SearchQuery::parse_all(queries)?;
            let options = SearchOptions {
                sort_order: SortOrder::parse_optional(&sort_order)?,
                download,
            };
            let results = client.quick_search_many(&queries, options).await?;
            print_results(&results, json)?;
        }
        Commands::BulkSearch { queries, sort_order, limit, json } => {
            let queries = SearchQuery::parse_all(queries)?;
            let options = BulkSearchOptions {
                sort_order: SortOrder::parse_optional(&sort_order)?,
                limit,
                download: true,
            };
            let results = client.bulk_search_many(&queries, options).await?;
            print_results(&results, json)?;
        }
        Commands::Metadata { links } => {
            for (link, outcome) in links.iter().zip(client.metadata_many(links.as_slice()).await) {
                match outcome {
                    Ok(metadata) => println!("{}", serde_json::to_string_pretty(&metadata)?),
                    Err(e) => warn!("No metadata for {}: {}", link, e),
                }
            }
        }
        Commands::Download { links, out_dir, metadata } => {
            for book in client.download_many(links.as_slice(), &out_dir, metadata).await? {
                info!("Saved {}", book.pdf.display().to_string().blue());
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // chromiumoxide logs every protocol hiccup; keep those quiet.
    let crate_level = if args.verbose { "gutenberg2pdf=debug" } else { "gutenberg2pdf=info" };
    let filter = EnvFilter::from_default_env()
        .add_directive("chromiumoxide::conn=off".parse().unwrap())
        .add_directive("chromiumoxide::handler=off".parse().unwrap())
        .add_directive(crate_level.parse().unwrap());

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if let Err(e) = run(args).await {
        error!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}
