//! papershelf CLI - scan a site's image folders and resolve paper details
//!
//! Usage: papershelf [--base-url URL] <COMMAND>
//!
//! Supports JSON output for scripting.

use clap::{Parser, Subcommand};
use papershelf::{
    load_page, AssetScanner, DetailDatabase, FileStore, ImageKind, PageSession,
    PaperDetailResolver,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "papershelf", about = "Asset discovery and detail resolution for a static paper site")]
struct Cli {
    /// Base URL of the site
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the image folders and print the discovered index
    Scan,
    /// Resolve one paper's detail record
    Detail {
        /// Paper id
        id: String,
        /// Path to the JSON-file fallback store
        #[arg(long)]
        store: Option<PathBuf>,
        /// Path to the SQLite fallback database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Assemble the full detail page for one paper
    Page {
        /// Paper id
        id: String,
        /// Show the page as a logged-in editor would see it
        #[arg(long)]
        logged_in: bool,
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Default store location when --store is not given and the file exists
fn default_store_path() -> Option<PathBuf> {
    let path = dirs::data_dir()?.join("papershelf").join("paperDetails.json");
    path.exists().then_some(path)
}

fn build_resolver(
    base_url: &str,
    store: Option<PathBuf>,
    db: Option<PathBuf>,
) -> Result<PaperDetailResolver, String> {
    let mut resolver = PaperDetailResolver::new(base_url)?;
    if let Some(path) = store.or_else(default_store_path) {
        resolver = resolver.with_store(FileStore::new(path));
    }
    if let Some(path) = db {
        resolver = resolver.with_database(DetailDatabase::new(path)?);
    }
    Ok(resolver)
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Scan => {
            let scanner = AssetScanner::new(&cli.base_url)?;
            let index = scanner.scan().await;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&index).map_err(|e| e.to_string())?
                );
            } else {
                let mut keys: Vec<_> = index.keys().collect();
                keys.sort();
                for key in keys {
                    println!("{} ({} images)", key, index[key].len());
                    for url in &index[key] {
                        println!("  {}", url);
                    }
                }
                for kind in [ImageKind::Homepage, ImageKind::Key] {
                    println!(
                        "common {}: {} image(s)",
                        kind,
                        scanner.get_common_images(kind).len()
                    );
                }
            }
        }
        Command::Detail { id, store, db } => {
            let resolver = build_resolver(&cli.base_url, store, db)?;
            let detail = resolver.resolve_details(&id).await;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&detail).map_err(|e| e.to_string())?
                );
            } else {
                println!("background: {}", detail.background_content);
                println!("main:       {}", detail.main_content);
                println!("conclusion: {}", detail.conclusion_content);
                println!("link:       {}", detail.link_content);
                println!("homepage images: {}", detail.homepage_images.len());
                println!("key images:      {}", detail.key_images.len());
            }
        }
        Command::Page {
            id,
            logged_in,
            store,
            db,
        } => {
            let resolver = build_resolver(&cli.base_url, store, db)?;
            let scanner = AssetScanner::new(&cli.base_url)?;
            scanner.scan().await;
            let session = PageSession::new(&id, logged_in);
            let (content, notifications) = load_page(&resolver, Some(&scanner), &session).await;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&content).map_err(|e| e.to_string())?
                );
            } else {
                println!("# {}", content.title);
                println!("{} | {} | {}", content.journal, content.time, content.authors);
                println!("\n[background]\n{}", content.background_html);
                println!("\n[main]\n{}", content.main_html);
                println!("\n[conclusion]\n{}", content.conclusion_html);
                println!("\n[link]\n{}", content.link_html);
                println!("\n[homepage images]\n{}", content.homepage_images_html);
                println!("\n[key images]\n{}", content.key_images_html);
                println!("\nediting controls: {}", session.editing_enabled());
            }
            for n in notifications {
                eprintln!("[Page] {:?}: {}", n.level, n.message);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
