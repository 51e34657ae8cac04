//! Command-line front end over the in-memory catalog.
//!
//! The catalog is read from a JSON file into an [`InMemoryCatalogRepository`];
//! image commands write the updated catalog back to the same file and keep
//! image files in an [`FsBlobStore`] directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};

use storefront_catalog::{CatalogBrowser, CatalogStore, FilterCriteria, PriceRange, ProductSource, SortMode};
use storefront_core::{CategoryId, ImageId, ProductId};
use storefront_infra::{FsBlobStore, InMemoryCatalogRepository, StorefrontConfig};
use storefront_media::{MediaList, MediaOrderingManager};

#[derive(Debug, Parser)]
#[command(name = "storefront")]
#[command(about = "Browse a product catalog and manage product images", long_about = None)]
pub struct Cli {
    /// Catalog JSON file (defaults to STOREFRONT_CATALOG_PATH)
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print one page of filtered, sorted products
    Browse(BrowseArgs),

    /// Move a persisted image and save the new order
    Reorder {
        #[arg(long)]
        product: ProductId,
        from: usize,
        to: usize,
    },

    /// Upload image files and append them to a product
    Upload {
        #[arg(long)]
        product: ProductId,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete an image record and its stored file
    Remove {
        #[arg(long)]
        product: ProductId,
        image: ImageId,
    },
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct BrowseArgs {
    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// recommended, price-asc, price-desc or newest
    #[arg(short, long)]
    pub sort: Option<SortMode>,

    /// Restrict to a category (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<CategoryId>,

    #[arg(long)]
    pub min_price: Option<u64>,

    #[arg(long)]
    pub max_price: Option<u64>,

    /// Only in-stock products
    #[arg(long)]
    pub in_stock: bool,

    /// Only pre-order products
    #[arg(long)]
    pub pre_order: bool,

    /// Overrides STOREFRONT_PAGE_SIZE
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl BrowseArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::new();
        for category in &self.categories {
            criteria = criteria.with_category(*category);
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            criteria = criteria.with_price(PriceRange::new(self.min_price.unwrap_or(0), self.max_price)?);
        }
        if self.in_stock {
            criteria = criteria.in_stock_only();
        }
        if self.pre_order {
            criteria = criteria.pre_order_only();
        }
        Ok(criteria)
    }
}

/// Result of one command.
#[derive(Debug)]
pub struct Outcome {
    pub output: Value,
    /// The catalog changed and should be written back.
    pub catalog_changed: bool,
}

/// Resolve the catalog file from the flag or the configuration.
pub fn catalog_path(cli: &Cli, config: &StorefrontConfig) -> Result<PathBuf> {
    match &cli.catalog {
        Some(path) => Ok(path.clone()),
        None => Ok(config.require_catalog_path()?.to_path_buf()),
    }
}

/// Image store for the catalog at `catalog`.
pub fn blob_store(config: &StorefrontConfig, catalog: &Path) -> FsBlobStore {
    FsBlobStore::new(config.image_dir_for(catalog), config.image_base_url.clone())
}

pub fn load_catalog(path: &Path) -> Result<InMemoryCatalogRepository> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let repo = InMemoryCatalogRepository::from_json(&raw).with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(repo)
}

pub async fn save_catalog(repo: &InMemoryCatalogRepository, path: &Path) -> Result<()> {
    let products = repo.list_products().await?;
    let json = serde_json::to_string_pretty(&products)?;
    std::fs::write(path, json).with_context(|| format!("writing catalog {}", path.display()))?;
    tracing::info!(path = %path.display(), products = products.len(), "catalog saved");
    Ok(())
}

pub async fn execute(
    command: &Command,
    repo: Arc<InMemoryCatalogRepository>,
    blobs: &FsBlobStore,
    config: &StorefrontConfig,
) -> Result<Outcome> {
    match command {
        Command::Browse(args) => browse(args, repo.as_ref(), config).await,
        Command::Reorder { product, from, to } => {
            let mut manager = media_session(repo, blobs, *product).await?;
            manager.reorder(MediaList::Persisted, *from, *to)?;
            let outcome = manager.commit_persisted_reorder().await?;
            Ok(Outcome {
                output: json!({ "result": outcome, "images": manager.persisted() }),
                catalog_changed: true,
            })
        }
        Command::Upload { product, files } => {
            let mut manager = media_session(repo, blobs, *product).await?;
            for file in files {
                let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                manager.attach(name, content_type_for(file), bytes);
            }
            let report = manager.commit_pending_upload(*product).await?;
            let failures: Vec<Value> = report
                .failures
                .iter()
                .map(|f| json!({ "index": f.index, "file_name": f.file_name, "error": f.error.to_string() }))
                .collect();
            Ok(Outcome {
                catalog_changed: !report.inserted.is_empty(),
                output: json!({ "inserted": report.inserted, "failures": failures }),
            })
        }
        Command::Remove { product, image } => {
            let mut manager = media_session(repo, blobs, *product).await?;
            let report = manager.remove(*image).await?;
            Ok(Outcome {
                output: json!({ "removed": report.image, "blob_removed": report.blob_removed }),
                catalog_changed: true,
            })
        }
    }
}

async fn browse(args: &BrowseArgs, repo: &InMemoryCatalogRepository, config: &StorefrontConfig) -> Result<Outcome> {
    let mut browser = CatalogBrowser::new(CatalogStore::new(), args.page_size.unwrap_or(config.page_size))?;
    browser.reload(repo).await?;
    browser.set_criteria(args.criteria()?);
    browser.set_sort(args.sort.unwrap_or(config.default_sort));
    if !browser.go_to_page(args.page) {
        tracing::warn!(requested = args.page, total_pages = browser.total_pages(), "page out of range; showing page 1");
    }
    Ok(Outcome {
        output: serde_json::to_value(browser.snapshot())?,
        catalog_changed: false,
    })
}

type Session = MediaOrderingManager<Arc<InMemoryCatalogRepository>, FsBlobStore>;

async fn media_session(repo: Arc<InMemoryCatalogRepository>, blobs: &FsBlobStore, product: ProductId) -> Result<Session> {
    let mut manager = MediaOrderingManager::new(repo, blobs.clone());
    manager.load(product).await?;
    Ok(manager)
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
