//! `browse`: type a query, see the cheapest matches.
//!
//! Queries run in the background. A new line supersedes the search still in
//! flight, so only answers to the latest query are printed.

use std::sync::Arc;

use preisradio_client::{ApiClient, LatestRequest};
use preisradio_core::pricing::format_price;
use preisradio_core::{Product, ProductQuery, RetailerLookup, SortKey};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::Context;

const QUIT: &str = ":q";

pub(crate) fn browse_query(
    search: &str,
    retailer: Option<&str>,
    sort: Option<SortKey>,
    limit: u32,
) -> ProductQuery {
    ProductQuery {
        search: Some(search.trim().to_string()),
        retailer: retailer.map(str::to_lowercase),
        page_size: Some(limit.max(1)),
        sort,
        ..ProductQuery::default()
    }
}

pub(crate) fn result_line(product: &Product, retailer_name: &str) -> String {
    format!(
        "{:>10} €  {:<12} {}  [{}]",
        format_price(product.price),
        retailer_name,
        product.display_name(),
        product.id
    )
}

/// # Errors
///
/// Returns an error if `sort` is not a known sort key or stdin cannot be read.
pub(crate) async fn run_browse(
    ctx: &Context,
    retailer: Option<String>,
    sort: Option<&str>,
    limit: u32,
) -> anyhow::Result<()> {
    let sort = sort
        .map(str::parse::<SortKey>)
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid --sort: {e}"))?;
    let retailer_ids = Arc::new(ctx.retailers.retailer_ids());
    let names: Arc<Vec<(String, String)>> = Arc::new(
        retailer_ids
            .iter()
            .map(|id| (id.clone(), ctx.retailers.retailer_info(id).name))
            .collect(),
    );
    let latest = Arc::new(LatestRequest::new());

    eprintln!("Suchbegriff eingeben ({QUIT} beendet):");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last: Option<JoinHandle<()>> = None;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line == QUIT {
            latest.cancel();
            break;
        }
        if line.is_empty() {
            continue;
        }

        let query = browse_query(&line, retailer.as_deref(), sort, limit);
        last = Some(spawn_search(
            ctx.api.clone(),
            Arc::clone(&latest),
            Arc::clone(&retailer_ids),
            Arc::clone(&names),
            line,
            query,
        ));
    }

    if let Some(handle) = last {
        handle.await.ok();
    }
    Ok(())
}

fn spawn_search(
    api: ApiClient,
    latest: Arc<LatestRequest>,
    retailer_ids: Arc<Vec<String>>,
    names: Arc<Vec<(String, String)>>,
    search: String,
    query: ProductQuery,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = latest
            .run(async move { api.products_interleaved(&query, &retailer_ids).await })
            .await;

        match outcome {
            None => tracing::debug!(search = %search, "search superseded"),
            Some(Err(error)) => eprintln!("Suche fehlgeschlagen: {error}"),
            Some(Ok(page)) if page.results.is_empty() => {
                println!("Keine Produkte für \"{search}\" gefunden.");
            }
            Some(Ok(page)) => {
                println!("{} Treffer für \"{search}\":", page.count);
                for product in &page.results {
                    let id = product.retailer.as_deref().unwrap_or_default();
                    let name = names
                        .iter()
                        .find(|(known, _)| known.eq_ignore_ascii_case(id))
                        .map_or(id, |(_, name)| name.as_str());
                    println!("{}", result_line(product, name));
                }
            }
        }
    })
}
