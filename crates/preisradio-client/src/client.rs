//! HTTP client for the upstream Preisradio product API.
//!
//! Every call is a single attempt: there is no retry, backoff or request
//! deduplication. Non-2xx answers surface as [`ClientError::NotFound`] or
//! [`ClientError::UnexpectedStatus`].

use std::time::Duration;

use futures::future::{join_all, try_join_all};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use preisradio_core::catalog::{interleave, sort_products};
use preisradio_core::{
    AppConfig, CategoryEntry, ContactMessage, ListQuery, Paginated, Product, ProductQuery,
    RetailerRecord,
};
use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// User agent the sitemap generators send upstream.
pub const SITEMAP_USER_AGENT: &str = "Preisradio-SitemapGenerator/1.0";

const DEFAULT_PAGE_SIZE: u32 = 20;
const GTIN_PAGE_SIZE: u32 = 10;

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Raw upstream answer relayed by the API proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for the upstream product API.
///
/// `origin` is the API host (e.g. `https://api.preisradio.de`); typed
/// endpoints live below `{origin}/api/`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    origin: Url,
    base_url: Url,
    timeout_secs: Option<u64>,
}

impl ApiClient {
    /// Creates a client for `origin`.
    ///
    /// `timeout_secs` of `None` keeps reqwest's default of no overall timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidUrl`] if `origin`
    /// is not a valid URL.
    pub fn new(
        origin: &str,
        timeout_secs: Option<u64>,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = build_http_client(timeout_secs, user_agent)?;

        let normalised = format!("{}/", origin.trim_end_matches('/'));
        let origin = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
            url: normalised.clone(),
            reason: e.to_string(),
        })?;
        let base_url = origin.join("api/").map_err(|e| ClientError::InvalidUrl {
            url: normalised,
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            origin,
            base_url,
            timeout_secs,
        })
    }

    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_url, config.api_timeout_secs, &config.user_agent)
    }

    /// Same endpoint, different `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_user_agent(&self, user_agent: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_http_client(self.timeout_secs, user_agent)?,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// One page of products.
    ///
    /// # Errors
    ///
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::NotFound`] on non-2xx.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not a product envelope.
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<Paginated<Product>, ClientError> {
        let url = self.build_url("products/", &query.to_pairs())?;
        self.get_json(url, "products list").await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::list_products`]; an unknown id is [`ClientError::NotFound`].
    pub async fn get_product(&self, id: &str) -> Result<Product, ClientError> {
        let url = self.build_url(&format!("products/{}/", encode_segment(id)), &[])?;
        self.get_json(url, &format!("product {id}")).await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::get_product`].
    pub async fn get_product_by_ean(&self, ean: &str) -> Result<Product, ClientError> {
        let url = self.build_url(&format!("products/{}/by_ean/", encode_segment(ean)), &[])?;
        self.get_json(url, &format!("product by EAN {ean}")).await
    }

    /// Products the upstream considers similar to `id`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::list_products`].
    pub async fn similar_products(&self, id: &str) -> Result<Vec<Product>, ClientError> {
        let url = self.build_url(&format!("products/{}/similar/", encode_segment(id)), &[])?;
        let page: Paginated<Product> = self
            .get_json(url, &format!("similar products for {id}"))
            .await?;
        Ok(page.results)
    }

    /// Offers sharing a GTIN, found through the full-text search.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::list_products`].
    pub async fn products_by_gtin(&self, gtin: &str) -> Result<Paginated<Product>, ClientError> {
        let query = ProductQuery {
            search: Some(gtin.to_string()),
            page_size: Some(GTIN_PAGE_SIZE),
            ..ProductQuery::default()
        };
        self.list_products(&query).await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::list_products`].
    pub async fn categories(
        &self,
        query: &ListQuery,
    ) -> Result<Paginated<CategoryEntry>, ClientError> {
        let url = self.build_url("products/categories/", &query.to_pairs())?;
        self.get_json(url, "categories").await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::list_products`].
    pub async fn brands(&self, query: &ListQuery) -> Result<Paginated<String>, ClientError> {
        let url = self.build_url("products/brands/", &query.to_pairs())?;
        self.get_json(url, "brands").await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::list_products`].
    pub async fn retailers(&self) -> Result<Paginated<RetailerRecord>, ClientError> {
        let url = self.build_url("retailers/", &[])?;
        self.get_json(url, "retailers").await
    }

    /// # Errors
    ///
    /// Same as [`ApiClient::get_product`].
    pub async fn retailer(&self, id: &str) -> Result<RetailerRecord, ClientError> {
        let url = self.build_url(&format!("retailers/{}/", encode_segment(id)), &[])?;
        self.get_json(url, &format!("retailer {id}")).await
    }

    /// Relay a contact form message. Any 2xx counts as delivered.
    ///
    /// # Errors
    ///
    /// [`ClientError::UnexpectedStatus`] on non-2xx, [`ClientError::Http`] on network failure.
    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<(), ClientError> {
        let url = self.build_url("contact/", &[])?;
        tracing::debug!(%url, "POST upstream");
        let response = self.client.post(url.clone()).json(message).send().await?;
        check_status(response.status(), &url)?;
        Ok(())
    }

    /// One page merged from a request per retailer, alternating their rows.
    ///
    /// `count` is the sum over retailers and `next` is set when any retailer
    /// has a further page. The merged rows are re-sorted when `query.sort`
    /// is set. If any leg fails, the page is fetched once without a retailer
    /// filter instead. A query that already names a retailer is passed
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Only the fallback request's error is returned.
    pub async fn products_interleaved(
        &self,
        query: &ProductQuery,
        retailers: &[String],
    ) -> Result<Paginated<Product>, ClientError> {
        if query.retailer.is_some() || retailers.is_empty() {
            return self.list_products(query).await;
        }

        let page = query.current_page();
        let query = ProductQuery {
            page: Some(page),
            page_size: Some(query.page_size.unwrap_or(DEFAULT_PAGE_SIZE)),
            ..query.clone()
        };

        let legs = retailers.iter().map(|retailer| {
            let scoped = query.for_retailer(retailer);
            async move { self.list_products(&scoped).await }
        });

        match try_join_all(legs).await {
            Ok(pages) => {
                let count = pages.iter().map(|p| p.count).sum();
                let has_next = pages.iter().any(|p| p.next.is_some());
                let mut results = interleave(pages.into_iter().map(|p| p.results).collect());
                if let Some(sort) = query.sort {
                    sort_products(&mut results, sort);
                }
                Ok(Paginated {
                    count,
                    next: has_next.then(|| format!("?page={}", page + 1)),
                    previous: (page > 1).then(|| format!("?page={}", page - 1)),
                    results,
                })
            }
            Err(error) => {
                tracing::warn!(error = %error, "per-retailer fetch failed; falling back to unscoped listing");
                self.list_products(&query).await
            }
        }
    }

    /// Rows of `query` for every retailer, fetched concurrently.
    ///
    /// A failing retailer contributes nothing; the failure is logged.
    pub async fn products_per_retailer(
        &self,
        query: &ProductQuery,
        retailers: &[String],
    ) -> Vec<Product> {
        let legs = retailers.iter().map(|retailer| {
            let scoped = query.for_retailer(retailer);
            async move { (retailer, self.list_products(&scoped).await) }
        });

        let mut products = Vec::new();
        for (retailer, outcome) in join_all(legs).await {
            match outcome {
                Ok(page) => products.extend(page.results),
                Err(error) => {
                    tracing::warn!(retailer = %retailer, error = %error, "retailer fetch failed; skipping");
                }
            }
        }
        products
    }

    /// Forward a GET verbatim. `path` is relative to the origin, e.g.
    /// `/api/products/`. Upstream error statuses are returned, not raised.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] on network failure, [`ClientError::InvalidUrl`]
    /// if `path` cannot be joined onto the origin.
    pub async fn forward_get(
        &self,
        path: &str,
        raw_query: Option<&str>,
    ) -> Result<ForwardedResponse, ClientError> {
        let mut url = self
            .origin
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })?;
        url.set_query(raw_query.filter(|q| !q.is_empty()));

        tracing::debug!(%url, "forwarding GET upstream");
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(ForwardedResponse {
            status,
            content_type,
            body,
        })
    }

    fn build_url(&self, path: &str, pairs: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<T, ClientError> {
        tracing::debug!(%url, "GET upstream");
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        check_status(response.status(), &url)?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

fn build_http_client(timeout_secs: Option<u64>, user_agent: &str) -> Result<Client, ClientError> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

fn check_status(status: StatusCode, url: &Url) -> Result<(), ClientError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
