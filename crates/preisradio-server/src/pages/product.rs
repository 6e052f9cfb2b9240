use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};
use preisradio_client::ClientError;
use preisradio_core::catalog::cheapest_per_retailer;
use preisradio_core::pricing::format_price;
use preisradio_core::{slugify, PriceInsight, Product};
use preisradio_seo::metadata::product_metadata;
use preisradio_seo::schema::{product_breadcrumb, product_faq_schema, product_schema};
use preisradio_seo::SeoContext;

use super::layout::{html_escape, product_grid, retry_panel, Document};
use super::{serve_cached, Rendered};
use crate::api::AppState;

const SIMILAR_LIMIT: usize = 8;

pub(super) async fn product_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    serve_cached(&state, Some(uri.path().to_string()), || render_product(&state, &id)).await
}

async fn render_product(state: &AppState, id: &str) -> Rendered {
    let ctx = state.seo();
    let product = match state.api.get_product(id).await {
        Ok(product) => product,
        Err(error) => return product_unavailable(&ctx, &error),
    };

    let gtin = product.non_empty_gtin().map(str::to_string);
    let (similar, offers) = tokio::join!(state.api.similar_products(&product.id), async {
        match gtin.as_deref() {
            Some(gtin) => Some(state.api.products_by_gtin(gtin).await),
            None => None,
        }
    });

    let mut complete = true;
    let mut body = product_detail(&ctx, &product);

    match offers {
        Some(Ok(page)) => body.push_str(&price_comparison(&ctx, &product, &page.results)),
        Some(Err(error)) => {
            tracing::warn!(product = %product.id, error = %error, "price comparison unavailable");
            complete = false;
        }
        None => {}
    }

    match similar {
        Ok(mut similar) => {
            similar.retain(|p| p.id != product.id);
            similar.truncate(SIMILAR_LIMIT);
            if !similar.is_empty() {
                body.push_str("<section class=\"similar\"><h2>Ähnliche Produkte</h2>\n");
                body.push_str(&product_grid(&ctx, &similar));
                body.push_str("</section>\n");
            }
        }
        Err(error) => {
            tracing::warn!(product = %product.id, error = %error, "similar products unavailable");
            complete = false;
        }
    }

    let document = Document {
        metadata: product_metadata::<()>(&ctx, Ok(&product)),
        json_ld: vec![
            product_schema(&ctx, &product),
            product_breadcrumb(&state.site, &product),
            product_faq_schema(&ctx, &product),
        ],
        body,
    };
    if complete {
        Rendered::ok(document)
    } else {
        Rendered::degraded(document)
    }
}

fn product_unavailable(ctx: &SeoContext<'_>, error: &ClientError) -> Rendered {
    let metadata = product_metadata(ctx, Err(error));
    if error.is_not_found() {
        return Rendered::not_found(Document {
            metadata,
            json_ld: Vec::new(),
            body: "<section class=\"empty\"><h1>Produkt nicht gefunden</h1><a href=\"/search\">Zur Suche</a></section>".to_string(),
        });
    }
    tracing::warn!(error = %error, "product unavailable");
    Rendered::degraded(Document {
        metadata,
        json_ld: Vec::new(),
        body: retry_panel("Das Produkt konnte nicht geladen werden."),
    })
}

fn product_detail(ctx: &SeoContext<'_>, product: &Product) -> String {
    let retailer = ctx.retailer(product.retailer.as_deref());
    let insight = PriceInsight::for_product(product);
    let name = product.display_name();
    let mut out = String::new();

    let category = product.category.trim();
    out.push_str(&format!(
        "<nav class=\"breadcrumbs\"><a href=\"/\">Startseite</a> › "
    ));
    if category.is_empty() {
        out.push_str("<a href=\"/search\">Produkte</a>");
    } else {
        out.push_str(&format!(
            "<a href=\"/kategorien/{}\">{}</a>",
            html_escape(&slugify(category)),
            html_escape(category)
        ));
    }
    out.push_str(&format!(" › <span>{}</span></nav>\n", html_escape(&product.title)));

    out.push_str("<article class=\"product-detail\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", html_escape(&name)));
    if let Some(image) = product.image.as_deref().filter(|i| !i.trim().is_empty()) {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            html_escape(image),
            html_escape(&name)
        ));
    }
    out.push_str(&format!(
        "<p class=\"price\">{} €",
        format_price(product.price)
    ));
    if let (true, Some(old)) = (insight.has_discount, product.old_price) {
        out.push_str(&format!(
            " <s>{} €</s> <span class=\"badge\">Sie sparen {} € ({} %)</span>",
            format_price(old),
            format_price(insight.discount_amount),
            insight.discount_percent
        ));
    }
    out.push_str("</p>\n");
    if !product.url.trim().is_empty() {
        out.push_str(&format!(
            "<a class=\"offer-link\" href=\"{}\" rel=\"nofollow sponsored noopener\" target=\"_blank\">Zum Angebot bei {}</a>\n",
            html_escape(&product.url),
            html_escape(&retailer.name)
        ));
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!(
            "<section class=\"description\"><h2>Beschreibung</h2><p>{}</p></section>\n",
            html_escape(description)
        ));
    }
    out.push_str("</article>\n");
    out
}

/// Offers for the same GTIN, cheapest per retailer. Empty unless at least
/// two retailers carry the product.
fn price_comparison(ctx: &SeoContext<'_>, product: &Product, offers: &[Product]) -> String {
    let mut all = offers.to_vec();
    if !all.iter().any(|o| o.id == product.id) {
        all.push(product.clone());
    }
    let cheapest = cheapest_per_retailer(&all);
    if cheapest.is_empty() {
        return String::new();
    }

    let mut rows = String::new();
    for offer in &cheapest {
        let retailer = ctx.retailer(offer.retailer.as_deref());
        let current = if offer.id == product.id {
            " class=\"current\""
        } else {
            ""
        };
        rows.push_str(&format!(
            "<tr{current}><td>{}</td><td>{} €</td><td><a href=\"/product/{}\">Details</a></td></tr>\n",
            html_escape(&retailer.name),
            format_price(offer.price),
            html_escape(&offer.id)
        ));
    }
    format!(
        "<section class=\"price-comparison\"><h2>Preisvergleich</h2>\n<table>\n{rows}</table></section>\n"
    )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use preisradio_core::{RetailerDirectory, SiteConfig};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::test_support::{body_text, get, test_app, test_config};

    fn galaxy_json() -> serde_json::Value {
        json!({
            "id": "42",
            "title": "Galaxy S21",
            "brand": "Samsung",
            "category": "Smartphones",
            "price": 699,
            "old_price": 899,
            "gtin": "8806090000001",
            "retailer": "saturn",
            "url": "https://www.saturn.de/de/product/42.html",
        })
    }

    fn offer(id: &str, retailer: &str, price: f64) -> Product {
        serde_json::from_value(json!({
            "id": id, "title": "Galaxy S21", "price": price, "retailer": retailer,
        }))
        .unwrap()
    }

    #[test]
    fn comparison_needs_two_retailers() {
        let site = SiteConfig::new("https://preisradio.de");
        let retailers = RetailerDirectory::builtin();
        let ctx = SeoContext::new(&site, &retailers);
        let product = offer("1", "saturn", 699.0);

        assert_eq!(price_comparison(&ctx, &product, &[]), "");

        let html = price_comparison(
            &ctx,
            &product,
            &[offer("2", "otto", 649.0), offer("3", "otto", 679.0)],
        );
        assert_eq!(html.matches("<tr").count(), 2);
        let otto = html.find("Otto").unwrap();
        let saturn = html.find("Saturn").unwrap();
        assert!(otto < saturn, "cheapest offer first");
    }

    #[tokio::test]
    async fn product_page_embeds_schemas_and_comparison() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/42/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(galaxy_json()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products/42/similar/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "results": [
                    {"id": "43", "title": "Galaxy S22", "brand": "Samsung", "price": 799, "retailer": "otto"},
                ],
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products/"))
            .and(query_param("search", "8806090000001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "results": [
                    galaxy_json(),
                    {"id": "77", "title": "Galaxy S21", "price": 679, "retailer": "mediamarkt"},
                ],
            })))
            .mount(&server)
            .await;

        let app = test_app(test_config(&server.uri()));
        let response = app.oneshot(get("/product/42")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("<title>Samsung Galaxy S21 – 699€</title>"));
        assert!(html.contains("\"@type\":\"Product\""));
        assert!(html.contains("\"@type\":\"BreadcrumbList\""));
        assert!(html.contains("\"@type\":\"FAQPage\""));
        assert!(html.contains("Preisvergleich</h2>"));
        assert!(html.contains("MediaMarkt"));
        assert!(html.contains("Ähnliche Produkte"));
        assert!(html.contains("/product/43"));
    }

    #[tokio::test]
    async fn missing_product_is_404_with_fallback_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products/999/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let app = test_app(test_config(&server.uri()));
        let response = app.oneshot(get("/product/999")).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response)
            .await
            .contains("<title>Produkt | Preisradio</title>"));
    }

    #[tokio::test]
    async fn upstream_failure_renders_retry_panel() {
        let app = test_app(test_config("http://127.0.0.1:9"));
        let response = app.oneshot(get("/product/42")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Erneut versuchen"));
        assert!(html.contains("<title>Produkt | Preisradio</title>"));
    }
}
