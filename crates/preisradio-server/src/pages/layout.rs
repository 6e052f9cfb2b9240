//! HTML document shell and shared fragments.

use preisradio_core::pricing::format_price;
use preisradio_core::{PriceInsight, Product};
use preisradio_seo::schema::to_script_json;
use preisradio_seo::{PageMetadata, SeoContext};
use serde_json::Value;

/// A page ready to be wrapped in the document shell.
#[derive(Debug)]
pub struct Document {
    pub metadata: PageMetadata,
    pub json_ld: Vec<Value>,
    pub body: String,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn meta_tags(meta: &PageMetadata) -> String {
    let mut out = String::new();
    out.push_str(&format!("<title>{}</title>\n", html_escape(&meta.title)));
    out.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        html_escape(&meta.description)
    ));
    if !meta.keywords.is_empty() {
        out.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            html_escape(&meta.keywords.join(", "))
        ));
    }
    if let Some(canonical) = &meta.canonical {
        out.push_str(&format!(
            "<link rel=\"canonical\" href=\"{}\">\n",
            html_escape(canonical)
        ));
    }
    for (lang, href) in &meta.alternates {
        out.push_str(&format!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">\n",
            html_escape(lang),
            html_escape(href)
        ));
    }
    if let Some(og) = &meta.open_graph {
        for (property, content) in [
            ("og:title", &og.title),
            ("og:description", &og.description),
            ("og:url", &og.url),
            ("og:site_name", &og.site_name),
            ("og:locale", &og.locale),
            ("og:type", &og.kind),
        ] {
            out.push_str(&format!(
                "<meta property=\"{property}\" content=\"{}\">\n",
                html_escape(content)
            ));
        }
        for image in &og.images {
            out.push_str(&format!(
                "<meta property=\"og:image\" content=\"{}\">\n",
                html_escape(&image.url)
            ));
            out.push_str(&format!(
                "<meta property=\"og:image:width\" content=\"{}\">\n",
                image.width
            ));
            out.push_str(&format!(
                "<meta property=\"og:image:height\" content=\"{}\">\n",
                image.height
            ));
            out.push_str(&format!(
                "<meta property=\"og:image:alt\" content=\"{}\">\n",
                html_escape(&image.alt)
            ));
        }
    }
    if let Some(twitter) = &meta.twitter {
        out.push_str(&format!(
            "<meta name=\"twitter:card\" content=\"{}\">\n",
            html_escape(&twitter.card)
        ));
        out.push_str(&format!(
            "<meta name=\"twitter:title\" content=\"{}\">\n",
            html_escape(&twitter.title)
        ));
        out.push_str(&format!(
            "<meta name=\"twitter:description\" content=\"{}\">\n",
            html_escape(&twitter.description)
        ));
        for image in &twitter.images {
            out.push_str(&format!(
                "<meta name=\"twitter:image\" content=\"{}\">\n",
                html_escape(image)
            ));
        }
    }
    out
}

pub fn render_document(doc: &Document) -> String {
    let scripts: String = doc
        .json_ld
        .iter()
        .map(|schema| {
            format!(
                "<script type=\"application/ld+json\">{}</script>\n",
                to_script_json(schema)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="de">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="manifest" href="/manifest.webmanifest">
{meta}{scripts}</head>
<body>
<header class="site-header">
  <a href="/" class="logo">Preisradio</a>
  <nav><a href="/kategorien">Kategorien</a> <a href="/marken">Marken</a> <a href="/haendler">Händler</a></nav>
  <form action="/search" method="get" role="search"><input type="search" name="q" placeholder="Produkt suchen"></form>
</header>
<main>
{body}
</main>
<footer class="site-footer">
  <a href="/kontakt">Kontakt</a> <a href="/impressum">Impressum</a> <a href="/datenschutz">Datenschutz</a>
</footer>
<script>if ('serviceWorker' in navigator) {{ navigator.serviceWorker.register('/sw.js'); }}</script>
</body>
</html>
"#,
        meta = meta_tags(&doc.metadata),
        body = doc.body,
    )
}

/// Shown in place of content that failed to load.
pub fn retry_panel(message: &str) -> String {
    format!(
        r#"<section class="load-error" role="alert">
  <p>{}</p>
  <a class="retry" href="">Erneut versuchen</a>
</section>"#,
        html_escape(message)
    )
}

pub fn empty_panel(message: &str) -> String {
    format!(
        r#"<section class="empty"><p>{}</p></section>"#,
        html_escape(message)
    )
}

pub fn product_card(ctx: &SeoContext<'_>, product: &Product) -> String {
    let retailer = ctx.retailer(product.retailer.as_deref());
    let insight = PriceInsight::for_product(product);
    let name = product.display_name();

    let image = product
        .image
        .as_deref()
        .filter(|i| !i.trim().is_empty())
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{}" loading="lazy">"#,
                html_escape(src),
                html_escape(&name)
            )
        })
        .unwrap_or_default();

    let old_price = match (insight.has_discount, product.old_price) {
        (true, Some(old)) => format!(
            r#" <s class="old-price">{} €</s> <span class="badge">-{} %</span>"#,
            format_price(old),
            insight.discount_percent
        ),
        _ => String::new(),
    };

    format!(
        r#"<article class="product-card" data-product-id="{id}">
  <a href="/product/{id}">{image}<h3>{name}</h3></a>
  <p class="price">{price} €{old_price}</p>
  <p class="retailer">{retailer}</p>
</article>
"#,
        id = html_escape(&product.id),
        name = html_escape(&name),
        price = format_price(product.price),
        retailer = html_escape(&retailer.name),
    )
}

pub fn product_grid(ctx: &SeoContext<'_>, products: &[Product]) -> String {
    let cards: String = products.iter().map(|p| product_card(ctx, p)).collect();
    format!("<div class=\"product-grid\">\n{cards}</div>")
}

/// Previous/next links. `base` already carries the query string of the
/// current view, minus `page`.
pub fn pagination(base: &str, page: u32, has_previous: bool, has_next: bool) -> String {
    if !has_previous && !has_next {
        return String::new();
    }
    let link = |target: u32| {
        let sep = if base.contains('?') { '&' } else { '?' };
        html_escape(&format!("{base}{sep}page={target}"))
    };

    let mut out = String::from(r#"<nav class="pagination">"#);
    if has_previous && page > 1 {
        out.push_str(&format!(r#"<a rel="prev" href="{}">Zurück</a>"#, link(page - 1)));
    }
    out.push_str(&format!(r#"<span>Seite {page}</span>"#));
    if has_next {
        out.push_str(&format!(r#"<a rel="next" href="{}">Weiter</a>"#, link(page + 1)));
    }
    out.push_str("</nav>");
    out
}
