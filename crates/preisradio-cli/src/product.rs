//! `product`: the SEO documents a product page would embed.

use preisradio_core::Product;
use preisradio_seo::metadata::product_metadata;
use preisradio_seo::schema::{product_breadcrumb, product_faq_schema, product_schema};
use preisradio_seo::SeoContext;
use serde_json::{json, Value};

use crate::{Context, ProductOutput};

/// Fetch `id` and print its documents as pretty JSON.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched.
pub(crate) async fn run_product(ctx: &Context, id: &str, output: ProductOutput) -> anyhow::Result<()> {
    let product = ctx.api.get_product(id).await?;
    let seo = SeoContext::new(&ctx.site, &ctx.retailers);
    let report = product_report(&seo, &product, output);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn product_report(seo: &SeoContext<'_>, product: &Product, output: ProductOutput) -> Value {
    let schemas = || {
        json!([
            product_schema(seo, product),
            product_breadcrumb(seo.site, product),
            product_faq_schema(seo, product),
        ])
    };
    match output {
        ProductOutput::Metadata => json!({ "metadata": product_metadata::<()>(seo, Ok(product)) }),
        ProductOutput::Schema => json!({ "jsonLd": schemas() }),
        ProductOutput::All => json!({
            "metadata": product_metadata::<()>(seo, Ok(product)),
            "jsonLd": schemas(),
        }),
    }
}
