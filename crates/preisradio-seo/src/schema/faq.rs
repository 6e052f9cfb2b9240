use preisradio_core::pricing::format_price;
use preisradio_core::{PriceInsight, Product};
use serde_json::{json, Value};

use super::SCHEMA_CONTEXT;
use crate::context::SeoContext;

const SITE_FAQ: [(&str, &str); 4] = [
    (
        "Was ist Preisradio?",
        "Preisradio ist ein kostenloser Preisvergleich für Elektronik. Wir vergleichen die Preise von Saturn, MediaMarkt, Otto und Kaufland.",
    ),
    (
        "Wie finde ich das beste Angebot?",
        "Suchen Sie nach einem Produkt oder stöbern Sie in Kategorien und Marken. Die Angebote lassen sich nach Preis, Händler und Rabatt filtern.",
    ),
    (
        "Wie aktuell sind die Preise?",
        "Die Preise werden regelmäßig bei den Händlern abgefragt. Maßgeblich ist immer der Preis im Shop des Händlers.",
    ),
    (
        "Kostet die Nutzung von Preisradio etwas?",
        "Nein. Preisradio ist für Sie kostenlos, Sie kaufen direkt beim jeweiligen Händler.",
    ),
];

/// Static site-wide FAQ.
#[must_use]
pub fn site_faq_schema() -> Value {
    faq_page(
        SITE_FAQ
            .iter()
            .map(|(q, a)| ((*q).to_string(), (*a).to_string())),
    )
}

/// FAQ about where to buy a product and whether it is discounted.
#[must_use]
pub fn product_faq_schema(ctx: &SeoContext<'_>, product: &Product) -> Value {
    let name = product.display_name();
    let retailer = ctx.retailer(product.retailer.as_deref());
    let price = format_price(product.price);
    let insight = PriceInsight::for_product(product);

    let where_to_buy = (
        format!("Wo kann ich {name} kaufen?"),
        format!(
            "{name} ist bei {} für {price} € erhältlich. Preisradio vergleicht die Angebote von Saturn, MediaMarkt, Otto und Kaufland.",
            retailer.name
        ),
    );

    let discount_answer = match product.old_price {
        Some(old) if insight.has_discount => format!(
            "Ja, {name} ist aktuell um {} € ({} %) reduziert. Statt {} € kostet es jetzt {price} €.",
            format_price(insight.discount_amount),
            insight.discount_percent,
            format_price(old),
        ),
        _ => format!(
            "Für {name} ist derzeit kein Rabatt verfügbar. Der aktuelle Preis beträgt {price} €."
        ),
    };
    let discount = (format!("Ist {name} im Angebot?"), discount_answer);

    faq_page([where_to_buy, discount].into_iter())
}

fn faq_page(entries: impl Iterator<Item = (String, String)>) -> Value {
    let questions: Vec<Value> = entries
        .map(|(question, answer)| {
            json!({
                "@type": "Question",
                "name": question,
                "acceptedAnswer": {"@type": "Answer", "text": answer},
            })
        })
        .collect();

    json!({
        "@context": SCHEMA_CONTEXT,
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}
