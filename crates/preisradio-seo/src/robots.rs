//! `robots.txt` rules.

use preisradio_core::SiteConfig;

const PRIVATE_PATHS: [&str; 5] = ["/api/", "/admin/", "/_next/", "/_vercel/", "/*?*"];

/// Static asset extensions hidden from crawlers. Search bots stop at `xml`.
const ASSET_EXTENSIONS: [&str; 13] = [
    "js", "css", "json", "map", "txt", "xml", "ico", "svg", "png", "jpg", "jpeg", "gif", "webp",
];
const SEARCH_BOT_EXTENSIONS: usize = 6;

const SEARCH_BOTS: [&str; 2] = ["Googlebot", "Bingbot"];

/// Render `robots.txt` for `site`, ending with the sitemap index location.
#[must_use]
pub fn robots_txt(site: &SiteConfig) -> String {
    let mut out = String::new();
    write_group(&mut out, "*", &ASSET_EXTENSIONS);
    for bot in SEARCH_BOTS {
        write_group(&mut out, bot, &ASSET_EXTENSIONS[..SEARCH_BOT_EXTENSIONS]);
    }
    out.push_str(&format!("Sitemap: {}\n", site.url("/sitemap.xml")));
    out
}

fn write_group(out: &mut String, agent: &str, extensions: &[&str]) {
    out.push_str(&format!("User-agent: {agent}\n"));
    out.push_str("Allow: /\n");
    for path in PRIVATE_PATHS {
        out.push_str(&format!("Disallow: {path}\n"));
    }
    for ext in extensions {
        out.push_str(&format!("Disallow: /*.{ext}$\n"));
    }
    out.push('\n');
}
