use std::collections::HashSet;

use crate::slug::slugify;

pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Site root followed by one detail page per distinct, non-empty slug.
pub fn entries<'a>(
    site_url: &str,
    names: impl IntoIterator<Item = &'a str>,
    lastmod: &str,
) -> Vec<SitemapEntry> {
    let base = site_url.trim_end_matches('/');
    let mut entries = vec![SitemapEntry {
        loc: format!("{base}/"),
        lastmod: lastmod.to_string(),
        changefreq: "daily",
        priority: "1.0",
    }];

    let mut seen = HashSet::new();
    for name in names {
        let slug = slugify(name);
        if slug.is_empty() || !seen.insert(slug.clone()) {
            continue;
        }
        entries.push(SitemapEntry {
            loc: format!("{base}/game/{slug}"),
            lastmod: lastmod.to_string(),
            changefreq: "weekly",
            priority: "0.8",
        });
    }
    entries
}

pub fn render(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            escape(&entry.loc),
            escape(&entry.lastmod),
            entry.changefreq,
            entry.priority,
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
