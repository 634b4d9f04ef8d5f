//! Web-linking (`Link` header) parsing.
//!
//! GitHub paginates collections and advertises the neighbouring pages as
//! `<https://api.github.com/...?page=2&per_page=20>; rel="next", <...>; rel="last"`.
//! Only the `last` relation matters for computing the number of pages.

use reqwest::Url;

/// One `<url>; rel="..."` entry of a link header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub rels: Vec<String>,
}

impl Link {
    pub fn has_rel(&self, name: &str) -> bool {
        self.rels.iter().any(|r| r.eq_ignore_ascii_case(name))
    }
}

/// Split a link header into its entries. Entries without a `<url>` part are skipped.
pub fn parse(header: &str) -> Vec<Link> {
    header.split(',').filter_map(parse_entry).collect()
}

fn parse_entry(entry: &str) -> Option<Link> {
    let entry = entry.trim();
    let rest = entry.strip_prefix('<')?;
    let end = rest.find('>')?;
    let url = rest[..end].trim().to_string();

    let rels = rest[end + 1..]
        .split(';')
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            if !key.trim().eq_ignore_ascii_case("rel") {
                return None;
            }
            Some(value.trim().trim_matches('"').to_string())
        })
        .flat_map(|value| {
            value
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    Some(Link { url, rels })
}

/// Page number carried by the `rel="last"` entry, if any.
pub fn last_page(header: &str) -> Option<u32> {
    let link = parse(header).into_iter().find(|l| l.has_rel("last"))?;
    let url = Url::parse(&link.url).ok()?;
    let page = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())?;
    (page >= 1).then_some(page)
}

/// Total number of pages, defaulting to a single page when the header is
/// absent or carries no usable `last` relation.
pub fn total_pages(header: Option<&str>) -> u32 {
    header.and_then(last_page).unwrap_or(1)
}
