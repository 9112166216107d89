// src/discover/links.rs
// =============================================================================
// This module pulls links and headings out of post/wiki markup.
//
// We use the `scraper` crate (html5ever underneath) for parsing and CSS
// selectors, and the `url` crate to resolve relative hrefs. Post bodies often
// link to other posts as "/r/sub/comments/<id>/..." without a host, so every
// href is resolved against the forum origin before anyone looks at it. Hrefs
// that already name a post host but lack a scheme ("redd.it/abc") get https.
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::canon::extract_identifier;

const ORIGIN: &str = "https://www.reddit.com/";

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

// Title lookup order: the first level with any heading wins
static HEADINGS: Lazy<[Selector; 3]> = Lazy::new(|| {
    [
        Selector::parse("h1").unwrap(),
        Selector::parse("h2").unwrap(),
        Selector::parse("h3").unwrap(),
    ]
});

/// A hyperlink as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Absolute URL
    pub href: String,
    /// Visible text, whitespace collapsed
    pub text: String,
}

// Extracts every <a href> in document order
//
// Links whose href can't be turned into an http(s) URL (mailto:, javascript:,
// garbage) are skipped.
pub fn extract_links(html: &str) -> Vec<Link> {
    let document = Html::parse_document(html);
    let base = Url::parse(ORIGIN).ok();

    document
        .select(&LINKS)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let href = resolve_url(base.as_ref(), href)?;
            Some(Link {
                href,
                text: collapse_whitespace(&element.text().collect::<String>()),
            })
        })
        .collect()
}

/// Text of the first h1, else the first h2, else the first h3.
pub fn first_heading(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    HEADINGS.iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(|heading| collapse_whitespace(&heading.text().collect::<String>()))
    })
}

// Resolves a possibly-relative href to an absolute http(s) URL
//
// Examples:
//   "/r/HFY/comments/abc/x/"   -> "https://www.reddit.com/r/HFY/comments/abc/x/"
//   "https://redd.it/abc"      -> "https://redd.it/abc"
//   "redd.it/abc"              -> "https://redd.it/abc"
//   "mailto:someone@example"   -> None
fn resolve_url(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(_) if !href.starts_with('/') && extract_identifier(href).is_some() => {
            Url::parse(&format!("https://{}", href)).ok()?
        }
        Err(_) => base?.join(href).ok()?,
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Lazy?
//    - A value computed the first time it's used, then reused forever
//    - Parsing a CSS selector every call would be wasted work
//
// 2. Why unwrap() on the selectors?
//    - They are constants known to be valid
//    - If one failed to parse, that's a programmer error, so panic is fine
//
// 3. What does filter_map do?
//    - Runs a closure returning Option and keeps only the Some values
//    - The `?` inside the closure bails out of that one item, not the function
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_links_in_order() {
        let html = r#"
            <p><a href="https://redd.it/aaa">Part  1</a></p>
            <p><a href="/r/HFY/comments/bbb/two/">Part <b>2</b></a></p>
            <a href="mailto:someone@example.com">Mail</a>
        "#;
        let links = extract_links(html);

        assert_eq!(
            links,
            vec![
                Link {
                    href: "https://redd.it/aaa".to_string(),
                    text: "Part 1".to_string(),
                },
                Link {
                    href: "https://www.reddit.com/r/HFY/comments/bbb/two/".to_string(),
                    text: "Part 2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_first_heading_prefers_higher_level() {
        let html = "<h3>Small</h3><h2>Medium</h2><h1>Big</h1>";
        assert_eq!(first_heading(html), Some("Big".to_string()));

        let html = "<h3>Small</h3><h2>Medium</h2>";
        assert_eq!(first_heading(html), Some("Medium".to_string()));

        assert_eq!(first_heading("<p>no headings</p>"), None);
    }

    #[test]
    fn test_post_links_without_scheme_keep_their_host() {
        let html = r#"
            <a href="redd.it/bbb">Part 2</a>
            <a href="www.reddit.com/r/HFY/comments/ccc/x/">Part 3</a>
            <a href="wiki/other">Wiki</a>
        "#;
        let hrefs: Vec<_> = extract_links(html).into_iter().map(|link| link.href).collect();

        assert_eq!(
            hrefs,
            vec![
                "https://redd.it/bbb",
                "https://www.reddit.com/r/HFY/comments/ccc/x/",
                "https://www.reddit.com/wiki/other",
            ]
        );
        assert!(hrefs[..2].iter().all(|href| extract_identifier(href).is_some()));
    }

    #[test]
    fn test_skip_javascript_links() {
        assert!(extract_links(r#"<a href="javascript:void(0)">x</a>"#).is_empty());
    }
}
