// src/export.rs
// =============================================================================
// The data handed to a document/archive builder.
//
// An export is a title page plus one section per collected post, in order.
// We can write it out two ways:
// - JSON: for an external archive tool (EPUB packagers etc.)
// - HTML: one standalone page you can open in a browser or e-reader
// =============================================================================

use serde::Serialize;

use crate::collect::Post;
use crate::discover::Series;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlePage {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    /// Body markup, inserted as-is
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub title_page: TitlePage,
    pub sections: Vec<Section>,
}

impl ExportDocument {
    pub fn from_posts(title: &str, author: &str, posts: &[Post]) -> Self {
        Self {
            title_page: TitlePage {
                title: title.to_string(),
                author: author.to_string(),
            },
            sections: posts
                .iter()
                .map(|post| Section {
                    title: post.title.clone(),
                    content: post.content.clone(),
                })
                .collect(),
        }
    }

    pub fn from_series(series: &Series, posts: &[Post]) -> Self {
        Self::from_posts(&series.title, &series.author, posts)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_html(&self) -> String {
        let title = html_escape::encode_text(&self.title_page.title);
        let author = html_escape::encode_text(&self.title_page.author);

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n</head>\n<body>\n", title));
        html.push_str(&format!(
            "<header class=\"title-page\">\n<h1>{}</h1>\n<p class=\"author\">by {}</p>\n</header>\n",
            title, author
        ));

        for section in &self.sections {
            html.push_str(&format!(
                "<section>\n<h2>{}</h2>\n{}\n</section>\n",
                html_escape::encode_text(&section.title),
                section.content
            ));
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::extract_identifier;

    fn post(id: &str, title: &str, content: &str) -> Post {
        Post {
            author: "writer".to_string(),
            title: title.to_string(),
            name: extract_identifier(&format!("https://redd.it/{}", id)).unwrap(),
            content: content.to_string(),
            url: format!("https://www.reddit.com/comments/{}/", id),
        }
    }

    #[test]
    fn test_sections_follow_post_order() {
        let posts = vec![post("a1", "One", "<p>1</p>"), post("b2", "Two", "<p>2</p>")];
        let doc = ExportDocument::from_posts("Walk", "writer", &posts);

        assert_eq!(doc.title_page.title, "Walk");
        let titles: Vec<_> = doc.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_from_series_uses_series_title_page() {
        let series = Series {
            title: "The Long Walk".to_string(),
            author: "writer".to_string(),
            parts: Vec::new(),
        };
        let doc = ExportDocument::from_series(&series, &[post("a1", "One", "<p>1</p>")]);

        assert_eq!(doc.title_page.title, "The Long Walk");
        assert_eq!(doc.title_page.author, "writer");
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let doc = ExportDocument::from_posts("Walk", "writer", &[post("a1", "One", "<p>1</p>")]);
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(value["title_page"]["author"], "writer");
        assert_eq!(value["sections"][0]["content"], "<p>1</p>");
    }

    #[test]
    fn test_html_escapes_titles_but_not_content() {
        let doc = ExportDocument::from_posts(
            "Cats & Dogs",
            "writer",
            &[post("a1", "<One>", "<p>body</p>")],
        );
        let html = doc.to_html();

        assert!(html.contains("<h1>Cats &amp; Dogs</h1>"));
        assert!(html.contains("<h2>&lt;One&gt;</h2>"));
        assert!(html.contains("<p>body</p>"));
    }
}
