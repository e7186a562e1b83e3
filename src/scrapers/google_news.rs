//! Google News RSS search scraper.
//!
//! Fetches coverage for a company from the Google News search feed at
//! `https://news.google.com/rss/search`. The feed is standard RSS 2.0 with
//! two quirks this module undoes:
//!
//! - item titles carry the publisher as a ` - Publisher` suffix
//! - item descriptions are small HTML fragments, not plain text
//!
//! Parsing uses a streaming `quick-xml` reader; no item-level failure can
//! fail the batch, only the feed request itself is fatal.

use crate::models::RawArticle;
use chrono::DateTime;
use itertools::Itertools;
use once_cell::sync::Lazy;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use scraper::Html;
use std::error::Error;
use tracing::{debug, info, instrument, warn};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One `<item>` as it appears on the wire, before any cleanup.
#[derive(Debug, Default, Clone)]
struct FeedItem {
    title: String,
    link: String,
    description: String,
    pub_date: Option<String>,
    source: Option<String>,
}

/// Search Google News for coverage of a company.
///
/// Returns up to `limit` deduplicated articles in feed order. An empty
/// result is not an error here; the caller decides whether zero articles
/// is fatal.
#[instrument(level = "info", skip(client))]
pub async fn search_articles(
    client: &reqwest::Client,
    company: &str,
    limit: usize,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let feed_url = format!(
        "https://news.google.com/rss/search?q={}&hl=en-US&gl=US&ceid=US:en",
        urlencoding::encode(company)
    );
    debug!(%feed_url, "Fetching Google News feed");

    let response = client.get(&feed_url).send().await?;
    if !response.status().is_success() {
        return Err(format!("Google News returned status {}", response.status()).into());
    }
    let body = response.text().await?;

    let items = parse_feed(&body)?;
    let articles = assemble_articles(items, limit);

    info!(
        count = articles.len(),
        company, "Indexed Google News articles"
    );
    Ok(articles)
}

/// Parse the RSS body into raw feed items with a streaming event reader.
///
/// Only `<item>` children are collected; channel-level elements share tag
/// names with item-level ones and are skipped. The reader splits text on
/// `&…;` references, so each child element accumulates its fragments into
/// one buffer that is recorded, trimmed, when the element closes. Malformed
/// XML is the one error this returns, and it fails the whole feed.
fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, Box<dyn Error>> {
    let mut reader = Reader::from_str(xml);

    let mut items = Vec::new();
    let mut current = FeedItem::default();
    let mut in_item = false;
    // Open child element of the current item and its content so far.
    let mut field = String::new();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    in_item = true;
                    current = FeedItem::default();
                    field.clear();
                    text.clear();
                } else {
                    field = name;
                    text.clear();
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"item" {
                    if in_item {
                        in_item = false;
                        if current.link.is_empty() {
                            warn!(title = %current.title, "Skipping feed item without a link");
                        } else {
                            items.push(std::mem::take(&mut current));
                        }
                    }
                } else if in_item && e.name().as_ref() == field.as_bytes() {
                    record_field(&mut current, &field, text.trim());
                    field.clear();
                    text.clear();
                }
            }
            Ok(Event::Text(e)) => {
                if in_item && !field.is_empty() {
                    text.push_str(&e.xml_content()?);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item && !field.is_empty() {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_item && !field.is_empty() {
                    append_reference(&mut text, e.as_ref());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Box::new(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn record_field(item: &mut FeedItem, tag: &str, text: &str) {
    match tag {
        "title" => item.title = text.to_string(),
        "link" => item.link = text.to_string(),
        "description" => item.description = text.to_string(),
        "pubDate" => item.pub_date = Some(text.to_string()),
        "source" => item.source = Some(text.to_string()),
        _ => {}
    }
}

/// Append one `&…;` reference to the accumulating element content.
///
/// Unknown named entities are kept verbatim rather than dropped; escaped
/// HTML in descriptions must survive byte for byte for the fragment pass.
fn append_reference(text: &mut String, raw: &[u8]) {
    let name = String::from_utf8_lossy(raw);
    match resolve_reference(&name) {
        Some(resolved) => text.push_str(&resolved),
        None => {
            text.push('&');
            text.push_str(&name);
            text.push(';');
        }
    }
}

/// Resolve a reference name: the five predefined XML entities plus decimal
/// and hex character references.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(digits) = name.strip_prefix('#') {
        let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => digits.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

/// Turn feed items into articles: dedupe by link, cap at `limit`, strip the
/// publisher suffix, flatten the description fragment, normalize the date.
fn assemble_articles(items: Vec<FeedItem>, limit: usize) -> Vec<RawArticle> {
    items
        .into_iter()
        .unique_by(|item| item.link.clone())
        .take(limit)
        .map(|item| {
            let (headline, title_publisher) = split_publisher(&item.title);
            let source = item
                .source
                .filter(|s| !s.trim().is_empty())
                .or(title_publisher)
                .or_else(|| link_host(&item.link))
                .unwrap_or_default();

            let summary = fragment_text(&item.description);
            let summary = if summary.is_empty() {
                headline.clone()
            } else {
                summary
            };

            RawArticle {
                title: headline,
                summary,
                url: item.link,
                publish_date: item.pub_date.as_deref().and_then(to_rfc3339),
                source,
            }
        })
        .collect()
}

/// Split a Google News headline into title and publisher.
///
/// The feed appends the publisher after the right-most ` - `, so only that
/// separator is honored; hyphens inside the headline survive.
fn split_publisher(title: &str) -> (String, Option<String>) {
    match title.rfind(" - ") {
        Some(pos) => {
            let publisher = title[pos + 3..].trim();
            let headline = title[..pos].trim().to_string();
            if publisher.is_empty() {
                (headline, None)
            } else {
                (headline, Some(publisher.to_string()))
            }
        }
        None => (title.trim().to_string(), None),
    }
}

/// Flatten an HTML fragment into whitespace-collapsed plain text.
fn fragment_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Feed dates are RFC 2822; the rest of the pipeline speaks RFC 3339.
fn to_rfc3339(pub_date: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(pub_date)
        .ok()
        .map(|dt| dt.to_rfc3339())
}

fn link_host(link: &str) -> Option<String> {
    url::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>"acme" - Google News</title>
    <link>https://news.google.com</link>
    <item>
      <title>Acme profits soar in third quarter - Example Wire</title>
      <link>https://news.google.com/articles/one</link>
      <pubDate>Mon, 25 Aug 2025 09:30:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/articles/one"&gt;Acme profits soar&lt;/a&gt;&lt;font color="#6f6f6f"&gt;Example Wire&lt;/font&gt;</description>
      <source url="https://examplewire.com">Example Wire</source>
    </item>
    <item>
      <title><![CDATA[Acme faces supplier lawsuit - Daily Ledger]]></title>
      <link>https://news.google.com/articles/two</link>
      <pubDate>Mon, 25 Aug 2025 07:00:00 GMT</pubDate>
      <description><![CDATA[<p>The lawsuit alleges   delayed payments.</p>]]></description>
      <source url="https://dailyledger.example">Daily Ledger</source>
    </item>
  </channel>
</rss>"##;

    #[test]
    fn test_parse_feed_collects_items() {
        let items = parse_feed(SAMPLE_FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].title,
            "Acme profits soar in third quarter - Example Wire"
        );
        assert_eq!(items[0].link, "https://news.google.com/articles/one");
        assert_eq!(items[0].source.as_deref(), Some("Example Wire"));
        assert_eq!(
            items[0].pub_date.as_deref(),
            Some("Mon, 25 Aug 2025 09:30:00 GMT")
        );
        assert_eq!(items[1].title, "Acme faces supplier lawsuit - Daily Ledger");
    }

    #[test]
    fn test_parse_feed_skips_channel_metadata() {
        let items = parse_feed(SAMPLE_FEED).unwrap();
        assert!(!items[0].title.contains("Google News"));
    }

    #[test]
    fn test_parse_feed_empty_channel() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>x</title></channel></rss>"#;
        let items = parse_feed(xml).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_feed_reassembles_references() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item>
      <title>Johnson &amp; Johnson beats estimates - Wire &#38; Co</title>
      <link>https://news.google.com/articles/jnj</link>
      <description>Q2 profit wasn&#8217;t the story</description>
    </item>
  </channel>
</rss>"#;
        let items = parse_feed(xml).unwrap();
        assert_eq!(
            items[0].title,
            "Johnson & Johnson beats estimates - Wire & Co"
        );
        assert_eq!(items[0].description, "Q2 profit wasn’t the story");
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").as_deref(), Some("&"));
        assert_eq!(resolve_reference("lt").as_deref(), Some("<"));
        assert_eq!(resolve_reference("#8217").as_deref(), Some("’"));
        assert_eq!(resolve_reference("#x26").as_deref(), Some("&"));
        assert_eq!(resolve_reference("nbsp"), None);
        assert_eq!(resolve_reference("#xzz"), None);
    }

    #[test]
    fn test_assemble_articles_full_pipeline() {
        let items = parse_feed(SAMPLE_FEED).unwrap();
        let articles = assemble_articles(items, 10);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Acme profits soar in third quarter");
        assert_eq!(articles[0].source, "Example Wire");
        assert_eq!(articles[0].summary, "Acme profits soar Example Wire");
        assert_eq!(
            articles[0].publish_date.as_deref(),
            Some("2025-08-25T09:30:00+00:00")
        );
        assert_eq!(articles[1].summary, "The lawsuit alleges delayed payments.");
    }

    #[test]
    fn test_assemble_articles_dedupes_and_limits() {
        let item = |link: &str| FeedItem {
            title: "t - P".to_string(),
            link: link.to_string(),
            ..FeedItem::default()
        };
        let items = vec![item("https://a"), item("https://a"), item("https://b"), item("https://c")];

        let deduped = assemble_articles(items.clone(), 10);
        assert_eq!(deduped.len(), 3);

        let limited = assemble_articles(items, 2);
        assert_eq!(limited.len(), 2);
    }

    #[test]
    fn test_assemble_summary_falls_back_to_headline() {
        let items = vec![FeedItem {
            title: "Acme opens new plant - Wire".to_string(),
            link: "https://example.com/a".to_string(),
            ..FeedItem::default()
        }];
        let articles = assemble_articles(items, 10);
        assert_eq!(articles[0].summary, "Acme opens new plant");
    }

    #[test]
    fn test_assemble_source_falls_back_to_link_host() {
        let items = vec![FeedItem {
            title: "Headline without publisher".to_string(),
            link: "https://news.example.org/story".to_string(),
            ..FeedItem::default()
        }];
        let articles = assemble_articles(items, 10);
        assert_eq!(articles[0].source, "news.example.org");
    }

    #[test]
    fn test_split_publisher() {
        assert_eq!(
            split_publisher("Acme soars - Reuters"),
            ("Acme soars".to_string(), Some("Reuters".to_string()))
        );
        assert_eq!(
            split_publisher("Acme's make-or-break quarter - The Post"),
            (
                "Acme's make-or-break quarter".to_string(),
                Some("The Post".to_string())
            )
        );
        assert_eq!(split_publisher("No separator"), ("No separator".to_string(), None));
    }

    #[test]
    fn test_fragment_text_strips_markup() {
        assert_eq!(
            fragment_text("<p>Plain <b>bold</b>&nbsp;text</p>"),
            "Plain bold text"
        );
        assert_eq!(fragment_text(""), "");
        assert_eq!(fragment_text("  \n "), "");
    }

    #[test]
    fn test_to_rfc3339() {
        assert_eq!(
            to_rfc3339("Mon, 25 Aug 2025 09:30:00 GMT").as_deref(),
            Some("2025-08-25T09:30:00+00:00")
        );
        assert_eq!(to_rfc3339("yesterday"), None);
    }
}
