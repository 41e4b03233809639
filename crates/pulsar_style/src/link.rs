//! Make a whole group block clickable
//!
//! A empty anchor is inserted as the first child of the group, the block styles stretch it over
//! the group. Its title is taken from the most important heading inside the group.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::css::sanitize::strip_tags;

/// Class every overlay anchor gets
pub const LINK_CLASS: &str = "wp-block-group__link";

/// Url schemes allowed in the overlay href
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp", "sms"];

/// Heading patterns, most important first
static HEADINGS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=6)
        .filter_map(|level| Regex::new(&format!(r"(?si)<h{level}[^>]*>(.*?)</h{level}>")).ok())
        .collect()
});

/// The link related attributes of a group block
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkAttributes {
    /// Custom destination url
    pub url: Option<String>,
    /// `"post"` links to the current post instead of `url`
    pub link_destination: Option<String>,
    /// Extra classes for the anchor
    pub link_class: Option<String>,
    /// The anchor target
    pub link_target: Option<String>,
    /// The anchor rel
    pub rel: Option<String>,
}

/// Resolves post ids to their permalinks
pub trait PermalinkResolver {
    /// The permalink of `post_id`
    fn permalink(&self, post_id: u64) -> Option<String>;
}

impl<F: Fn(u64) -> Option<String>> PermalinkResolver for F {
    fn permalink(&self, post_id: u64) -> Option<String> {
        self(post_id)
    }
}

/// What the block is being rendered for
pub struct LinkContext<'a> {
    /// `postId` from the block context, set inside query loops
    pub context_post_id: Option<u64>,
    /// The post currently being rendered
    pub current_post_id: Option<u64>,
    /// Permalink lookup
    pub permalinks: &'a dyn PermalinkResolver,
}

/// Work out where the overlay should link to
#[must_use]
pub fn resolve_link_url(attributes: &LinkAttributes, context: &LinkContext<'_>) -> Option<String> {
    if attributes.link_destination.as_deref() == Some("post") {
        let post_id = context
            .context_post_id
            .filter(|id| *id != 0)
            .or(context.current_post_id)
            .filter(|id| *id != 0)?;
        return context.permalinks.permalink(post_id);
    }

    attributes.url.clone().filter(|url| !url.is_empty())
}

/// Make `url` safe to use in a href, dropping it if the scheme is not allowed.
///
/// Control characters are removed and spaces encoded before the scheme is checked.
fn escape_url(url: &str) -> Option<String> {
    let url = url
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .replace(' ', "%20");
    if url.is_empty() {
        return None;
    }

    if let Some((scheme, _)) = url.split_once(':') {
        let is_scheme = scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.');
        if is_scheme && !ALLOWED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) {
            log::debug!("Dropping link with disallowed scheme {scheme}");
            return None;
        }
    }

    Some(html_escape::encode_double_quoted_attribute(&url).into_owned())
}

/// The text of the most important heading in `content`
fn heading_text(content: &str) -> Option<String> {
    HEADINGS.iter().find_map(|pattern| {
        let inner = pattern.captures(content)?.get(1)?;
        Some(strip_tags(inner.as_str()).trim().to_owned())
    })
}

/// Build the overlay anchor
fn link_markup(url: &str, attributes: &LinkAttributes, title: &str) -> String {
    let mut classes = String::from(LINK_CLASS);
    if let Some(extra) = attributes.link_class.as_deref().filter(|class| !class.is_empty()) {
        classes.push(' ');
        classes.push_str(extra);
    }

    let mut markup = format!(
        "<a title=\"{}\" href=\"{url}\" class=\"{}\"",
        html_escape::encode_double_quoted_attribute(title),
        html_escape::encode_double_quoted_attribute(&classes),
    );
    for (name, value) in [("target", &attributes.link_target), ("rel", &attributes.rel)] {
        if let Some(value) = value.as_deref().filter(|value| !value.is_empty()) {
            markup.push_str(&format!(
                " {name}=\"{}\"",
                html_escape::encode_double_quoted_attribute(value)
            ));
        }
    }
    markup.push_str("></a>");
    markup
}

/// Insert the link overlay into rendered group block markup.
///
/// The content is returned unchanged if it is empty, no url resolves, or it has no tags.
#[must_use]
pub fn render_link(content: &str, attributes: &LinkAttributes, context: &LinkContext<'_>) -> String {
    if content.is_empty() {
        return content.to_owned();
    }

    let Some(url) = resolve_link_url(attributes, context).and_then(|url| escape_url(&url)) else {
        return content.to_owned();
    };
    let Some(insert_at) = content.find('>').and_then(|index| index.checked_add(1)) else {
        return content.to_owned();
    };

    let title = heading_text(content).unwrap_or_default();
    let markup = link_markup(&url, attributes, &title);

    let mut result = String::with_capacity(content.len().saturating_add(markup.len()));
    let (head, tail) = content.split_at(insert_at);
    result.push_str(head);
    result.push_str(&markup);
    result.push_str(tail);
    result
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn no_permalinks(_: u64) -> Option<String> {
        None
    }

    fn context(permalinks: &dyn PermalinkResolver) -> LinkContext<'_> {
        LinkContext {
            context_post_id: None,
            current_post_id: None,
            permalinks,
        }
    }

    fn attributes(url: &str) -> LinkAttributes {
        LinkAttributes {
            url: Some(url.into()),
            ..LinkAttributes::default()
        }
    }

    #[test]
    fn inserts_after_first_tag() {
        let content = "<div class=\"wp-block-group\"><h3>Sub</h3><h2>Main <em>title</em></h2></div>";
        let attributes = LinkAttributes {
            link_class: Some("is-card".into()),
            link_target: Some("_blank".into()),
            rel: Some("noopener".into()),
            ..attributes("https://example.com/?a=1&b=2")
        };

        let result = render_link(content, &attributes, &context(&no_permalinks));
        assert_snapshot!(result, @r#"<div class="wp-block-group"><a title="Main title" href="https://example.com/?a=1&amp;b=2" class="wp-block-group__link is-card" target="_blank" rel="noopener"></a><h3>Sub</h3><h2>Main <em>title</em></h2></div>"#);
    }

    #[test]
    fn untouched_without_url() {
        let content = "<div><p>Hi</p></div>";
        assert_eq!(
            render_link(content, &LinkAttributes::default(), &context(&no_permalinks)),
            content
        );
        assert_eq!(render_link("", &attributes("https://a.b"), &context(&no_permalinks)), "");
        assert_eq!(
            render_link("no tags", &attributes("https://a.b"), &context(&no_permalinks)),
            "no tags"
        );
    }

    #[test]
    fn disallowed_scheme_is_dropped() {
        let content = "<div></div>";
        let result = render_link(content, &attributes("javascript:alert(1)"), &context(&no_permalinks));
        assert_eq!(result, content);

        for hidden in ["java\tscript:alert(1)", "java\nscript:alert(1)", "\u{1}javascript:alert(1)", "\u{1} JavaScript:alert(1)"] {
            let result = render_link(content, &attributes(hidden), &context(&no_permalinks));
            assert_eq!(result, content, "{hidden:?} was kept");
        }

        let result = render_link(content, &attributes("/relative:path"), &context(&no_permalinks));
        assert!(result.contains("href=\"/relative:path\""));

        let result = render_link(content, &attributes("https://a.b/x y\r\n"), &context(&no_permalinks));
        assert!(result.contains("href=\"https://a.b/x%20y\""));
    }

    #[test]
    fn post_destination_uses_permalink() {
        let permalinks = |id: u64| Some(format!("https://example.com/?p={id}"));
        let attributes = LinkAttributes {
            link_destination: Some("post".into()),
            url: Some("https://ignored.example".into()),
            ..LinkAttributes::default()
        };

        let in_loop = LinkContext {
            context_post_id: Some(7),
            current_post_id: Some(1),
            permalinks: &permalinks,
        };
        assert_eq!(
            resolve_link_url(&attributes, &in_loop).as_deref(),
            Some("https://example.com/?p=7")
        );

        let single = LinkContext {
            context_post_id: Some(0),
            current_post_id: Some(1),
            permalinks: &permalinks,
        };
        assert_eq!(
            resolve_link_url(&attributes, &single).as_deref(),
            Some("https://example.com/?p=1")
        );

        assert_eq!(resolve_link_url(&attributes, &context(&permalinks)), None);
    }

    #[test]
    fn attributes_from_block_json() -> serde_json::Result<()> {
        let attributes: LinkAttributes = serde_json::from_str(
            r#"{"url": "https://a.b", "linkDestination": "custom", "linkTarget": "_blank", "align": "wide"}"#,
        )?;
        assert_eq!(attributes.link_target.as_deref(), Some("_blank"));
        assert_eq!(attributes.link_destination.as_deref(), Some("custom"));
        Ok(())
    }
}
