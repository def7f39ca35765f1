//! Pattern library: matchers that locate URL payloads in raw text.
//!
//! The `regex` crate has no backreferences, so "same quote on both sides" is
//! spelled out as one alternative per delimiter, each with its own payload
//! group. Only the payload group is ever replaced.

use regex::Regex;
use std::borrow::Cow;

use super::error::RewriteError;

/// Something that finds URL payloads in text and substitutes them.
///
/// `rewrite` returns `Some(new)` for payloads that change. Implementations
/// must re-emit all text outside the payload unchanged and return
/// `Cow::Borrowed` when no payload changed.
pub trait UrlMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply<'t>(
        &self,
        text: &'t str,
        rewrite: &dyn Fn(&str) -> Option<String>,
    ) -> Cow<'t, str>;
}

/// Regex-backed matcher. The first participating group out of
/// `payload_groups` is the URL payload.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    name: &'static str,
    regex: Regex,
    payload_groups: Vec<usize>,
}

impl PatternMatcher {
    pub fn new(
        name: &'static str,
        pattern: &str,
        payload_groups: Vec<usize>,
    ) -> Result<Self, RewriteError> {
        let regex =
            Regex::new(pattern).map_err(|source| RewriteError::Pattern { name, source })?;
        Ok(Self {
            name,
            regex,
            payload_groups,
        })
    }

    /// Quote-delimited JS string or template literal starting with
    /// `http://`, `https://`, `//` or `/`. A backslash right before the
    /// closing quote (`\"/dev-api\"`) stays outside the payload.
    pub fn js_literal() -> Result<Self, RewriteError> {
        Self::new(
            "js-literal",
            r#"(?i)'((?:https?://|//|/)[^\s\\']+)\\?'|"((?:https?://|//|/)[^\s\\"]+)\\?"|`((?:https?://|//|/)[^\s\\`]+)\\?`"#,
            vec![1, 2, 3],
        )
    }

    /// `href=`, `src=` or `url=` followed by a quoted value.
    pub fn html_attribute() -> Result<Self, RewriteError> {
        Self::new(
            "html-attribute",
            r#"(?i)(?:href|src|url)\s*=\s*(?:'([^'"]+)'|"([^'"]+)")"#,
            vec![1, 2],
        )
    }

    /// CSS `url(...)`, payload optionally single or double quoted.
    pub fn css_url() -> Result<Self, RewriteError> {
        Self::new(
            "css-url",
            r#"(?i)url\s*\(\s*(?:'([^'"]+)'|"([^'"]+)"|([^'"]+?))\s*\)"#,
            vec![1, 2, 3],
        )
    }
}

impl UrlMatcher for PatternMatcher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply<'t>(
        &self,
        text: &'t str,
        rewrite: &dyn Fn(&str) -> Option<String>,
    ) -> Cow<'t, str> {
        let mut out: Option<String> = None;
        let mut last = 0;

        for caps in self.regex.captures_iter(text) {
            let Some(payload) = self.payload_groups.iter().find_map(|&g| caps.get(g)) else {
                continue;
            };
            let Some(replaced) = rewrite(payload.as_str()) else {
                continue;
            };
            let buf = out.get_or_insert_with(|| String::with_capacity(text.len() + 256));
            buf.push_str(&text[last..payload.start()]);
            buf.push_str(&replaced);
            last = payload.end();
        }

        match out {
            Some(mut buf) => {
                buf.push_str(&text[last..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(text),
        }
    }
}

/// The three matchers in the order they run.
pub fn standard_matchers() -> Result<Vec<Box<dyn UrlMatcher>>, RewriteError> {
    Ok(vec![
        Box::new(PatternMatcher::js_literal()?),
        Box::new(PatternMatcher::html_attribute()?),
        Box::new(PatternMatcher::css_url()?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> Option<String> {
        (s.starts_with('/') && !s.starts_with("//")).then(|| format!("X{s}"))
    }

    fn run(m: &PatternMatcher, text: &str) -> String {
        m.apply(text, &tag).into_owned()
    }

    #[test]
    fn js_literal_each_delimiter() {
        let m = PatternMatcher::js_literal().unwrap();
        assert_eq!(run(&m, "a = '/x';"), "a = 'X/x';");
        assert_eq!(run(&m, r#"a = "/x";"#), r#"a = "X/x";"#);
        assert_eq!(run(&m, "a = `/api/tasks`;"), "a = `X/api/tasks`;");
    }

    #[test]
    fn js_literal_rejects_whitespace_and_lone_slash() {
        let m = PatternMatcher::js_literal().unwrap();
        assert_eq!(run(&m, "'/a b'"), "'/a b'");
        assert_eq!(run(&m, "p.split('/')"), "p.split('/')");
        assert_eq!(run(&m, "'./rel.json'"), "'./rel.json'");
    }

    #[test]
    fn js_literal_mismatched_quotes_not_joined() {
        let m = PatternMatcher::js_literal().unwrap();
        assert_eq!(run(&m, r#"'/a" + "/b'"#), r#"'/a" + "/b'"#);
    }

    #[test]
    fn js_literal_escaped_quotes_kept() {
        let m = PatternMatcher::js_literal().unwrap();
        assert_eq!(
            run(&m, r#"baseUrl: \"/dev-api\","#),
            r#"baseUrl: \"X/dev-api\","#
        );
    }

    #[test]
    fn attribute_preserves_spacing_and_quotes() {
        let m = PatternMatcher::html_attribute().unwrap();
        assert_eq!(run(&m, r#"<a HREF = '/a b'>"#), r#"<a HREF = 'X/a b'>"#);
        assert_eq!(run(&m, r#"<img src="/i.png">"#), r#"<img src="X/i.png">"#);
        assert_eq!(run(&m, r#"<a title="/t">"#), r#"<a title="/t">"#);
    }

    #[test]
    fn css_url_quoted_and_bare() {
        let m = PatternMatcher::css_url().unwrap();
        assert_eq!(run(&m, "url('/bg.png')"), "url('X/bg.png')");
        assert_eq!(run(&m, r#"url("/bg.png")"#), r#"url("X/bg.png")"#);
        assert_eq!(run(&m, "URL( /bg.png )"), "URL( X/bg.png )");
        assert_eq!(run(&m, "url(bg.png)"), "url(bg.png)");
    }

    #[test]
    fn unchanged_text_is_borrowed() {
        let m = PatternMatcher::css_url().unwrap();
        let text = "body { background: url(http://cdn/x.png) }";
        assert!(matches!(m.apply(text, &tag), Cow::Borrowed(_)));
    }

    #[test]
    fn invalid_pattern_is_typed_error() {
        let err = PatternMatcher::new("broken", "(", vec![1]).unwrap_err();
        assert!(matches!(err, RewriteError::Pattern { name: "broken", .. }));
    }
}
