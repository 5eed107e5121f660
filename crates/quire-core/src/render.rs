//! Markdown rendering for markdown cells.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use rustc_hash::FxHashMap;

/// Turns markdown source into HTML.
///
/// Implementations must accept any input, however malformed, and always
/// produce some HTML.
pub trait MarkdownRenderer: Send {
    fn render(&self, markdown: &str) -> String;
}

/// CommonMark renderer with the usual extensions.
///
/// Tables, footnotes, strikethrough, task lists and math are enabled, raw HTML
/// passes through, and every heading without an explicit `{#id}` gets an id
/// slugged from its text so it can be linked to.
///
/// Fenced code is not highlighted here; it is emitted as
/// `<pre><code class="language-…">` for the UI shell's highlighter.
#[derive(Debug, Clone)]
pub struct CmarkRenderer {
    options: Options,
    anchors: bool,
}

impl CmarkRenderer {
    pub fn new() -> Self {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_MATH;
        Self {
            options,
            anchors: true,
        }
    }

    /// Disable heading anchors.
    pub fn without_anchors(mut self) -> Self {
        self.anchors = false;
        self
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let mut events: Vec<Event<'_>> = Parser::new_ext(markdown, self.options).collect();
        if self.anchors {
            add_heading_anchors(&mut events);
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

fn add_heading_anchors(events: &mut [Event<'_>]) {
    let mut slugger = Slugger::default();
    for start in 0..events.len() {
        let Event::Start(Tag::Heading { id: None, .. }) = &events[start] else {
            continue;
        };
        let slug = slugger.slug(&heading_text(&events[start + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Plain text of a heading, up to its closing tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) | Event::InlineMath(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Hands out unique slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Default)]
struct Slugger {
    seen: FxHashMap<String, usize>,
}

impl Slugger {
    fn slug(&mut self, text: &str) -> String {
        let mut base: String = text
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if base.is_empty() {
            base = "section".to_string();
        }

        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}
