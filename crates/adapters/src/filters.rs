// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strips markdown/code/URL/emoji noise from transcript text before it goes
//! to synthesis, in the same strip order as
//! `original_source/src/ai_tts/core/filters.py`: fenced code blocks, inline
//! code, markdown links (keeping display text), bare URLs, empty bullet
//! points, headers, emphasis, horizontal rules, HTML tags, emoji, then
//! whitespace collapse.

use regex::Regex;

pub struct TextFilter {
    fenced_code: Regex,
    inline_code: Regex,
    markdown_link: Regex,
    bare_url: Regex,
    empty_bullet: Regex,
    header: Regex,
    emphasis: Regex,
    horizontal_rule: Regex,
    html_tag: Regex,
    emoji: Regex,
    whitespace: Regex,
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFilter {
    // Patterns are fixed string literals; a build failure here would be a
    // compile-time-detectable bug, not a runtime possibility.
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            fenced_code: Regex::new(r"(?s)```.*?```").expect("static regex"),
            inline_code: Regex::new(r"`[^`]+`").expect("static regex"),
            markdown_link: Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("static regex"),
            bare_url: Regex::new(r"https?://\S+").expect("static regex"),
            empty_bullet: Regex::new(r"(?m)^\s*[-*+]\s*$").expect("static regex"),
            header: Regex::new(r"(?m)^#{1,6}\s*").expect("static regex"),
            emphasis: Regex::new(r"(\*\*\*|\*\*|\*|___|__|_)").expect("static regex"),
            horizontal_rule: Regex::new(r"(?m)^\s*([-*_])\1{2,}\s*$").expect("static regex"),
            html_tag: Regex::new(r"</?[a-zA-Z][^>]*>").expect("static regex"),
            emoji: Regex::new(
                r"[\x{1F300}-\x{1FAFF}\x{2600}-\x{27BF}\x{1F1E6}-\x{1F1FF}]",
            )
            .expect("static regex"),
            whitespace: Regex::new(r"[ \t]+").expect("static regex"),
        }
    }

    /// Strips markdown/code/URL/emoji formatting, returning text suitable
    /// for synthesis.
    pub fn filter(&self, text: &str) -> String {
        let text = self.fenced_code.replace_all(text, " ");
        let text = self.inline_code.replace_all(&text, "");
        let text = self.markdown_link.replace_all(&text, "$1");
        let text = self.bare_url.replace_all(&text, "");
        let text = self.empty_bullet.replace_all(&text, "");
        let text = self.header.replace_all(&text, "");
        let text = self.emphasis.replace_all(&text, "");
        let text = self.horizontal_rule.replace_all(&text, "");
        let text = self.html_tag.replace_all(&text, "");
        let text = self.emoji.replace_all(&text, "");

        let collapsed = self.whitespace.replace_all(&text, " ");
        collapsed
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
#[path = "filters_tests.rs"]
mod tests;
