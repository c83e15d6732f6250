// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Markdown helpers.

use regex::Regex;
use std::sync::LazyLock;

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--[\s\S]*?-->").expect("static regex"));

/// Remove every `<!-- ... -->` annotation, including multi-line ones.
///
/// Matching is non-greedy, so text between two comments survives.
pub fn strip_markdown_comments(text: &str) -> String {
    HTML_COMMENT.replace_all(text, "").into_owned()
}
