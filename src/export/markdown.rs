use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;

use crate::post::post_model::Post;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w-]").unwrap());

/// Longest stem kept from a title, in bytes. Leaves room for the dedupe
/// suffix and `.md` under the usual 255-byte file name limit.
pub const MAX_STEM_BYTES: usize = 100;

/// Renders a post as a markdown document.
pub fn render(post: &Post) -> String {
    let date = post
        .date
        .with_timezone(&Local)
        .format("%-m/%-d/%Y, %-I:%M:%S %p");

    let paragraphs = [
        format!("# {}", post.title),
        format!("**Author:** {}", post.author),
        format!("**Date:** {}", date),
        post.content.clone(),
        format!("**Tags:** {}", post.tags.join(", ")),
    ];

    let mut doc = paragraphs.join("\n\n");
    doc.push('\n');
    doc
}

/// Derives a file stem from a title: whitespace runs become `_` and anything
/// that is not a word character or `-` is dropped. The result is cut to
/// `MAX_STEM_BYTES` on a char boundary.
pub fn file_stem(title: &str) -> String {
    let underscored = WHITESPACE.replace_all(title.trim(), "_");
    let stem = UNSAFE_CHARS.replace_all(&underscored, "");

    let mut end = stem.len().min(MAX_STEM_BYTES);
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    let stem = stem[..end].trim_end_matches('_');

    if stem.is_empty() {
        "post".to_string()
    } else {
        stem.to_string()
    }
}

/// Assigns each post a distinct `.md` file name within one export.
pub struct FileNamer {
    used: HashSet<String>,
}

impl FileNamer {
    pub fn new() -> Self {
        FileNamer {
            used: HashSet::new(),
        }
    }

    pub fn name_for(&mut self, post: &Post) -> String {
        let stem = file_stem(&post.title);
        let mut name = format!("{}.md", stem);

        if self.used.contains(&name) {
            let suffix: String = UNSAFE_CHARS
                .replace_all(&post.id, "")
                .chars()
                .take(8)
                .collect();
            name = format!("{}-{}.md", stem, suffix);

            let mut n = 2;
            while self.used.contains(&name) {
                name = format!("{}-{}-{}.md", stem, suffix, n);
                n += 1;
            }
        }

        self.used.insert(name.clone());
        name
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new()
    }
}
