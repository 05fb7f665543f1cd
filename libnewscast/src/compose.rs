//! Post text assembly
//!
//! A post is `title`, a blank line, `Source: <name>`, and the URL. When the
//! whole thing exceeds the character budget, the title is trimmed to fit
//! and marked with an ellipsis. Lengths are counted in chars, matching how
//! the posting API counts.

use crate::news::Article;

pub const ELLIPSIS: &str = "...";

/// Build the post text for an article, never exceeding `max_chars`
///
/// The ellipsis marker appears iff the title was truncated.
pub fn compose(article: &Article, max_chars: usize) -> String {
    let suffix = format!("\n\nSource: {}\n{}", article.source_name, article.url);
    let full = format!("{}{}", article.title, suffix);

    if char_len(&full) <= max_chars {
        return full;
    }

    let title_budget = max_chars.saturating_sub(char_len(&suffix) + ELLIPSIS.len());
    let trimmed: String = article.title.chars().take(title_budget).collect();
    let post = format!("{}{}{}", trimmed, ELLIPSIS, suffix);

    // A pathological URL can make the suffix alone exceed the budget; the
    // hard cap wins over keeping the URL intact.
    if char_len(&post) > max_chars {
        post.chars().take(max_chars).collect()
    } else {
        post
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
