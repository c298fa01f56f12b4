//! Line-level diff rendering (§4.11 collaborator). Computes a unified-
//! diff-style render between two texts using the `similar` crate, the
//! same crate the teacher's `command::diff` reaches for. Colorization of
//! the rendered text is a separate concern left to the caller.

use std::fmt;

use similar::{ChangeTag, TextDiff};

struct Line(Option<usize>);

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            None => write!(f, "    "),
            Some(idx) => write!(f, "{:<4}", idx + 1),
        }
    }
}

/// Renders `old` -> `new` as a grouped unified diff with 3 lines of
/// context, one `<old-line><new-line> |<sign><text>` row per change.
pub fn render(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();
    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            out.push_str(&format!("{:-^1$}\n", "-", 80));
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                out.push_str(&format!(
                    "{}{} |{}{}",
                    Line(change.old_index()),
                    Line(change.new_index()),
                    sign,
                    change.value(),
                ));
                if change.missing_newline() {
                    out.push('\n');
                }
            }
        }
    }
    out
}

/// Same as [`render`], but in a plain unified-diff `---`/`+++`/`@@` shape
/// for `diff --side-by-side`'s side-by-side-free fallback rendering.
pub fn render_side_by_side(path: &str, old: &str, new: &str) -> String {
    let mut out = format!("--- a/{path}\n+++ b/{path}\n");
    out.push_str(&render(old, new));
    out
}
