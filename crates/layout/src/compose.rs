//! Positions the top-level leaves on lines.
//!
//! One pass over the roots with a cursor. Words are never split: a leaf that
//! would end past the wrap width moves to the next line whole. Whitespace
//! never triggers a wrap.

use crate::leaf::{LeafKind, LeafTree};

/// Lays out `tree` and returns `(width, height)` of the text block.
///
/// `word_wrap <= 0` disables wrapping. Only root offsets are written, so
/// calling this again with the same width gives the same positions.
pub fn compose(tree: &mut LeafTree, word_wrap: f32) -> (f32, f32) {
    let mut last_x = 0.0_f32;
    let mut last_y = 0.0_f32;
    let mut max_height = 0.0_f32;
    let mut max_width = 0.0_f32;

    let roots = tree.roots().to_vec();
    for id in roots {
        let Some(leaf) = tree.get_mut(id) else {
            continue;
        };
        if last_y == 0.0 {
            last_y = leaf.baseline;
        }
        leaf.y = last_y;

        match leaf.kind {
            LeafKind::NewLine => {
                leaf.x = last_x;
                last_x = 0.0;
                last_y += max_height;
                max_height = 0.0;
            }
            LeafKind::Space | LeafKind::Tab => {
                leaf.x = last_x;
                last_x += leaf.width + leaf.letter_spacing;
            }
            LeafKind::Glyph | LeafKind::Container | LeafKind::Image => {
                if word_wrap > 0.0 && last_x + leaf.width > word_wrap {
                    last_x = 0.0;
                    last_y += max_height;
                    max_height = 0.0;
                }
                leaf.x = last_x;
                leaf.y = last_y;
                last_x += leaf.width;
                max_height = max_height.max(leaf.height + leaf.line_height);
                max_width = max_width.max(last_x);
            }
        }
    }

    log::debug!(
        "Composed {} leaves at wrap {}: {}x{}",
        tree.roots().len(),
        word_wrap,
        max_width.max(last_x),
        last_y
    );
    (max_width.max(last_x), last_y)
}
