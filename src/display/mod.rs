//! Generic utilities to display things

pub mod duration;

use termtree::GlyphPalette;

/// Glyphs used when drawing process trees
pub const PALETTE: GlyphPalette = GlyphPalette {
    middle_item: "├",
    last_item: "└",
    item_indent: "─",
    middle_skip: "│",
    last_skip: " ",
    skip_indent: " ",
};
