//! 14-segment font
//!
//! Maps an ASCII character to the abstract segment names it lights. The
//! names are the ones used in the mapping document for each character
//! position (`a`-`f`, `g1`/`g2` for the split middle bar, `h`-`m` for the
//! diagonal and centre strokes). Which physical bit a name lands on is
//! decided per position by the mapping, not here.

/// Segment names lit by `ch`
///
/// Lookup is case-insensitive. Characters without a glyph render blank.
pub fn segments(ch: char) -> &'static [&'static str] {
    match ch.to_ascii_uppercase() {
        ' ' => &[],
        '0' => &["a", "b", "c", "d", "e", "f"],
        '1' => &["b", "c"],
        '2' => &["a", "b", "g1", "g2", "e", "d"],
        '3' => &["a", "b", "g1", "g2", "c", "d"],
        '4' => &["f", "g1", "g2", "b", "c"],
        '5' => &["a", "f", "g1", "g2", "c", "d"],
        '6' => &["a", "f", "e", "d", "c", "g1", "g2"],
        '7' => &["a", "b", "c"],
        '8' => &["a", "b", "c", "d", "e", "f", "g1", "g2"],
        '9' => &["a", "b", "c", "d", "f", "g1", "g2"],
        'A' => &["a", "b", "c", "e", "f", "g1", "g2"],
        // Same strokes as 8
        'B' => &["a", "b", "c", "d", "e", "f", "g1", "g2"],
        'C' => &["a", "f", "e", "d"],
        // Same strokes as 0
        'D' => &["a", "b", "c", "d", "e", "f"],
        'E' => &["a", "f", "g1", "g2", "e", "d"],
        'F' => &["a", "f", "g1", "g2", "e"],
        'H' => &["f", "e", "g1", "g2", "b", "c"],
        'I' => &["b", "c"],
        'L' => &["f", "e", "d"],
        'M' => &["f", "e", "b", "c", "h", "i"],
        'N' => &["f", "e", "b", "c", "h", "k"],
        'O' => &["a", "b", "c", "d", "e", "f"],
        'P' => &["a", "b", "g1", "g2", "f", "e"],
        'R' => &["a", "b", "g1", "g2", "f", "e", "k"],
        'S' => &["a", "f", "g1", "g2", "c", "d"],
        'T' => &["a", "j", "m"],
        'U' => &["f", "e", "d", "c", "b"],
        'Y' => &["h", "j", "l"],
        '-' => &["g1", "g2"],
        '_' => &["d"],
        _ => &[],
    }
}
