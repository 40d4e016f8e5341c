// src/roster/width.rs
// Display-width estimate for roster columns.

/// Estimated width of one character in spreadsheet column units.
pub fn char_width(c: char) -> f32 {
    if ('\u{4e00}'..='\u{9fff}').contains(&c) {
        2.0
    } else if c.is_numeric() {
        1.5
    } else if c.is_alphabetic() {
        1.0
    } else {
        1.2
    }
}

pub fn text_width(text: &str) -> f32 {
    text.chars().map(char_width).sum()
}

/// Width of a column: the widest of its header label and member names.
pub fn column_width<'a, I>(header_label: &str, names: I) -> f32
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(text_width)
        .fold(text_width(header_label), f32::max)
}
