//! Finds the header row of CSV files that start with an unknown number of
//! metadata lines.
//!
//! ECCC files (the station inventory as well as bulk data exports) may open with a
//! preamble of varying length: station name, coordinates, disclaimers and so on.
//! The header is taken to be the **longest line** of the file, the first one if
//! several share the maximum length. This works without knowing the delimiter,
//! but a data row that is longer than the header (for example one carrying a
//! long remark) will be picked instead. That limitation is accepted.

/// Returns the zero-based index of the longest line in `text`, counting characters.
/// Ties go to the first such line. `None` when `text` has no lines.
///
/// # Examples
///
/// ```
/// use ec3::locate_header;
///
/// let text = "Station Name,TORONTO\n\"Date/Time\",\"Year\",\"Month\"\n2001-01,2001,01";
/// assert_eq!(locate_header(text), Some(1));
/// assert_eq!(locate_header(""), None);
/// ```
pub fn locate_header(text: &str) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, line) in text.lines().enumerate() {
        let length = line.chars().count();
        match best {
            Some((_, longest)) if longest >= length => {}
            _ => best = Some((index, length)),
        }
    }
    best.map(|(index, _)| index)
}

/// Returns `text` starting at its header row (see [`locate_header`]), with a
/// leading byte order mark removed.
pub(crate) fn from_header(text: &str) -> Option<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header = locate_header(text)?;
    Some(text.lines().skip(header).collect::<Vec<_>>().join("\n"))
}
