//! Fixture file naming.
//!
//! Positive fixtures carry the expected indicator centre in their name:
//! `<anything>_<x>_<y>.<ext>`.

use std::path::Path;

/// Expected `(x, y)` encoded in a fixture file name, if any.
///
/// Only the last two `_`-separated fields of the file stem are read, so
/// `match_12_345_678.jpg` gives `(345, 678)`.
pub fn parse_fixture_coords(name: impl AsRef<Path>) -> Option<(usize, usize)> {
    let stem = name.as_ref().file_stem()?.to_str()?;
    let mut fields = stem.rsplit('_');
    let y = fields.next()?.parse().ok()?;
    let x = fields.next()?.parse().ok()?;
    Some((x, y))
}
