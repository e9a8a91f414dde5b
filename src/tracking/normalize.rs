//! Order identifier normalization
//!
//! Shopify order names are stored in the WMS as `TMR-O<digits>`, while
//! customers usually type `TMR-<digits>` or lowercase variants.

const PREFIX: &str = "TMR-";
const INFIX: char = 'O';

/// Canonicalize a user-entered order name.
///
/// Inputs starting with `TMR-` (any case) but lacking the `O` infix get the
/// prefix rewritten to `TMR-O`; the remainder keeps its original case.
/// Anything else, including the empty string, is returned unchanged.
pub(crate) fn normalize_order_name(raw: &str) -> String {
    let Some(prefix) = raw.get(..PREFIX.len()) else {
        return raw.to_string();
    };
    if !prefix.eq_ignore_ascii_case(PREFIX) {
        return raw.to_string();
    }
    let rest = &raw[PREFIX.len()..];
    if rest
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&INFIX))
    {
        return raw.to_string();
    }
    format!("{PREFIX}{INFIX}{rest}")
}
