/// Shareable tracking link: `base` with a `tracking=<order>` query parameter
pub(crate) fn share_url(base: &str, order_name: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}tracking={}", encode_query_value(order_name))
}

/// Percent-encode everything outside the RFC 3986 unreserved set
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_tracking_param() {
        assert_eq!(
            share_url("https://shop.example/track", "TMR-O12345"),
            "https://shop.example/track?tracking=TMR-O12345"
        );
    }

    #[test]
    fn extends_existing_query() {
        assert_eq!(
            share_url("https://shop.example/track?lang=en", "TMR-O1"),
            "https://shop.example/track?lang=en&tracking=TMR-O1"
        );
    }

    #[test]
    fn encodes_reserved_and_non_ascii() {
        assert_eq!(
            share_url("https://s.example/t", "#1001 a&b"),
            "https://s.example/t?tracking=%231001%20a%26b"
        );
        assert_eq!(share_url("https://s.example/t", "é"), "https://s.example/t?tracking=%C3%A9");
    }
}
