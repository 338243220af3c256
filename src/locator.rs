//! The `sql` parameter of a page address.

use crate::codec;

pub const PARAM: &str = "sql";

/// Returns `address` with its `sql` parameter set to `locator`, replacing any
/// previous value. Other parameters and the fragment are kept.
pub fn with_locator(address: &str, locator: &str) -> String {
    let (without_fragment, fragment) = match address.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (address, None),
    };
    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (without_fragment, ""),
    };

    let mut params: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && param_name(pair) != PARAM)
        .collect();
    let ours = format!("{}={}", PARAM, locator);
    params.push(&ours);

    let mut out = format!("{}?{}", base, params.join("&"));
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(frag);
    }
    out
}

fn param_name(pair: &str) -> &str {
    pair.split_once('=').map(|(name, _)| name).unwrap_or(pair)
}

/// Raw (percent-decoded) value of the `sql` parameter, if the address has one.
pub fn read_locator(address: &str) -> Option<String> {
    let without_fragment = address.split('#').next().unwrap_or(address);
    let (_, query) = without_fragment.split_once('?')?;

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == PARAM)
        .map(|(_, value)| percent_decode(value))
}

/// Accepts a full address or a bare locator. `None` when nothing usable was
/// shared: no parameter, malformed encoding, or empty text.
pub fn query_from(input: &str) -> Option<String> {
    let input = input.trim();
    let locator = if input.contains('?') || input.contains("://") {
        read_locator(input)?
    } else if let Some(value) = input.strip_prefix("sql=") {
        percent_decode(value)
    } else {
        input.to_string()
    };

    let query = codec::decode(&locator);
    if query.is_empty() {
        None
    } else {
        Some(query)
    }
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_locator_adds_param() {
        assert_eq!(
            with_locator("http://localhost:8000/", "abc"),
            "http://localhost:8000/?sql=abc"
        );
    }

    #[test]
    fn test_with_locator_replaces_param() {
        assert_eq!(
            with_locator("http://x/play?lang=en&sql=old#top", "new"),
            "http://x/play?lang=en&sql=new#top"
        );
    }

    #[test]
    fn test_read_locator() {
        assert_eq!(read_locator("http://x/?a=1&sql=U0VMRUNUIDE7"), Some("U0VMRUNUIDE7".to_string()));
        assert_eq!(read_locator("http://x/?a=1"), None);
        assert_eq!(read_locator("http://x/"), None);
        assert_eq!(read_locator("http://x/#?sql=abc"), None);
    }

    #[test]
    fn test_read_locator_percent_escaped() {
        assert_eq!(read_locator("http://x/?sql=Pz4%3D"), Some("Pz4=".to_string()));
        assert_eq!(read_locator("http://x/?sql=w78%2F"), Some("w78/".to_string()));
    }

    #[test]
    fn test_query_from_address_and_bare_locator() {
        let locator = codec::encode("SELECT 1;");
        let address = with_locator("http://localhost:8000/", &locator);

        assert_eq!(query_from(&address), Some("SELECT 1;".to_string()));
        assert_eq!(query_from(&locator), Some("SELECT 1;".to_string()));
        assert_eq!(query_from(&format!("sql={}", locator)), Some("SELECT 1;".to_string()));
    }

    #[test]
    fn test_query_from_nothing_usable() {
        assert_eq!(query_from("http://localhost:8000/"), None);
        assert_eq!(query_from("http://localhost:8000/?sql=***"), None);
        assert_eq!(query_from(""), None);
    }

    #[test]
    fn test_percent_decode_keeps_stray_percent() {
        assert_eq!(percent_decode("a%2"), "a%2");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%41%42"), "AB");
    }
}
