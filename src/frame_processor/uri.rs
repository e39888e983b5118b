// SPDX-License-Identifier: GPL-3.0-only

//! URI helpers shared by the classifier and the template encoder

/// Percent-encode a query value
///
/// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` untouched and encodes every other
/// UTF-8 byte as `%XX`, so output matches what browser-based generators emit.
pub(crate) fn urlencoding_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => result.push(byte as char),
            _ => result.push_str(&format!("%{:02X}", byte)),
        }
    }
    result
}

/// Decode a form-style query value (`+` is a space, `%XX` is a byte)
///
/// Bytes are collected before UTF-8 conversion so multi-byte sequences
/// survive. Malformed escapes are kept literally.
pub(crate) fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(byte) => {
                        result.push(byte);
                        i += 3;
                    }
                    None => {
                        result.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                result.push(b' ');
                i += 1;
            }
            other => {
                result.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&result).into_owned()
}

/// Look up the first non-empty value of `key` in a query string
pub(crate) fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (urlencoding_decode(k) == key).then(|| urlencoding_decode(v))
        })
        .next()
        .filter(|value| !value.is_empty())
}

/// Strict absolute URL check: `scheme://authority[...]`
///
/// The scheme must start with a letter followed by letters, digits, `+`,
/// `-` or `.`; the authority must be non-empty. Whitespace anywhere fails.
pub(crate) fn is_absolute_url(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((scheme, rest)) = s.split_once("://") else {
        return false;
    };

    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid_scheme {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    // Userinfo alone ("user@") is not an authority
    let host = authority.rsplit('@').next().unwrap_or_default();
    !host.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_uri_component_rules() {
        assert_eq!(urlencoding_encode("Hi there"), "Hi%20there");
        assert_eq!(urlencoding_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(urlencoding_encode("it's (ok)!"), "it's%20(ok)!");
        assert_eq!(urlencoding_encode("café"), "caf%C3%A9");
    }

    #[test]
    fn test_decode() {
        assert_eq!(urlencoding_decode("Hi%20there"), "Hi there");
        assert_eq!(urlencoding_decode("San+Francisco"), "San Francisco");
        assert_eq!(urlencoding_decode("caf%C3%A9"), "café");
        assert_eq!(urlencoding_decode("100%"), "100%");
        assert_eq!(urlencoding_decode("%zz"), "%zz");
    }

    #[test]
    fn test_query_param_first_wins_and_empty_is_absent() {
        assert_eq!(
            query_param("subject=one&subject=two", "subject"),
            Some("one".to_string())
        );
        assert_eq!(query_param("subject=&body=x", "subject"), None);
        assert_eq!(query_param("body=x", "subject"), None);
        assert_eq!(query_param("", "body"), None);
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("http://example.com/path?q=1#frag"));
        assert!(is_absolute_url("ftp://user@host"));
        assert!(is_absolute_url("git+ssh://host/repo"));

        assert!(!is_absolute_url("example.com"));
        assert!(!is_absolute_url("https://"));
        assert!(!is_absolute_url("https:///path"));
        assert!(!is_absolute_url("geo:onlyone"));
        assert!(!is_absolute_url("1http://host"));
        assert!(!is_absolute_url("https://exa mple.com"));
        assert!(!is_absolute_url("Hello World!"));
    }
}
