//! Domain key canonicalization.
//!
//! Every domain is normalized before it is stored or compared, so `HTTPS://Example.com/`
//! and `example.com` are the same watchlist entry. No syntax validation happens here:
//! malformed input is passed through and simply fails the remote check later.

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Canonicalize a user-supplied domain string.
///
/// Lower-cases, strips any leading `http://` / `https://` (repeated prefixes too),
/// strips leading and trailing `/`, and trims whitespace. The result is a fixed
/// point: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut s = lowered.as_str();
    loop {
        s = s.trim_start_matches(is_edge);
        match SCHEMES.iter().find_map(|scheme| s.strip_prefix(*scheme)) {
            Some(rest) => s = rest,
            None => break,
        }
    }
    // Trailing slashes only after every scheme is gone, or `https://` would end up as `https:`.
    s.trim_end_matches(is_edge).to_string()
}

fn is_edge(c: char) -> bool {
    c == '/' || c.is_whitespace()
}

/// Split command arguments into normalized domains.
///
/// Any whitespace separates entries (a pasted multi-line list works). Empty results
/// are dropped; duplicates keep their first position.
pub fn parse_domain_args(args: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in args.split_whitespace() {
        let d = normalize(token);
        if d.is_empty() || out.contains(&d) {
            continue;
        }
        out.push(d);
    }
    out
}

/// Display form of a stored domain.
pub fn domain_url(domain: &str) -> String {
    format!("https://{domain}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_case_and_slashes() {
        assert_eq!(normalize("HTTPS://Example.com/"), "example.com");
        assert_eq!(normalize("http://a.com"), "a.com");
        assert_eq!(normalize("  /b.org//  "), "b.org");
        assert_eq!(normalize("c.net"), "c.net");
    }

    #[test]
    fn is_idempotent_on_nested_prefixes() {
        let inputs = [
            "https://https://x.com/",
            "/http://Y.com/",
            " HTTP://z.com / ",
            "https://",
            "",
            "sub.domain.io/path",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
        assert_eq!(normalize("https://https://x.com/"), "x.com");
        assert_eq!(normalize("https://"), "");
    }

    #[test]
    fn bare_scheme_normalizes_to_empty() {
        for input in ["https://", "HTTP://", " http:/// ", "https://http://", "/https://"] {
            assert_eq!(normalize(input), "", "input {input:?}");
        }
        assert!(parse_domain_args("https:// http:// /").is_empty());
    }

    #[test]
    fn keeps_inner_path_untouched() {
        assert_eq!(normalize("https://a.com/path/"), "a.com/path");
    }

    #[test]
    fn parses_args_across_lines_and_dedupes() {
        let got = parse_domain_args("a.com\nHTTPS://b.com/  a.com\n\n  /  c.com");
        assert_eq!(got, vec!["a.com", "b.com", "c.com"]);
        assert!(parse_domain_args("   \n ").is_empty());
    }

    #[test]
    fn url_form() {
        assert_eq!(domain_url("a.com"), "https://a.com/");
    }
}
