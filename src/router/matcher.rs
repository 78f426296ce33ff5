//! Path patterns: parsing, matching and parameter filling
//!
//! Patterns use `/static/:param/:optional?` segments and a lone `*` catch-all.
//! Static segments compare case-insensitively and trailing slashes are ignored.

use super::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Param { name: String, optional: bool },
    Wildcard,
}

/// Parameter name used for the text matched by `*`.
pub const WILDCARD_PARAM: &str = "pathMatch";

pub type Params = Vec<(String, String)>;

pub fn parse_pattern(pattern: &str) -> Vec<Segment> {
    split_path(pattern)
        .map(|seg| {
            if seg == "*" {
                Segment::Wildcard
            } else if let Some(param) = seg.strip_prefix(':') {
                match param.strip_suffix('?') {
                    Some(name) => Segment::Param {
                        name: name.to_string(),
                        optional: true,
                    },
                    None => Segment::Param {
                        name: param.to_string(),
                        optional: false,
                    },
                }
            } else {
                Segment::Static(seg.to_string())
            }
        })
        .collect()
}

/// Non-empty segments of a path.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Match `path` against `pattern`, returning decoded params on success.
pub fn match_path(pattern: &[Segment], path: &[&str]) -> Option<Params> {
    let mut params = Params::new();
    match_from(pattern, path, &mut params).then_some(params)
}

fn match_from(pattern: &[Segment], path: &[&str], params: &mut Params) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return path.is_empty();
    };
    let mark = params.len();

    match head {
        Segment::Wildcard => {
            params.push((WILDCARD_PARAM.to_string(), path.join("/")));
            true
        }
        Segment::Static(expected) => match path.split_first() {
            Some((first, tail)) if first.eq_ignore_ascii_case(expected) => {
                match_from(rest, tail, params)
            }
            _ => false,
        },
        Segment::Param { name, optional } => {
            if let Some((first, tail)) = path.split_first() {
                params.push((name.clone(), percent_decode(first)));
                if match_from(rest, tail, params) {
                    return true;
                }
                params.truncate(mark);
            }
            // Optional params may be skipped; retry the rest without consuming.
            *optional && match_from(rest, path, params)
        }
    }
}

/// Build a concrete path from a pattern and known params.
pub fn fill_params(pattern: &str, params: &Params) -> Result<String, RouteError> {
    let lookup = |name: &str| {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    let mut out = Vec::new();
    for segment in parse_pattern(pattern) {
        match segment {
            Segment::Static(s) => out.push(s),
            Segment::Param { name, optional } => match lookup(&name) {
                Some(value) => out.push(percent_encode(value)),
                None if optional => {}
                None => {
                    return Err(RouteError::MissingParam {
                        param: name,
                        pattern: pattern.to_string(),
                    })
                }
            },
            Segment::Wildcard => {
                if let Some(rest) = lookup(WILDCARD_PARAM).filter(|r| !r.is_empty()) {
                    out.push(rest.to_string());
                }
            }
        }
    }
    Ok(format!("/{}", out.join("/")))
}

/// Join a relative redirect onto its parent pattern; absolute paths pass through.
pub fn resolve_relative(target: &str, parent: Option<&str>) -> String {
    if target.starts_with('/') {
        return target.to_string();
    }
    let base = parent.unwrap_or("/").trim_end_matches('/');
    format!("{}/{}", base, target)
}

/// Decode `%XX` escapes. Invalid escapes and non-UTF-8 results are kept verbatim.
/// Inverse of [`percent_decode`] for the characters that would split or end
/// a path segment. The wildcard capture is kept raw and never passes here.
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '/' | '?' | '#' | '%' | ' ' => out.push_str(&format!("%{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

pub fn percent_decode(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(byte) = hex {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> Option<Params> {
        let segments: Vec<&str> = split_path(path).collect();
        match_path(&parse_pattern(pattern), &segments)
    }

    fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_parse_pattern() {
        assert_eq!(
            parse_pattern("/team/:id/:tab?"),
            vec![
                Segment::Static("team".into()),
                Segment::Param {
                    name: "id".into(),
                    optional: false
                },
                Segment::Param {
                    name: "tab".into(),
                    optional: true
                },
            ]
        );
        assert_eq!(parse_pattern("*"), vec![Segment::Wildcard]);
        assert!(parse_pattern("/").is_empty());
    }

    #[test]
    fn test_static_and_trailing_slash() {
        assert!(matches("/teams", "/teams/").is_some());
        assert!(matches("/teams", "/TEAMS").is_some());
        assert!(matches("/teams", "/teams/1").is_none());
        assert!(matches("/", "/").is_some());
    }

    #[test]
    fn test_required_param() {
        let params = matches("/user/:userId/:teamId", "/user/5/2").unwrap();
        assert_eq!(param(&params, "userId"), Some("5"));
        assert_eq!(param(&params, "teamId"), Some("2"));
        assert!(matches("/user/:userId/:teamId", "/user/5").is_none());
    }

    #[test]
    fn test_optional_params_backtrack() {
        let pattern = "/activity/:host/:periodLength?/:date?/view/:view_id?";

        let params = matches(pattern, "/activity/laptop/view").unwrap();
        assert_eq!(param(&params, "host"), Some("laptop"));
        assert_eq!(param(&params, "periodLength"), None);
        assert_eq!(param(&params, "view_id"), None);

        let params = matches(pattern, "/activity/laptop/day/2024-03-01/view/summary").unwrap();
        assert_eq!(param(&params, "periodLength"), Some("day"));
        assert_eq!(param(&params, "date"), Some("2024-03-01"));
        assert_eq!(param(&params, "view_id"), Some("summary"));

        let params = matches(pattern, "/activity/laptop/week/view/").unwrap();
        assert_eq!(param(&params, "periodLength"), Some("week"));
        assert_eq!(param(&params, "date"), None);
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let params = matches("*", "/no/such/page").unwrap();
        assert_eq!(param(&params, WILDCARD_PARAM), Some("no/such/page"));
    }

    #[test]
    fn test_params_are_decoded() {
        let params = matches("/buckets/:id", "/buckets/aw-watcher-window_my%20host").unwrap();
        assert_eq!(param(&params, "id"), Some("aw-watcher-window_my host"));
    }

    #[test]
    fn test_percent_decode_edge_cases() {
        assert_eq!(percent_decode("a%2Fb"), "a/b");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%C3%A9t%C3%A9"), "été");
    }

    #[test]
    fn test_fill_params() {
        let params: Params = vec![("host".into(), "laptop".into())];
        assert_eq!(
            fill_params("/activity/:host/:periodLength?/:date?/view/", &params).unwrap(),
            "/activity/laptop/view"
        );
        let err = fill_params("/team/:id", &Params::new()).unwrap_err();
        assert!(matches!(err, RouteError::MissingParam { .. }));
    }

    #[test]
    fn test_fill_params_keeps_values_in_one_segment() {
        let params: Params = vec![
            ("host".into(), "my/host".into()),
            ("date".into(), "50% off?#".into()),
        ];
        let path = fill_params("/activity/:host/:date?/view", &params).unwrap();
        assert_eq!(path, "/activity/my%2Fhost/50%25%20off%3F%23/view");

        let segments: Vec<&str> = split_path(&path).collect();
        let back = match_path(&parse_pattern("/activity/:host/:date?/view"), &segments).unwrap();
        assert_eq!(param(&back, "host"), Some("my/host"));
        assert_eq!(param(&back, "date"), Some("50% off?#"));
    }

    #[test]
    fn test_percent_encode_leaves_plain_text() {
        assert_eq!(percent_encode("aw-watcher-afk_été"), "aw-watcher-afk_été");
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative("view/", Some("/activity/:host/")),
            "/activity/:host/view/"
        );
        assert_eq!(resolve_relative("/login", Some("/activity")), "/login");
        assert_eq!(resolve_relative("teams", None), "/teams");
    }
}
