//! `Link` response-header parsing.
//!
//! The LMS advertises pagination as RFC-5988-style relations:
//!
//! ```text
//! <https://lms.test/api/v1/courses/1/users?page=2>; rel="next",
//! <https://lms.test/api/v1/courses/1/users?page=9>; rel="last"
//! ```
//!
//! The cursor for the fetch loop is the URL tagged `rel="next"`; its
//! absence ends the collection. Pure string parsing, tolerant of extra
//! whitespace and of segments carrying several relation names.

/// Parse a `Link` header into `(rel, url)` pairs.
///
/// Segments without a `<url>` part or a `rel` parameter are skipped. A
/// `rel` parameter naming several space-separated relations yields one
/// pair per relation.
pub fn parse_link_header(header: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for segment in header.split(',') {
        let segment = segment.trim();
        let Some(rest) = segment.strip_prefix('<') else {
            continue;
        };
        let Some(close) = rest.find('>') else {
            continue;
        };
        let url = &rest[..close];
        for param in rest[close + 1..].split(';') {
            let param = param.trim();
            let Some(value) = param.strip_prefix("rel=") else {
                continue;
            };
            let value = value.trim().trim_matches('"');
            for rel in value.split_whitespace() {
                out.push((rel.to_string(), url.to_string()));
            }
        }
    }
    out
}

/// The URL tagged `rel="next"`, or None when the chain ends here.
pub fn next_link(header: &str) -> Option<String> {
    parse_link_header(header)
        .into_iter()
        .find(|(rel, _)| rel == "next")
        .map(|(_, url)| url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS_STYLE: &str = "<https://lms.test/api/v1/courses/1/users?page=2&per_page=10>; rel=\"current\",\
                                <https://lms.test/api/v1/courses/1/users?page=3&per_page=10>; rel=\"next\",\
                                <https://lms.test/api/v1/courses/1/users?page=1&per_page=10>; rel=\"first\",\
                                <https://lms.test/api/v1/courses/1/users?page=9&per_page=10>; rel=\"last\"";

    #[test]
    fn selects_next_relation() {
        assert_eq!(
            next_link(CANVAS_STYLE).as_deref(),
            Some("https://lms.test/api/v1/courses/1/users?page=3&per_page=10")
        );
    }

    #[test]
    fn parses_all_relations() {
        let rels = parse_link_header(CANVAS_STYLE);
        assert_eq!(rels.len(), 4);
        assert_eq!(rels[0].0, "current");
        assert_eq!(rels[3].0, "last");
    }

    #[test]
    fn no_next_means_none() {
        let header = "<https://lms.test/a?page=1>; rel=\"first\", <https://lms.test/a?page=1>; rel=\"last\"";
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn tolerates_whitespace() {
        let sloppy = " <https://lms.test/a?page=2>;   rel=\"next\" ,<https://lms.test/a?page=9>;rel=\"last\"";
        assert_eq!(next_link(sloppy).as_deref(), Some("https://lms.test/a?page=2"));
    }

    #[test]
    fn unquoted_rel_accepted() {
        let header = "<https://lms.test/a?page=4>; rel=next";
        assert_eq!(next_link(header).as_deref(), Some("https://lms.test/a?page=4"));
    }

    #[test]
    fn multi_valued_rel() {
        let header = "<https://lms.test/a?page=2>; rel=\"next prefetch\"";
        assert_eq!(next_link(header).as_deref(), Some("https://lms.test/a?page=2"));
    }

    #[test]
    fn malformed_segments_skipped() {
        assert_eq!(next_link("garbage"), None);
        assert_eq!(next_link("<no-close; rel=\"next\""), None);
        assert_eq!(next_link(""), None);
    }
}
