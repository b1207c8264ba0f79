use super::HopResponse;

/// Parse collected header lines into a HopResponse.
///
/// `status` comes from the transport. When a response carries several header
/// blocks (e.g. `100 Continue` or a proxy `CONNECT` reply first), only the
/// last block counts: each status line starts from empty fields.
pub(crate) fn parse_headers(status: u32, lines: &[String]) -> HopResponse {
    let mut location = None;
    let mut content_type = None;
    let mut content_length = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            location = None;
            content_type = None;
            content_length = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    content_length = Some(n);
                }
            }
        }
    }

    HopResponse {
        status,
        location,
        content_type,
        content_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_redirect_location() {
        let r = parse_headers(
            302,
            &lines(&["HTTP/1.1 302 Found", "Location: http://169.254.169.254/", ""]),
        );
        assert_eq!(r.status, 302);
        assert_eq!(r.location.as_deref(), Some("http://169.254.169.254/"));
    }

    #[test]
    fn status_line_is_not_a_header() {
        let r = parse_headers(200, &lines(&["HTTP/1.1 200 OK"]));
        assert!(r.location.is_none());
    }

    #[test]
    fn parse_content_type_and_length() {
        let r = parse_headers(
            200,
            &lines(&[
                "HTTP/1.1 200 OK",
                "content-type: text/html; charset=utf-8",
                "Content-Length: 5120",
            ]),
        );
        assert_eq!(r.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(r.content_length, Some(5120));
    }

    #[test]
    fn later_header_block_wins() {
        let r = parse_headers(
            200,
            &lines(&[
                "HTTP/1.1 100 Continue",
                "Content-Type: text/plain",
                "",
                "HTTP/1.1 200 OK",
                "Content-Type: image/png",
            ]),
        );
        assert_eq!(r.content_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn interim_block_headers_do_not_leak() {
        let r = parse_headers(
            200,
            &lines(&[
                "HTTP/1.1 200 Connection established",
                "Location: http://127.0.0.1/",
                "Content-Length: 0",
                "",
                "HTTP/1.1 200 OK",
                "Content-Type: text/html",
            ]),
        );
        assert!(r.location.is_none());
        assert!(r.content_length.is_none());
        assert_eq!(r.content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn bad_content_length_ignored() {
        let r = parse_headers(200, &lines(&["Content-Length: lots"]));
        assert!(r.content_length.is_none());
    }
}
