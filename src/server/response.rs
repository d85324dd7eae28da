use may_minihttp::Response as RawResponse;

use crate::context::{content_type, Response};

/// Canonical reason phrase for a status code
pub(crate) fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

/// `may_minihttp` only accepts `'static` header lines
fn content_type_header(ct: &str) -> &'static str {
    match ct {
        content_type::JSON => "Content-Type: application/json",
        content_type::TEXT => "Content-Type: text/plain; charset=utf-8",
        content_type::HTML => "Content-Type: text/html; charset=utf-8",
        _ => "Content-Type: application/octet-stream",
    }
}

/// Write a finalized engine response onto the wire response
pub fn write_response(res: &mut RawResponse, response: Response) {
    res.status_code(response.status as usize, status_reason(response.status));
    if let Some(ct) = response.content_type {
        res.header(content_type_header(ct));
    }
    res.body_vec(response.body);
}
