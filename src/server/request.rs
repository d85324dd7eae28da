use may_minihttp::Request as RawRequest;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::{HeaderVec, Request};

/// Copy a `may_minihttp` request into a transport-neutral [`Request`]
///
/// Headers keep their original spelling; lookups through
/// [`Request::header`] are case-insensitive. A body that fails to read is
/// treated as empty.
pub fn parse_request(req: RawRequest) -> Request {
    let method = req.method().to_string();
    let target = req.path().to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::<str>::from(h.name),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let mut body = Vec::new();
    if let Err(e) = req.body().read_to_end(&mut body) {
        warn!(method = %method, target = %target, error = %e, "Failed to read request body");
        body.clear();
    }

    debug!(
        method = %method,
        target = %target,
        header_count = headers.len(),
        body_bytes = body.len(),
        "Request parsed"
    );

    let mut request = Request::new(method, &target);
    request.headers = headers;
    request.body = body;
    request
}
