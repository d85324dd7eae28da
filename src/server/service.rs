use may_minihttp::{HttpService, Request as RawRequest, Response as RawResponse};
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::error;

use super::request::parse_request;
use super::response::write_response;
use crate::context::{content_type, Response};
use crate::engine::Engine;
use crate::middleware::panic_message;

/// `may_minihttp` service backed by a frozen [`Engine`]
///
/// Each connection coroutine gets its own clone; all clones share the same
/// engine. Dispatch runs under a per-request `catch_unwind` so that a
/// panicking handler in an engine without
/// [`Recovery`](crate::middleware::Recovery) still produces a 500 instead of
/// tearing down the connection coroutine.
#[derive(Clone)]
pub struct AppService {
    pub engine: Arc<Engine>,
}

impl AppService {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: RawRequest, res: &mut RawResponse) -> io::Result<()> {
        let request = parse_request(req);
        let method = request.method.clone();
        let path = request.path.clone();

        let engine = &self.engine;
        let response = match catch_unwind(AssertUnwindSafe(|| engine.dispatch(request))) {
            Ok(response) => response,
            Err(panic) => {
                error!(
                    method = %method,
                    path = %path,
                    panic_message = %panic_message(panic.as_ref()),
                    "Unrecovered panic during dispatch"
                );
                Response {
                    status: 500,
                    content_type: Some(content_type::TEXT),
                    body: b"Internal Server Error".to_vec(),
                }
            }
        };

        write_response(res, response);
        Ok(())
    }
}
