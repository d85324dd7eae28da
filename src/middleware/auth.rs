use tracing::warn;

use crate::context::{Context, Handler};

/// Static token check on the `authorization` header
///
/// Requests whose header does not equal the configured token are rejected
/// with `401 {"message": "Unauthorized"}` before any later handler runs.
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Handler for TokenAuth {
    fn handle(&self, ctx: &mut Context) {
        let provided = ctx.header("authorization");
        if provided == Some(self.token.as_str()) {
            ctx.next();
            return;
        }
        warn!(
            request_id = %ctx.request_id(),
            path = %ctx.path(),
            header_present = provided.is_some(),
            "Authorization rejected"
        );
        ctx.fail(401, "Unauthorized");
    }
}
