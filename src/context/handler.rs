use std::sync::Arc;

use super::Context;

/// Anything that can take part in a middleware chain.
///
/// Route handlers and middleware share this one contract: they receive the
/// request's [`Context`] and may call [`Context::next`] to run the rest of the
/// chain inline, which lets them run logic both before and after downstream
/// handlers.
///
/// Closures taking `&mut Context` implement it automatically:
///
/// ```rust
/// use relayrouter::{Context, Handler};
///
/// fn assert_handler<H: Handler>(_: H) {}
/// assert_handler(|ctx: &mut Context| ctx.write_text(200, "pong"));
/// ```
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, ctx: &mut Context);
}

impl<F> Handler for F
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    fn handle(&self, ctx: &mut Context) {
        self(ctx)
    }
}

/// Shared, type-erased handler as stored in route tables and group lists
pub type HandlerFunc = Arc<dyn Handler>;
