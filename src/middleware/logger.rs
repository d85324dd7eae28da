use std::time::Instant;
use tracing::info;

use crate::context::{Context, Handler};

/// Request logging middleware
///
/// Wraps the rest of the chain and emits one `info!` event per request once
/// downstream handlers have returned, so the logged status is the final one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl Handler for Logger {
    fn handle(&self, ctx: &mut Context) {
        let start = Instant::now();
        ctx.next();
        let latency = start.elapsed();

        info!(
            request_id = %ctx.request_id(),
            status = ctx.status().unwrap_or(200),
            method = %ctx.method(),
            path = %ctx.path(),
            latency_us = latency.as_micros() as u64,
            aborted = ctx.is_aborted(),
            "Request complete"
        );
    }
}
