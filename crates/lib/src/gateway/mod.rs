//! Gateway: HTTP server for platform webhooks, the stats API and the dashboard.
//!
//! Webhook routes always answer 200 with a JSON body; failures are reported inside the
//! platform reply, not through the status code.

mod dashboard;
mod server;

pub use server::{router, run_gateway, run_with_state, GatewayState};
