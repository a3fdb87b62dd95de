//! Dashboard page: static HTML that polls `/api/stats`.

static DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

const POLL_PLACEHOLDER: &str = "{{POLL_INTERVAL_MS}}";

/// Poll intervals below this are raised to it.
const MIN_POLL_INTERVAL_MS: u64 = 500;

/// Render the dashboard with the given poll interval.
pub fn render(poll_interval_ms: u64) -> String {
    let interval = poll_interval_ms.max(MIN_POLL_INTERVAL_MS);
    DASHBOARD_HTML.replace(POLL_PLACEHOLDER, &interval.to_string())
}
