//! Access report and health probe
//!
//! The report is rendered and printed regardless of the readiness outcome
//! so the operator always gets the URLs and the follow-up commands. The
//! HTTP probe is best-effort only: a freshly started stack may not accept
//! connections yet, so a probe failure is a warning, never an error.

use std::fmt::Write as _;
use std::time::Duration;

use crate::config::DeploymentConfig;
use crate::readiness::ReadinessResult;

/// Local access URL for the resolved port
pub fn local_url(port: u32) -> String {
    format!("http://localhost:{port}/")
}

/// Public access URL for the resolved domain
pub fn domain_url(domain: &str) -> String {
    format!("https://{domain}/")
}

/// Render the access URLs and operational hints.
pub fn render_access_report(
    config: &DeploymentConfig,
    readiness: ReadinessResult,
    backend: &str,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "📡 Access");
    let _ = writeln!(out, "  Local:   {}", local_url(config.port));
    let _ = writeln!(out, "  Domain:  {}", domain_url(&config.domain));
    let _ = writeln!(out);

    match readiness {
        ReadinessResult::Ready => {
            let _ = writeln!(out, "🟢 Stack is up.");
        }
        ReadinessResult::NotReady => {
            let _ = writeln!(out, "🔴 No service reported up - the stack may still be starting.");
        }
        ReadinessResult::Failed => {
            let _ = writeln!(out, "🔴 Could not query service status.");
        }
    }
    let _ = writeln!(out, "   View logs:  {backend} logs -f");
    let _ = writeln!(out, "   Shut down:  {backend} down");

    out
}

/// One best-effort HTTP probe against the local URL.
///
/// Returns the HTTP status code, or the connection error as text.
pub fn probe_health(port: u32, timeout: Duration) -> Result<u16, String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| e.to_string())?;

    client
        .get(local_url(port))
        .send()
        .map(|resp| resp.status().as_u16())
        .map_err(|e| e.to_string())
}
