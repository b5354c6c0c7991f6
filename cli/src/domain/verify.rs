//! Final verification targets and verdict.

use serde::Serialize;

use crate::domain::config::SiteConfig;

/// Share of endpoints that must answer `200` for a deployment to count as verified.
pub const VERIFY_PASS_RATE: f64 = 75.0;

/// One endpoint to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyTarget {
    pub name: String,
    pub url: String,
}

/// Result for one endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResult {
    pub name: String,
    pub url: String,
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status_code == Some(200)
    }
}

/// All results plus the overall verdict.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub results: Vec<VerifyResult>,
    pub passed: usize,
    pub total: usize,
    pub success_rate: f64,
    pub verified: bool,
}

impl VerificationReport {
    /// Compute the verdict over `results`.
    #[must_use]
    pub fn from_results(results: Vec<VerifyResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let success_rate = if total == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)] // endpoint counts are tiny
            let rate = passed as f64 * 100.0 / total as f64;
            rate
        };
        Self {
            results,
            passed,
            total,
            success_rate,
            verified: total > 0 && success_rate >= VERIFY_PASS_RATE,
        }
    }
}

/// Endpoints checked by `verify`: main page, database setup, admin, health.
#[must_use]
pub fn default_targets(config: &SiteConfig) -> Vec<VerifyTarget> {
    [
        ("Main Page", ""),
        ("Database Setup", config.site.db_setup_path.as_str()),
        ("Admin Panel", config.site.admin_path.as_str()),
        ("API Health", config.site.health_path.as_str()),
    ]
    .into_iter()
    .map(|(name, path)| VerifyTarget {
        name: name.to_string(),
        url: config.site_url(path),
    })
    .collect()
}
