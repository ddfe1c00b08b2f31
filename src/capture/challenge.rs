//! Heuristic detection of bot-verification challenges.
//!
//! Some sites answer automated visits with a CAPTCHA or "checking your
//! browser" interstitial instead of real content. Before screenshotting, the
//! capturer probes the DOM against a fixed marker table; a match flips
//! `captcha_detected` in the diagnostics so downstream stages know the images
//! show a verification page.
//!
//! Detection is best-effort: a probe that fails (page half-loaded, script
//! blocked) counts as not-matched, so false negatives are possible and no
//! probe ever aborts a capture.

use chromiumoxide::Page;

/// CSS selectors that indicate a challenge widget is present
pub const CHALLENGE_SELECTORS: &[&str] = &[
    "iframe[src*=\"recaptcha\"]",
    "iframe[src*=\"hcaptcha\"]",
    "iframe[src*=\"turnstile\"]",
    "#challenge-form",
    "#challenge-running",
    "#cf-challenge-running",
    "[name=\"cf-turnstile-response\"]",
];

/// Lowercase text fragments that indicate a challenge page
pub const CHALLENGE_TEXT_PATTERNS: &[&str] = &[
    "i am not a robot",
    "i'm not a robot",
    "verify you are human",
    "checking your browser",
    "are you a robot",
    "verifying you are human",
];

/// Outcome of one challenge probe.
///
/// `Failed` records that the probe itself errored and was ignored, which is
/// distinct from a clean non-match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The marker matched the page
    Matched,
    /// The marker did not match
    NotMatched,
    /// The probe errored; treated as a non-match
    Failed,
}

/// Whether any probe outcome indicates a challenge
pub fn challenge_detected(outcomes: &[ProbeOutcome]) -> bool {
    outcomes.iter().any(|o| matches!(o, ProbeOutcome::Matched))
}

/// Case-insensitive substring match of a marker pattern against page HTML
pub fn text_matches(html: &str, pattern: &str) -> bool {
    html.to_lowercase().contains(pattern)
}

/// Run every challenge probe against the page.
///
/// Returns one outcome per marker, selectors first then text patterns. Probe
/// errors never propagate.
pub async fn probe_page(page: &Page) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::with_capacity(CHALLENGE_SELECTORS.len() + CHALLENGE_TEXT_PATTERNS.len());

    for selector in CHALLENGE_SELECTORS {
        outcomes.push(probe_selector(page, selector).await);
    }

    // One content fetch serves all text probes
    match page.content().await {
        Ok(html) => {
            for pattern in CHALLENGE_TEXT_PATTERNS {
                outcomes.push(if text_matches(&html, pattern) {
                    ProbeOutcome::Matched
                } else {
                    ProbeOutcome::NotMatched
                });
            }
        }
        Err(_) => outcomes.extend(CHALLENGE_TEXT_PATTERNS.iter().map(|_| ProbeOutcome::Failed)),
    }

    outcomes
}

/// Probe a single selector via `document.querySelector`
async fn probe_selector(page: &Page, selector: &str) -> ProbeOutcome {
    // JSON-encode the selector so quotes inside it survive embedding
    let script = format!(
        "document.querySelector({}) !== null",
        serde_json::json!(selector)
    );

    match page.evaluate(script).await {
        Ok(eval) => match eval.value().and_then(|v| v.as_bool()) {
            Some(true) => ProbeOutcome::Matched,
            Some(false) => ProbeOutcome::NotMatched,
            None => ProbeOutcome::Failed,
        },
        Err(_) => ProbeOutcome::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_detected_any_match() {
        let outcomes = [ProbeOutcome::NotMatched, ProbeOutcome::Matched, ProbeOutcome::Failed];
        assert!(challenge_detected(&outcomes));
    }

    #[test]
    fn test_failed_probe_is_not_a_match() {
        let outcomes = [ProbeOutcome::Failed, ProbeOutcome::NotMatched, ProbeOutcome::Failed];
        assert!(!challenge_detected(&outcomes));
    }

    #[test]
    fn test_no_probes_no_challenge() {
        assert!(!challenge_detected(&[]));
    }

    #[test]
    fn test_text_matches_case_insensitive() {
        let html = "<div>Please verify: I Am Not A Robot</div>";
        assert!(text_matches(html, "i am not a robot"));
        assert!(!text_matches(html, "checking your browser"));
    }

    #[test]
    fn test_patterns_are_lowercase() {
        // text_matches lowercases the HTML only, so the table must stay lowercase
        for pattern in CHALLENGE_TEXT_PATTERNS {
            assert_eq!(*pattern, pattern.to_lowercase());
        }
    }
}
