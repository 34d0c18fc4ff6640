use crate::types::FailureReason;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Statuses the directory brute forcer treats as a hit.
pub const DIR_HIT_STATUSES: &[u16] = &[200, 301, 302, 403];

/// Successful HTTP probe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HttpHit {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub content_length: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    pub directory_listing: bool,
    /// Names of sensitive patterns that matched the body.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub leaks: Vec<String>,
}

/// GET `url` and classify the response against `accepted` status codes.
///
/// A reachable server answering with a status outside the accepted set is an
/// `http_error` failure; transport problems map to their own reasons. The
/// body is always read: `content_length` prefers the header but falls back
/// to the body size when the server omits it. The snippet is the first
/// `snippet_limit` characters with runs of whitespace collapsed (0 disables
/// snippet capture), and each `(name, regex)` in `patterns` that matches the
/// body is reported by name in `leaks`.
pub async fn get_probe(
    client: reqwest::Client,
    url: String,
    user_agent: String,
    accepted: Vec<u16>,
    snippet_limit: usize,
    patterns: Vec<(&'static str, Regex)>,
) -> Result<HttpHit, FailureReason> {
    let resp = client
        .get(&url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .send()
        .await
        .map_err(classify_reqwest)?;

    let status = resp.status().as_u16();
    if !accepted.contains(&status) {
        return Err(FailureReason::HttpError);
    }

    let final_url = resp.url().to_string();
    let header_len = resp.content_length();
    let body = resp.text().await.map_err(classify_reqwest)?;

    let content_length = header_len.unwrap_or(body.len() as u64);
    let directory_listing = body.contains("Index of /") || body.contains("Directory listing");
    let snippet = if snippet_limit > 0 {
        collapse_snippet(&body, snippet_limit)
    } else {
        None
    };
    let leaks = patterns
        .iter()
        .filter(|(_, re)| re.is_match(&body))
        .map(|(name, _)| name.to_string())
        .collect();

    Ok(HttpHit {
        url: final_url,
        status,
        content_length,
        snippet,
        directory_listing,
        leaks,
    })
}

/// Collapse whitespace runs and truncate to `limit` characters.
fn collapse_snippet(body: &str, limit: usize) -> Option<String> {
    let collapsed: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(limit).collect())
}

fn classify_reqwest(err: reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Timeout
    } else if err.is_connect() {
        FailureReason::ConnectionRefused
    } else {
        FailureReason::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_collapses_whitespace_and_truncates() {
        let s = collapse_snippet("a\n\n  b\tc   d", 5).unwrap();
        assert_eq!(s, "a b c");
    }

    #[test]
    fn empty_body_yields_no_snippet() {
        assert_eq!(collapse_snippet("   \n\t ", 10), None);
    }
}
