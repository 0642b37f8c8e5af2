//! Token resolution from the page address.
//!
//! Accepts `/{role}/{token}` paths (`p` = participant, `e` = employer) and
//! falls back to `?token=...&type=...`.

use url::Url;

use crate::error::{VerifyError, VerifyResult};
use crate::types::Role;

/// Origin used to resolve bare paths like `/p/abc`.
const PLACEHOLDER_ORIGIN: &str = "http://localhost/";

/// Token and role extracted from an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub token: Option<String>,
    pub role: Role,
}

impl ResolvedAddress {
    /// Split into token and role, failing with `MissingToken` if absent.
    pub fn require_token(self) -> VerifyResult<(String, Role)> {
        match self.token {
            Some(token) => Ok((token, self.role)),
            None => Err(VerifyError::MissingToken),
        }
    }
}

/// Resolve token and role from an absolute URL or a bare path/query.
pub fn resolve_address(address: &str) -> ResolvedAddress {
    match parse_address(address) {
        Some(url) => resolve_url(&url),
        None => ResolvedAddress {
            token: None,
            role: Role::Unknown,
        },
    }
}

/// Resolve token and role from a parsed URL.
pub fn resolve_url(url: &Url) -> ResolvedAddress {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    if let [code, token, ..] = segments.as_slice() {
        return ResolvedAddress {
            token: Some((*token).to_string()),
            role: Role::from_code(code),
        };
    }

    let mut token = None;
    let mut role = Role::Unknown;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "token" if token.is_none() => token = Some(value.into_owned()),
            "type" if role == Role::Unknown => role = Role::from_request_type(&value),
            _ => {}
        }
    }

    ResolvedAddress {
        token: token.filter(|t| !t.is_empty()),
        role,
    }
}

fn parse_address(address: &str) -> Option<Url> {
    match Url::parse(address) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PLACEHOLDER_ORIGIN)
            .and_then(|base| base.join(address))
            .ok(),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_path() {
        let resolved = resolve_address("/p/TOK123");
        assert_eq!(resolved.token.as_deref(), Some("TOK123"));
        assert_eq!(resolved.role, Role::Participant);
    }

    #[test]
    fn test_employer_path_absolute() {
        let resolved = resolve_address("https://verify.example.org/e/abc-def");
        assert_eq!(resolved.token.as_deref(), Some("abc-def"));
        assert_eq!(resolved.role, Role::Employer);
    }

    #[test]
    fn test_unknown_role_code_keeps_token() {
        let resolved = resolve_address("/x/TOK");
        assert_eq!(resolved.token.as_deref(), Some("TOK"));
        assert_eq!(resolved.role, Role::Unknown);
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let resolved = resolve_address("/p//TOK/");
        assert_eq!(resolved.token.as_deref(), Some("TOK"));
        assert_eq!(resolved.role, Role::Participant);
    }

    #[test]
    fn test_query_fallback() {
        let resolved = resolve_address("?token=abc&type=Employer");
        assert_eq!(resolved.token.as_deref(), Some("abc"));
        assert_eq!(resolved.role, Role::Employer);
    }

    #[test]
    fn test_query_fallback_single_segment() {
        let resolved = resolve_address("https://verify.example.org/p?token=abc&type=Participant");
        assert_eq!(resolved.token.as_deref(), Some("abc"));
        assert_eq!(resolved.role, Role::Participant);
    }

    #[test]
    fn test_query_type_is_not_a_role_code() {
        let resolved = resolve_address("/?token=abc&type=e");
        assert_eq!(resolved.role, Role::Unknown);
    }

    #[test]
    fn test_query_token_is_percent_decoded() {
        let resolved = resolve_address("/?token=a%2Fb");
        assert_eq!(resolved.token.as_deref(), Some("a/b"));
    }

    #[test]
    fn test_path_wins_over_query() {
        let resolved = resolve_address("/e/PATH?token=QUERY&type=Participant");
        assert_eq!(resolved.token.as_deref(), Some("PATH"));
        assert_eq!(resolved.role, Role::Employer);
    }

    #[test]
    fn test_missing_token() {
        for address in ["/", "", "/p", "/?type=Employer", "/?token="] {
            let resolved = resolve_address(address);
            assert!(resolved.token.is_none(), "address {address:?}");
            assert!(matches!(
                resolved.require_token(),
                Err(VerifyError::MissingToken)
            ));
        }
    }
}
