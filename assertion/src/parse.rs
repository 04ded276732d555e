//! AND-only assertion grammar.
//!
//! Clauses are joined by `+` (or `&&`). Each clause is one of:
//!
//! - a bare username: `alice`
//! - a key fingerprint: `fp:<hex>` or a bare 64-char hex string
//! - a social proof: `<service>:<handle>`, e.g. `twitter:alice`
//!
//! Values normalize to lowercase. The empty string parses to the empty
//! conjunction.

use crate::error::AssertionParseError;
use crate::expr::{AssertionAnd, AssertionClause};
use vouch_types::{KeyFingerprint, ProofService, Username};

/// Parse a caller-supplied assertion string into a conjunction.
pub fn parse_and_only(input: &str) -> Result<AssertionAnd, AssertionParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(AssertionAnd::empty());
    }

    let normalized = trimmed.replace("&&", "+");
    let mut clauses = Vec::new();
    for raw in normalized.split('+') {
        clauses.push(parse_clause(raw.trim())?);
    }
    Ok(AssertionAnd::from_clauses(clauses))
}

fn parse_clause(raw: &str) -> Result<AssertionClause, AssertionParseError> {
    if raw.is_empty() {
        return Err(AssertionParseError::EmptyClause);
    }

    if let Some((prefix, rest)) = raw.split_once(':') {
        let prefix = prefix.trim().to_ascii_lowercase();
        let rest = rest.trim();

        if prefix == "fp" {
            let fp: KeyFingerprint = rest
                .to_ascii_lowercase()
                .parse()
                .map_err(|_| AssertionParseError::BadFingerprint(rest.to_string()))?;
            return Ok(AssertionClause::Fingerprint(fp));
        }

        let service: ProofService = prefix
            .parse()
            .map_err(|_| AssertionParseError::UnknownService(prefix.clone()))?;
        let handle = rest.to_ascii_lowercase();
        if handle.is_empty() || handle.chars().any(|c| c.is_ascii_whitespace()) {
            return Err(AssertionParseError::BadHandle {
                service,
                handle: rest.to_string(),
            });
        }
        return Ok(AssertionClause::Social { service, handle });
    }

    // A bare 64-char hex string reads as a fingerprint, not a username.
    if raw.len() == 64 && raw.chars().all(|c| c.is_ascii_hexdigit()) {
        let fp: KeyFingerprint = raw
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| AssertionParseError::BadFingerprint(raw.to_string()))?;
        return Ok(AssertionClause::Fingerprint(fp));
    }

    let name = Username::new(raw).map_err(|_| AssertionParseError::BadUsername(raw.to_string()))?;
    Ok(AssertionClause::Username(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_types::ProofKind;

    #[test]
    fn empty_input_is_empty_conjunction() {
        assert!(parse_and_only("").unwrap().is_empty());
        assert!(parse_and_only("   ").unwrap().is_empty());
    }

    #[test]
    fn parses_bare_username() {
        let and = parse_and_only("Alice").unwrap();
        assert_eq!(and.len(), 1);
        match &and.clauses()[0] {
            AssertionClause::Username(u) => assert_eq!(u.as_str(), "alice"),
            other => panic!("expected username clause, got {other:?}"),
        }
    }

    #[test]
    fn parses_social_clause() {
        let and = parse_and_only("twitter:Alice").unwrap();
        match &and.clauses()[0] {
            AssertionClause::Social { service, handle } => {
                assert_eq!(*service, ProofService::Twitter);
                assert_eq!(handle, "alice");
            }
            other => panic!("expected social clause, got {other:?}"),
        }
    }

    #[test]
    fn parses_fingerprint_both_forms() {
        let fp = KeyFingerprint::of_bytes(b"some key");
        let hex = fp.to_hex();

        for input in [format!("fp:{hex}"), hex.clone()] {
            let and = parse_and_only(&input).unwrap();
            assert_eq!(
                and.clauses()[0],
                AssertionClause::Fingerprint(fp),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn parses_conjunction_with_both_separators() {
        let and = parse_and_only("alice + twitter:alice && github:alice").unwrap();
        assert_eq!(and.len(), 3);

        let parts = and.split();
        assert_eq!(parts.local.len(), 1);
        assert_eq!(parts.remote.len(), 2);
    }

    #[test]
    fn rejects_dangling_operator() {
        assert_eq!(
            parse_and_only("alice+"),
            Err(AssertionParseError::EmptyClause)
        );
    }

    #[test]
    fn rejects_unknown_service() {
        assert_eq!(
            parse_and_only("myspace:alice"),
            Err(AssertionParseError::UnknownService("myspace".to_string()))
        );
    }

    #[test]
    fn rejects_empty_handle() {
        assert!(matches!(
            parse_and_only("twitter:"),
            Err(AssertionParseError::BadHandle { .. })
        ));
    }

    #[test]
    fn rejects_bad_fingerprint() {
        assert!(matches!(
            parse_and_only("fp:nothex"),
            Err(AssertionParseError::BadFingerprint(_))
        ));
    }

    #[test]
    fn clause_kinds_map_to_proof_kinds() {
        let and = parse_and_only("alice+twitter:alice").unwrap();
        assert_eq!(and.clauses()[0].proof_kind(), ProofKind::Username);
        assert_eq!(
            and.clauses()[1].proof_kind(),
            ProofKind::Social(ProofService::Twitter)
        );
    }
}
