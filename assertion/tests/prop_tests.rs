use proptest::prelude::*;

use vouch_assertion::{parse_and_only, AssertionClause};

/// Strategy producing a valid clause string together with whether it is
/// remote.
fn arb_clause() -> impl Strategy<Value = (String, bool)> {
    let username = "[a-z][a-z0-9_]{1,14}".prop_map(|u| (u, false));
    let fingerprint = prop::array::uniform32(0u8..)
        .prop_map(|bytes| (format!("fp:{}", hex_lower(&bytes)), false));
    let social = ("(twitter|github|reddit|dns)", "[a-z][a-z0-9]{1,12}")
        .prop_map(|(s, h)| (format!("{s}:{h}"), true));
    prop_oneof![username, fingerprint, social]
}

fn hex_lower(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

proptest! {
    /// local ∪ remote reconstructs exactly the original clause set, with no
    /// clause on both sides.
    #[test]
    fn partition_reconstructs_the_assertion(clauses in prop::collection::vec(arb_clause(), 0..6)) {
        let input: Vec<String> = clauses.iter().map(|(s, _)| s.clone()).collect();
        let and = parse_and_only(&input.join("+")).unwrap();
        let expected_remote = clauses.iter().filter(|(_, remote)| *remote).count();

        let parts = and.split();
        prop_assert_eq!(parts.remote.len(), expected_remote);
        prop_assert_eq!(parts.local.len() + parts.remote.len(), and.len());

        // Every original clause appears on exactly one side.
        let mut rebuilt: Vec<AssertionClause> = parts
            .local
            .clauses()
            .iter()
            .chain(parts.remote.clauses())
            .cloned()
            .collect();
        for clause in and.clauses() {
            let pos = rebuilt.iter().position(|c| c == clause);
            prop_assert!(pos.is_some(), "clause {clause} lost by partition");
            rebuilt.remove(pos.unwrap());
        }
        prop_assert!(rebuilt.is_empty(), "partition invented clauses: {rebuilt:?}");
    }

    /// Parsing never panics on arbitrary input.
    #[test]
    fn parse_total_on_arbitrary_input(input in ".{0,64}") {
        let _ = parse_and_only(&input);
    }
}
