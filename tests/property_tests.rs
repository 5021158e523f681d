//! Property tests for the policy header codec.

use csp_guard::policy::{Directive, Policy, SourceList, REGISTRY};
use proptest::prelude::*;

/// Source tokens free of whitespace and ';'.
fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("'self'".to_string()),
        Just("'none'".to_string()),
        Just("*".to_string()),
        Just("https:".to_string()),
        "[a-z*][a-z0-9.*:/'-]{0,20}",
    ]
}

fn source_list() -> impl Strategy<Value = SourceList> {
    prop::collection::vec(token(), 0..4).prop_map(SourceList::new)
}

prop_compose! {
    fn policy()(
        lists in prop::collection::vec(source_list(), 12),
        report_to in prop_oneof![Just(String::new()), "[a-z][a-z0-9-]{0,15}"],
    ) -> Policy {
        let mut lists = lists.into_iter();
        let mut next = || lists.next().unwrap_or_default();
        Policy {
            child_src: next(),
            connect_src: next(),
            default_src: next(),
            font_src: next(),
            frame_src: next(),
            img_src: next(),
            manifest_src: next(),
            media_src: next(),
            object_src: next(),
            script_src: next(),
            style_src: next(),
            worker_src: next(),
            report_to,
            report_only: false,
        }
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode(policy in policy()) {
        let encoded = policy.encode().unwrap();
        prop_assert_eq!(Policy::decode(&encoded), policy);
    }

    #[test]
    fn encoding_is_stable(policy in policy()) {
        let encoded = policy.encode().unwrap();
        let again = Policy::decode(&encoded).encode().unwrap();
        prop_assert_eq!(again, encoded);
    }

    #[test]
    fn encoded_directives_follow_registry_order(policy in policy()) {
        let encoded = policy.encode().unwrap();
        let names: Vec<Directive> = encoded
            .split("; ")
            .filter(|s| !s.is_empty())
            .map(|s| s.split(' ').next().unwrap().parse().unwrap())
            .collect();
        let expected: Vec<Directive> = policy.directives().map(|(d, _)| d).collect();
        prop_assert_eq!(&names, &expected);

        let positions: Vec<usize> = names
            .iter()
            .map(|d| REGISTRY.iter().position(|e| e.directive == *d).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn empty_directives_never_encoded(policy in policy()) {
        let encoded = policy.encode().unwrap();
        for (directive, slot) in REGISTRY.iter().map(|e| (e.directive, e.slot(&policy))) {
            let mentioned = encoded
                .split("; ")
                .any(|s| s.split(' ').next() == Some(directive.as_str()));
            prop_assert_eq!(mentioned, slot.is_present());
        }
    }

    #[test]
    fn decode_never_panics(text in ".{0,200}") {
        let _ = Policy::decode(&text);
    }

    #[test]
    fn unknown_segments_are_ignored(policy in policy(), name in "x-[a-z]{1,8}", value in "[a-z]{1,8}") {
        let encoded = policy.encode().unwrap();
        let noisy = format!("{name} {value}; {encoded}; {name}");
        prop_assert_eq!(Policy::decode(&noisy), policy);
    }
}
