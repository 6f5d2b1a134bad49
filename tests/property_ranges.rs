//! Property-based tests for suffix scaling and product cardinality
//!
//! Uses proptest to check the invariants across many random inputs.

use chaincalc::product::{expand, Binding};
use chaincalc::range::{Domain, DomainMap, ParamName};
use chaincalc::suffix::{from_suffix, to_suffix};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_suffix_render_parse_stays_close(value in 0u64..(1 << 50)) {
        let rendered = to_suffix(value);
        let parsed = from_suffix(&rendered).unwrap();

        // rendering truncates, never rounds up, and keeps at least two
        // significant figures, so the loss stays under a tenth
        prop_assert!(parsed <= value);
        prop_assert!(value - parsed <= value / 10);
    }

    #[test]
    fn prop_suffix_render_exact_for_multiples(base in 0u64..10_000, power in 0u32..4) {
        let value = base * 1024u64.pow(power);
        let parsed = from_suffix(&to_suffix(value)).unwrap();
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn prop_product_cardinality(
        a in prop::collection::vec(1u64..1_000_000, 1..5),
        b in prop::collection::vec(1u64..1_000_000, 1..5),
        c in prop::collection::vec(1u64..1_000_000, 1..5),
        scalar in 1u64..1_000_000,
    ) {
        let mut domains = DomainMap::new();
        domains.insert(ParamName::MaxDataFile, Domain::Candidates(a.clone()));
        domains.insert(ParamName::BlockSize, Domain::Candidates(b.clone()));
        domains.insert(ParamName::CollisionInterval, Domain::Candidates(c.clone()));
        domains.insert(ParamName::MaxInitMem, Domain::Unset);
        domains.insert(ParamName::MaxTotalMem, Domain::Scalar(scalar));
        domains.insert(ParamName::MinMaxBlocksPerHead, Domain::Interval(1, scalar));

        let configs = expand(&domains);
        prop_assert_eq!(configs.len(), a.len() * b.len() * c.len());

        for config in &configs {
            prop_assert_eq!(config.len(), 6);
            prop_assert_eq!(config[&ParamName::MaxTotalMem], Binding::Scalar(scalar));
            prop_assert_eq!(config[&ParamName::MaxInitMem], Binding::Unset);
        }
    }

    #[test]
    fn prop_pow2_expansion_doubles_within_bounds(
        start in 1u64..(1 << 40),
        doublings in 0u32..10,
    ) {
        let end = start << doublings;
        let spec = format!("{start}-{end}");
        let domain = chaincalc::range::compile_one(
            chaincalc::ParamKind::Pow2Range,
            ParamName::BlockSize,
            &spec,
        ).unwrap();

        let Domain::Candidates(values) = domain else { panic!("expected candidates") };
        prop_assert_eq!(values.len() as u32, doublings + 1);
        for (i, &v) in values.iter().enumerate() {
            prop_assert_eq!(v, start << i);
            prop_assert!(v <= end);
        }
    }
}
