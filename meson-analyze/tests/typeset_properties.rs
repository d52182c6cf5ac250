//! Property-based tests for type set normalization.
//!
//! Arbitrary bags of types, including nested containers, are normalized and
//! checked against the canonical form every consumer relies on.

use meson_analyze::{dedup, ObjectKind, Type, TypeSet};
use proptest::prelude::*;

fn object_kind() -> impl Strategy<Value = ObjectKind> {
    prop_oneof![
        Just(ObjectKind::Exe),
        Just(ObjectKind::Lib),
        Just(ObjectKind::Dep),
        Just(ObjectKind::File),
        Just(ObjectKind::Compiler),
        Just(ObjectKind::Tgt),
    ]
}

fn leaf_type() -> impl Strategy<Value = Type> {
    prop_oneof![
        Just(Type::Any),
        Just(Type::Bool),
        Just(Type::Int),
        Just(Type::Str),
        Just(Type::Void),
        Just(Type::Disabler),
        object_kind().prop_map(Type::Object),
    ]
}

fn arb_type() -> impl Strategy<Value = Type> {
    leaf_type().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Type::list_of),
            prop::collection::vec(inner, 0..4).prop_map(Type::dict_of),
        ]
    })
}

fn arb_bag() -> impl Strategy<Value = Vec<Type>> {
    prop::collection::vec(arb_type(), 0..8)
}

/// Checks the canonical-form rules on `set` and every nested element set.
fn assert_canonical(set: &TypeSet) -> Result<(), TestCaseError> {
    for scalar in [Type::Any, Type::Bool, Type::Int, Type::Str, Type::Disabler] {
        let count = set.iter().filter(|ty| **ty == scalar).count();
        prop_assert!(count <= 1, "{} appears {} times in {}", scalar, count, set);
    }
    let lists = set.iter().filter(|ty| matches!(ty, Type::List(_))).count();
    let dicts = set.iter().filter(|ty| matches!(ty, Type::Dict(_))).count();
    prop_assert!(lists <= 1, "several lists in {}", set);
    prop_assert!(dicts <= 1, "several dicts in {}", set);
    if set.contains(&Type::Void) {
        prop_assert_eq!(set.len(), 1, "void next to other types in {}", set);
    }
    for ty in set {
        if let Type::List(inner) | Type::Dict(inner) = ty {
            assert_canonical(inner)?;
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn normalization_is_canonical(bag in arb_bag()) {
        assert_canonical(&dedup(bag))?;
    }

    #[test]
    fn normalization_is_idempotent(bag in arb_bag()) {
        let once = dedup(bag);
        let twice = dedup(once.iter().cloned());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn input_order_does_not_matter(bag in arb_bag()) {
        let mut reversed = bag.clone();
        reversed.reverse();
        prop_assert_eq!(dedup(bag), dedup(reversed));
    }

    #[test]
    fn union_keeps_every_kind(a in arb_bag(), b in arb_bag()) {
        let left = dedup(a);
        let right = dedup(b);
        let union = left.union(&right);
        for ty in left.iter().chain(right.iter()) {
            if *ty == Type::Void {
                continue;
            }
            prop_assert!(
                union.iter().any(|member| member.matches_kind(ty) && ty.matches_kind(member)),
                "{} lost from {}", ty, union
            );
        }
        prop_assert_eq!(union.clone(), right.union(&left));
    }
}
