use crate::ast::{AssignmentOperator, BinaryOperator};
use crate::types::{Type, TypeSet};

fn is(ty: &Type, kind: &Type) -> bool {
    ty.matches_kind(kind)
}

fn both(left: &Type, right: &Type, kind: &Type) -> bool {
    is(left, kind) && is(right, kind)
}

/// Result of `left op right` for one pair of operand types, `None` when
/// the operator does not apply to them.
fn apply_binary(op: BinaryOperator, left: &Type, right: &Type) -> Option<Type> {
    let empty_list = Type::List(TypeSet::empty());
    let empty_dict = Type::Dict(TypeSet::empty());
    match op {
        BinaryOperator::Add => {
            if both(left, right, &Type::Str) {
                Some(Type::Str)
            } else if both(left, right, &Type::Int) {
                Some(Type::Int)
            } else if let Type::List(items) = left {
                Some(match right {
                    Type::List(other) => Type::List(items.union(other)),
                    other => Type::List(items.union(&TypeSet::single(other.clone()))),
                })
            } else if let (Type::Dict(a), Type::Dict(b)) = (left, right) {
                Some(Type::Dict(a.union(b)))
            } else {
                None
            }
        }
        BinaryOperator::Equal | BinaryOperator::NotEqual => {
            let same_scalar = [Type::Str, Type::Int, Type::Bool, empty_list, empty_dict]
                .iter()
                .any(|kind| both(left, right, kind));
            let same_object = matches!((left, right), (Type::Object(a), Type::Object(b)) if a == b);
            (same_scalar || same_object).then_some(Type::Bool)
        }
        BinaryOperator::And | BinaryOperator::Or => {
            both(left, right, &Type::Bool).then_some(Type::Bool)
        }
        BinaryOperator::Div => {
            if both(left, right, &Type::Int) {
                Some(Type::Int)
            } else if both(left, right, &Type::Str) {
                Some(Type::Str)
            } else {
                None
            }
        }
        BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => {
            (both(left, right, &Type::Int) || both(left, right, &Type::Str)).then_some(Type::Bool)
        }
        BinaryOperator::In | BinaryOperator::NotIn => Some(Type::Bool),
        BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Mod => {
            both(left, right, &Type::Int).then_some(Type::Int)
        }
    }
}

/// Outcome of applying a binary operator over two type sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BinaryOutcome {
    pub types: TypeSet,
    /// Every operand pair was rejected.
    pub all_failed: bool,
}

/// Cartesian product of the operand sets through the operator table.
/// An `any`/`any` pair never produces a result.
pub(crate) fn binary(op: BinaryOperator, left: &TypeSet, right: &TypeSet) -> BinaryOutcome {
    let mut types = Vec::new();
    let mut failures = 0;
    for l in left {
        for r in right {
            if l.is_any() && r.is_any() {
                failures += 1;
                continue;
            }
            match apply_binary(op, l, r) {
                Some(ty) => types.push(ty),
                None => failures += 1,
            }
        }
    }
    BinaryOutcome {
        types: TypeSet::new(types),
        all_failed: failures > 0 && failures == left.len() * right.len(),
    }
}

/// Result type of `lhs op= rhs`. Pairs that do not combine are dropped.
pub(crate) fn compound(op: AssignmentOperator, left: &TypeSet, right: &TypeSet) -> TypeSet {
    let mut types = Vec::new();
    for l in left {
        for r in right {
            let result = match op {
                AssignmentOperator::Equals => Some(r.clone()),
                AssignmentOperator::PlusEquals => match (l, r) {
                    (Type::List(items), Type::List(other)) => Some(Type::List(items.union(other))),
                    (Type::List(items), other) => {
                        Some(Type::List(items.union(&TypeSet::single(other.clone()))))
                    }
                    (Type::Dict(values), Type::Dict(other)) => {
                        Some(Type::Dict(values.union(other)))
                    }
                    _ if both(l, r, &Type::Str) => Some(Type::Str),
                    _ if both(l, r, &Type::Int) => Some(Type::Int),
                    _ => None,
                },
                AssignmentOperator::DivEquals => {
                    if both(l, r, &Type::Int) {
                        Some(Type::Int)
                    } else if both(l, r, &Type::Str) {
                        Some(Type::Str)
                    } else {
                        None
                    }
                }
                AssignmentOperator::MinusEquals
                | AssignmentOperator::MulEquals
                | AssignmentOperator::ModEquals => both(l, r, &Type::Int).then_some(Type::Int),
            };
            types.extend(result);
        }
    }
    TypeSet::new(types)
}

/// Loose argument compatibility: some given type fits some expected type.
/// Lists are flattened on either side, objects are accepted for any of
/// their ancestors and `any`/`disabler` fit everywhere.
pub(crate) fn compatible(expected: &TypeSet, given: &TypeSet) -> bool {
    if given.is_empty() || expected.is_empty() {
        return true;
    }
    given.iter().any(|given| {
        matches!(given, Type::Any | Type::Disabler) || fits_any(expected, given)
    })
}

fn fits_any(expected: &TypeSet, given: &Type) -> bool {
    expected.iter().any(|expected| {
        matches!(expected, Type::Any | Type::Disabler) || given.is_any() || fits(given, expected)
    })
}

fn fits(given: &Type, expected: &Type) -> bool {
    match (given, expected) {
        (Type::Object(given), Type::Object(expected)) => {
            given.lineage().any(|kind| kind == *expected)
        }
        (Type::List(items), Type::List(expected_items)) => compatible(expected_items, items),
        (Type::List(items), _) => {
            items.is_empty() || items.iter().any(|item| fits(item, expected) || item.is_any())
        }
        (_, Type::List(expected_items)) => fits_any(expected_items, given),
        (Type::Dict(values), Type::Dict(expected_values)) => compatible(expected_values, values),
        _ => std::mem::discriminant(given) == std::mem::discriminant(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectKind;

    fn set(types: impl IntoIterator<Item = Type>) -> TypeSet {
        TypeSet::new(types)
    }

    #[test]
    fn addition_follows_operand_kinds() {
        let outcome = binary(
            BinaryOperator::Add,
            &set([Type::Str, Type::list_of([Type::Str])]),
            &set([Type::Str]),
        );
        assert_eq!(outcome.types, set([Type::Str, Type::list_of([Type::Str])]));
        assert!(!outcome.all_failed);
    }

    #[test]
    fn mismatched_operands_fail_every_pair() {
        let outcome = binary(BinaryOperator::Sub, &set([Type::Str]), &set([Type::Bool]));
        assert!(outcome.all_failed);
        assert!(outcome.types.is_empty());
    }

    #[test]
    fn comparisons_and_membership_yield_bool() {
        let outcome = binary(
            BinaryOperator::In,
            &set([Type::Str]),
            &set([Type::list_of([Type::Str])]),
        );
        assert_eq!(outcome.types, set([Type::Bool]));
        let outcome = binary(BinaryOperator::Less, &set([Type::Any]), &set([Type::Int]));
        assert_eq!(outcome.types, set([Type::Bool]));
    }

    #[test]
    fn compound_plus_merges_lists() {
        let result = compound(
            AssignmentOperator::PlusEquals,
            &set([Type::list_of([Type::Str])]),
            &set([Type::list_of([Type::Str])]),
        );
        assert_eq!(result, set([Type::list_of([Type::Str])]));
    }

    #[test]
    fn compound_narrows_silently() {
        let result = compound(
            AssignmentOperator::MulEquals,
            &set([Type::Int, Type::Str]),
            &set([Type::Int]),
        );
        assert_eq!(result, set([Type::Int]));
    }

    #[test]
    fn objects_fit_their_ancestors() {
        let expected = set([Type::Object(ObjectKind::BuildTgt)]);
        assert!(compatible(&expected, &set([Type::Object(ObjectKind::Exe)])));
        assert!(!compatible(&expected, &set([Type::Object(ObjectKind::Dep)])));
        assert!(compatible(
            &set([Type::Str, Type::list_of([Type::Str])]),
            &set([Type::list_of([Type::Str])])
        ));
    }
}
