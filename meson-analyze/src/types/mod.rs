use std::fmt;

mod objects;

pub use objects::ObjectKind;

/// A possible runtime type of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Any,
    Bool,
    Int,
    Str,
    List(TypeSet),
    Dict(TypeSet),
    Void,
    Disabler,
    Object(ObjectKind),
}

impl Type {
    /// Name used to look up the type's vtable in the catalog.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Any => "any",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Str => "str",
            Type::List(_) => "list",
            Type::Dict(_) => "dict",
            Type::Void => "void",
            Type::Disabler => "disabler",
            Type::Object(kind) => kind.name(),
        }
    }

    pub fn list_of(elements: impl IntoIterator<Item = Type>) -> Type {
        Type::List(TypeSet::new(elements))
    }

    pub fn dict_of(values: impl IntoIterator<Item = Type>) -> Type {
        Type::Dict(TypeSet::new(values))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Any)
    }

    /// True when `self` is `other`'s kind or is `any`. Containers match by
    /// kind only, their element sets are ignored.
    pub fn matches_kind(&self, other: &Type) -> bool {
        self.is_any() || std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::List(elements) if elements.is_empty() => write!(f, "list"),
            Type::List(elements) => write!(f, "list({elements})"),
            Type::Dict(values) if values.is_empty() => write!(f, "dict"),
            Type::Dict(values) => write!(f, "dict({values})"),
            other => f.write_str(other.name()),
        }
    }
}

/// A deduplicated set of types.
///
/// The representation is canonical: at most one entry per scalar kind, at
/// most one `List` and one `Dict` (with deduplicated element sets), objects
/// ordered by name, and `Void` only when nothing else is present. Two sets
/// holding the same types therefore compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeSet(Vec<Type>);

impl TypeSet {
    pub fn new(types: impl IntoIterator<Item = Type>) -> Self {
        dedup(types)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn single(ty: Type) -> Self {
        Self::new([ty])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Type> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.0.contains(ty)
    }

    pub fn as_slice(&self) -> &[Type] {
        &self.0
    }

    pub fn union(&self, other: &TypeSet) -> TypeSet {
        dedup(self.0.iter().chain(other.0.iter()).cloned())
    }
}

impl<'a> IntoIterator for &'a TypeSet {
    type Item = &'a Type;
    type IntoIter = std::slice::Iter<'a, Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Type> for TypeSet {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        dedup(iter)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered: Vec<String> = self.0.iter().map(|ty| ty.to_string()).collect();
        rendered.sort();
        f.write_str(&rendered.join("|"))
    }
}

/// Normalizes a bag of types into a [`TypeSet`].
pub fn dedup(types: impl IntoIterator<Item = Type>) -> TypeSet {
    let mut list_elements: Vec<Type> = Vec::new();
    let mut dict_values: Vec<Type> = Vec::new();
    let mut got_list = false;
    let mut got_dict = false;
    let mut has_any = false;
    let mut has_bool = false;
    let mut has_int = false;
    let mut has_str = false;
    let mut has_void = false;
    let mut has_disabler = false;
    let mut objects: Vec<ObjectKind> = Vec::new();

    for ty in types {
        match ty {
            Type::Any => has_any = true,
            Type::Bool => has_bool = true,
            Type::Int => has_int = true,
            Type::Str => has_str = true,
            Type::Void => has_void = true,
            Type::Disabler => has_disabler = true,
            Type::List(elements) => {
                got_list = true;
                list_elements.extend(elements.0);
            }
            Type::Dict(values) => {
                got_dict = true;
                dict_values.extend(values.0);
            }
            Type::Object(kind) => {
                if !objects.contains(&kind) {
                    objects.push(kind);
                }
            }
        }
    }

    let mut result = Vec::new();
    if got_list {
        result.push(Type::List(dedup(list_elements)));
    }
    if got_dict {
        result.push(Type::Dict(dedup(dict_values)));
    }
    if has_any {
        result.push(Type::Any);
    }
    if has_bool {
        result.push(Type::Bool);
    }
    if has_int {
        result.push(Type::Int);
    }
    if has_str {
        result.push(Type::Str);
    }

    let mut named: Vec<Type> = objects.into_iter().map(Type::Object).collect();
    if has_disabler {
        named.push(Type::Disabler);
    }
    named.sort_by(|a, b| a.name().cmp(b.name()));
    result.extend(named);

    if has_void && result.is_empty() {
        result.push(Type::Void);
    }
    TypeSet(result)
}
