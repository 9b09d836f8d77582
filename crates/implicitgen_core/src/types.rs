//! Immutable declaration model consumed by the engine.
//!
//! Everything here is plain data: an ingestion adapter builds these values once, up front, and the
//! engine only ever reads them. Constructors refer back to their owning type through the borrow in
//! [`ConversionCandidate`] rather than through an owned edge.

use std::fmt;

use crate::accessibility::Accessibility;
use crate::lang::keywords::escape_identifier;

// ============================================================================
// Parameter types
// ============================================================================

/// A resolved type name.
///
/// `identity` is the fully-resolved name used for every equality decision (surface aliases such as
/// `int` vs `System.Int32` have already been folded). `display` is the spelling used when emitting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    identity: String,
    display: String,
}

impl TypeName {
    pub fn new(identity: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display: display.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

/// Structural descriptor of a parameter's type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A named type. `generalizable` is true when the type could be erased to a type parameter
    /// without changing which arguments it accepts (open bases, type parameters, ...).
    Atomic { name: TypeName, generalizable: bool },
    /// A tuple type with at least two elements.
    Tuple(TupleType),
    /// An interface type: usable as the sole parameter of a conversion.
    Interface { name: TypeName },
}

impl ParamType {
    /// A named type that cannot be generalized away.
    pub fn concrete(identity: impl Into<String>, display: impl Into<String>) -> Self {
        ParamType::Atomic {
            name: TypeName::new(identity, display),
            generalizable: false,
        }
    }

    /// A named type that could be generalized away.
    pub fn open(identity: impl Into<String>, display: impl Into<String>) -> Self {
        ParamType::Atomic {
            name: TypeName::new(identity, display),
            generalizable: true,
        }
    }

    pub fn interface(identity: impl Into<String>, display: impl Into<String>) -> Self {
        ParamType::Interface {
            name: TypeName::new(identity, display),
        }
    }

    pub fn tuple(elements: impl IntoIterator<Item = TupleElement>) -> Self {
        ParamType::Tuple(TupleType {
            elements: elements.into_iter().collect(),
        })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, ParamType::Interface { .. })
    }

    pub fn as_tuple(&self) -> Option<&TupleType> {
        match self {
            ParamType::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    /// Whether erasing this type to a type parameter would widen the set of accepted arguments.
    ///
    /// Interfaces are always generalizable; a tuple is generalizable iff any element is.
    pub fn is_generalizable(&self) -> bool {
        match self {
            ParamType::Atomic { generalizable, .. } => *generalizable,
            ParamType::Interface { .. } => true,
            ParamType::Tuple(tuple) => tuple.elements.iter().any(|e| e.ty.is_generalizable()),
        }
    }

    /// Fully-resolved name of a named type; `None` for tuples.
    pub fn identity(&self) -> Option<&str> {
        match self {
            ParamType::Atomic { name, .. } | ParamType::Interface { name } => Some(name.identity()),
            ParamType::Tuple(_) => None,
        }
    }

    /// Source spelling used in emitted declarations.
    pub fn display(&self) -> String {
        match self {
            ParamType::Atomic { name, .. } | ParamType::Interface { name } => name.display().to_string(),
            ParamType::Tuple(tuple) => tuple.display(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Ordered elements of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleType {
    pub elements: Vec<TupleElement>,
}

impl TupleType {
    /// Name the host gives an unnamed element at `index` (zero-based).
    pub fn positional_name(index: usize) -> String {
        format!("Item{}", index + 1)
    }

    /// Element name, falling back to the positional name.
    pub fn element_name(&self, index: usize) -> String {
        self.elements
            .get(index)
            .and_then(|e| e.name.clone())
            .unwrap_or_else(|| Self::positional_name(index))
    }

    pub fn display(&self) -> String {
        let parts: Vec<String> = self
            .elements
            .iter()
            .map(|e| match &e.name {
                Some(name) => format!("{} {}", e.ty.display(), escape_identifier(name)),
                None => e.ty.display(),
            })
            .collect();
        format!("({})", parts.join(", "))
    }
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub name: Option<String>,
    pub ty: ParamType,
}

impl TupleElement {
    pub fn named(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn unnamed(ty: ParamType) -> Self {
        Self { name: None, ty }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Declaration keyword of a type that can carry constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Record,
    RecordStruct,
}

impl TypeKind {
    pub fn as_keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        let normalized: Vec<&str> = word.split_whitespace().collect();
        match normalized.as_slice() {
            ["class"] => Some(TypeKind::Class),
            ["struct"] => Some(TypeKind::Struct),
            ["record"] | ["record", "class"] => Some(TypeKind::Record),
            ["record", "struct"] => Some(TypeKind::RecordStruct),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_keyword())
    }
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Unescaped identifier (`class`, never `@class`).
    pub name: String,
    pub ty: ParamType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A declared constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorView {
    pub accessibility: Accessibility,
    pub parameters: Vec<Parameter>,
    /// Carries the opt-out marker.
    pub is_opted_out: bool,
    pub is_obsolete: bool,
}

impl ConstructorView {
    pub fn new(accessibility: Accessibility, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            accessibility,
            parameters: parameters.into_iter().collect(),
            is_opted_out: false,
            is_obsolete: false,
        }
    }

    pub fn public(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self::new(Accessibility::Public, parameters)
    }

    pub fn with_opt_out(mut self, opted_out: bool) -> Self {
        self.is_opted_out = opted_out;
        self
    }

    pub fn with_obsolete(mut self, obsolete: bool) -> Self {
        self.is_obsolete = obsolete;
        self
    }
}

/// A type enclosing the analysed type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainingType {
    pub name: String,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub type_parameters: Vec<String>,
}

impl ContainingType {
    pub fn new(name: impl Into<String>, kind: TypeKind, accessibility: Accessibility) -> Self {
        Self {
            name: name.into(),
            kind,
            accessibility,
            type_parameters: Vec::new(),
        }
    }

    pub fn with_type_parameters(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.type_parameters = params.into_iter().map(Into::into).collect();
        self
    }
}

/// Whether a user-written conversion is implicit or explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    Implicit,
    Explicit,
}

impl ConversionKind {
    pub fn as_keyword(self) -> &'static str {
        match self {
            ConversionKind::Implicit => "implicit",
            ConversionKind::Explicit => "explicit",
        }
    }
}

/// A conversion operator the type's author already wrote.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExistingConversion {
    pub kind: ConversionKind,
    pub parameters: Vec<ParamType>,
}

impl ExistingConversion {
    pub fn implicit(parameters: impl IntoIterator<Item = ParamType>) -> Self {
        Self {
            kind: ConversionKind::Implicit,
            parameters: parameters.into_iter().collect(),
        }
    }

    pub fn explicit(parameters: impl IntoIterator<Item = ParamType>) -> Self {
        Self {
            kind: ConversionKind::Explicit,
            parameters: parameters.into_iter().collect(),
        }
    }
}

/// A type declaration as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeView {
    pub name: String,
    /// Dotted namespace, `None` for the global namespace.
    pub namespace: Option<String>,
    /// Enclosing types, outermost first.
    pub containing: Vec<ContainingType>,
    pub kind: TypeKind,
    pub accessibility: Accessibility,
    pub type_parameters: Vec<String>,
    pub is_abstract: bool,
    pub is_static: bool,
    /// The type and every enclosing type accept out-of-band declaration fragments.
    pub is_extensible: bool,
    /// The opt-out marker sits on the type itself; every constructor inherits it.
    pub is_opted_out: bool,
    /// Namespace imports the generated fragment needs to resolve parameter types.
    pub usings: Vec<String>,
    /// Constructors in declaration order.
    pub constructors: Vec<ConstructorView>,
    pub conversions: Vec<ExistingConversion>,
}

impl TypeView {
    /// A public, extensible, non-generic type with no members.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            containing: Vec::new(),
            kind,
            accessibility: Accessibility::Public,
            type_parameters: Vec::new(),
            is_abstract: false,
            is_static: false,
            is_extensible: true,
            is_opted_out: false,
            usings: Vec::new(),
            constructors: Vec::new(),
            conversions: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Push an enclosing type; call outermost first.
    pub fn nested_in(mut self, containing: ContainingType) -> Self {
        self.containing.push(containing);
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_type_parameters(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.type_parameters = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_extensible(mut self, is_extensible: bool) -> Self {
        self.is_extensible = is_extensible;
        self
    }

    pub fn with_opt_out(mut self, opted_out: bool) -> Self {
        self.is_opted_out = opted_out;
        self
    }

    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorView) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_conversion(mut self, conversion: ExistingConversion) -> Self {
        self.conversions.push(conversion);
        self
    }

    pub fn generic_arity(&self) -> usize {
        self.type_parameters.len()
    }

    /// Accessibility contexts from the type itself out to the outermost enclosing type.
    pub fn accessibility_chain(&self) -> impl Iterator<Item = Accessibility> + '_ {
        std::iter::once(self.accessibility).chain(self.containing.iter().rev().map(|c| c.accessibility))
    }

    /// Fully-resolved name, e.g. `Demo.Outer<U>.Box<T>`.
    pub fn identity(&self) -> String {
        let mut segments: Vec<String> = self.namespace.iter().cloned().collect();
        segments.extend(
            self.containing
                .iter()
                .map(|c| generic_identity(&c.name, &c.type_parameters)),
        );
        segments.push(generic_identity(&self.name, &self.type_parameters));
        segments.join(".")
    }

    /// Emitted spelling of the type, e.g. `global::Demo.Outer<U>.Box<T>`.
    pub fn qualified_display(&self) -> String {
        format!("global::{}", self.display_path("<", ">"))
    }

    /// Spelling usable inside a documentation `cref`, e.g. `global::Demo.Outer{U}.Box{T}`.
    pub fn cref(&self) -> String {
        format!("global::{}", self.display_path("{", "}"))
    }

    fn display_path(&self, open: &str, close: &str) -> String {
        let bracketed = |name: &str, params: &[String]| {
            if params.is_empty() {
                name.to_string()
            } else {
                format!("{name}{open}{}{close}", params.join(", "))
            }
        };
        let mut segments: Vec<String> = self.namespace.iter().cloned().collect();
        segments.extend(self.containing.iter().map(|c| bracketed(&c.name, &c.type_parameters)));
        segments.push(bracketed(&self.name, &self.type_parameters));
        segments.join(".")
    }
}

/// Identity spelling of a possibly generic name: `Box<T,V>` (no spaces).
pub fn generic_identity(name: &str, params: &[String]) -> String {
    if params.is_empty() {
        name.to_string()
    } else {
        format!("{name}<{}>", params.join(","))
    }
}

// ============================================================================
// Engine products
// ============================================================================

/// One element of a resolved conversion signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureElement {
    pub name: String,
    pub ty: ParamType,
}

impl SignatureElement {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A constructor that passed eligibility, with the signature its conversion would take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCandidate<'a> {
    pub owner: &'a TypeView,
    pub constructor: &'a ConstructorView,
    /// Position of `constructor` in `owner.constructors`.
    pub index: usize,
    pub signature: Vec<SignatureElement>,
    /// The constructor takes a single tuple whose elements form `signature`.
    pub destructured: bool,
}

impl ConversionCandidate<'_> {
    pub fn signature_types(&self) -> impl Iterator<Item = &ParamType> {
        self.signature.iter().map(|e| &e.ty)
    }
}

/// Rendered output for one type: a stable identifier plus the declaration text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedUnit {
    pub identifier: String,
    pub text: String,
}
