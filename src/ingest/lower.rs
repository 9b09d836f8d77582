//! Lowering of raw manifest declarations into engine [`TypeView`]s.
//!
//! All validation happens here, in two passes: the first registers every declared type so that
//! parameter types can refer to types declared later in the manifest, the second checks each
//! declaration and resolves its constructor and conversion signatures.

use implicitgen_core::lang::keywords::{is_keyword, is_valid_identifier, unescape_identifier};
use implicitgen_core::types::{
    ConstructorView, ContainingType, ConversionKind, ExistingConversion, ParamType, Parameter, TypeKind, TypeView,
    generic_identity,
};
use implicitgen_core::Accessibility;

use super::error::IngestError;
use super::manifest::{RawConstructor, RawContainingType, RawManifest, RawType};
use super::resolve::{DeclaredType, Resolver};
use super::type_expr::parse_type_expr;

/// Lower every type in `manifest`, in manifest order.
pub fn lower_manifest(manifest: &RawManifest) -> Result<Vec<TypeView>, IngestError> {
    let mut resolver = Resolver::new(&manifest.symbols);
    for raw in &manifest.types {
        resolver.declare(declared_type(raw));
    }

    manifest
        .types
        .iter()
        .enumerate()
        .map(|(index, raw)| lower_type(&resolver, index, raw))
        .collect()
}

fn declared_type(raw: &RawType) -> DeclaredType {
    let mut prefix_identity: Vec<String> = raw.namespace.iter().filter(|n| !n.is_empty()).cloned().collect();
    let mut prefix_display = prefix_identity.clone();
    let mut path = prefix_identity.clone();
    for containing in &raw.containing_types {
        prefix_identity.push(generic_identity(&containing.name, &containing.type_parameters));
        prefix_display.push(if containing.type_parameters.is_empty() {
            containing.name.clone()
        } else {
            format!("{}<{}>", containing.name, containing.type_parameters.join(", "))
        });
        path.push(containing.name.clone());
    }
    path.push(raw.name.clone());
    DeclaredType {
        prefix_identity: prefix_identity.join("."),
        prefix_display: prefix_display.join("."),
        path: path.join("."),
        name: raw.name.clone(),
        arity: raw.type_parameters.len(),
        kind: TypeKind::from_keyword(&raw.kind).unwrap_or(TypeKind::Class),
    }
}

fn lower_type(resolver: &Resolver<'_>, index: usize, raw: &RawType) -> Result<TypeView, IngestError> {
    let location = format!("types[{index}] '{}'", raw.name);
    check_identifier(&location, "type name", &raw.name)?;

    let mut ty = TypeView::new(raw.name.clone(), parse_kind(&location, &raw.kind)?)
        .with_accessibility(parse_accessibility(&location, &raw.accessibility)?)
        .with_abstract(raw.is_abstract)
        .with_static(raw.is_static)
        .with_opt_out(raw.opt_out);

    if let Some(namespace) = raw.namespace.as_deref().filter(|n| !n.is_empty()) {
        for segment in namespace.split('.') {
            check_identifier(&location, "namespace segment", segment)?;
        }
        ty = ty.with_namespace(namespace);
    }

    check_type_parameters(&location, &raw.type_parameters)?;
    ty = ty.with_type_parameters(raw.type_parameters.iter().cloned());

    let mut extensible = raw.partial;
    let mut enclosing_name: Option<&str> = None;
    let mut scope: Vec<String> = Vec::new();
    for (depth, containing) in raw.containing_types.iter().enumerate() {
        let containing_location = format!("{location} containing type #{depth}");
        let lowered = lower_containing(&containing_location, containing)?;
        if enclosing_name == Some(containing.name.as_str()) {
            return Err(nested_in_namesake(&containing_location, &containing.name));
        }
        enclosing_name = Some(containing.name.as_str());
        extensible &= containing.partial;
        scope.extend(containing.type_parameters.iter().cloned());
        ty = ty.nested_in(lowered);
    }
    if enclosing_name == Some(raw.name.as_str()) {
        return Err(nested_in_namesake(&location, &raw.name));
    }
    scope.extend(raw.type_parameters.iter().cloned());
    ty = ty.with_extensible(extensible);

    for using in &raw.usings {
        let namespace = using.strip_prefix("static ").unwrap_or(using);
        if namespace.is_empty() || !namespace.split('.').all(is_valid_identifier) {
            return Err(IngestError::invalid(&location, format!("invalid using directive '{using}'")));
        }
        ty = ty.with_using(using.clone());
    }

    for (ctor_index, raw_ctor) in raw.constructors.iter().enumerate() {
        let ctor_location = format!("{location} constructor #{ctor_index}");
        ty = ty.with_constructor(lower_constructor(resolver, &ctor_location, &scope, raw_ctor)?);
    }

    for (conversion_index, raw_conversion) in raw.conversions.iter().enumerate() {
        let conversion_location = format!("{location} conversion #{conversion_index}");
        let kind = match raw_conversion.kind.as_str() {
            "implicit" => ConversionKind::Implicit,
            "explicit" => ConversionKind::Explicit,
            other => {
                return Err(IngestError::invalid_with_help(
                    &conversion_location,
                    format!("unknown conversion kind '{other}'"),
                    "expected 'implicit' or 'explicit'",
                ));
            }
        };
        let mut parameters = Vec::with_capacity(raw_conversion.parameters.len());
        for (param_index, expr) in raw_conversion.parameters.iter().enumerate() {
            let param_location = format!("{conversion_location} parameter #{param_index}");
            parameters.push(resolve_type(resolver, &param_location, &scope, expr)?);
        }
        ty = ty.with_conversion(ExistingConversion { kind, parameters });
    }

    tracing::debug!(
        type_name = %ty.identity(),
        constructors = ty.constructors.len(),
        conversions = ty.conversions.len(),
        "type lowered"
    );
    Ok(ty)
}

fn lower_containing(location: &str, raw: &RawContainingType) -> Result<ContainingType, IngestError> {
    check_identifier(location, "containing type name", &raw.name)?;
    check_type_parameters(location, &raw.type_parameters)?;
    Ok(ContainingType::new(
        raw.name.clone(),
        parse_kind(location, &raw.kind)?,
        parse_accessibility(location, &raw.accessibility)?,
    )
    .with_type_parameters(raw.type_parameters.iter().cloned()))
}

fn lower_constructor(
    resolver: &Resolver<'_>,
    location: &str,
    scope: &[String],
    raw: &RawConstructor,
) -> Result<ConstructorView, IngestError> {
    let accessibility = parse_accessibility(location, &raw.accessibility)?;
    let mut parameters: Vec<Parameter> = Vec::with_capacity(raw.parameters.len());
    for (param_index, raw_param) in raw.parameters.iter().enumerate() {
        let param_location = format!("{location} parameter #{param_index}");
        if raw_param.name.is_empty() {
            return Err(IngestError::invalid(&param_location, "parameter name must not be empty"));
        }
        check_identifier(&param_location, "parameter name", &raw_param.name)?;
        let name = unescape_identifier(&raw_param.name);
        if parameters.iter().any(|p| p.name == name) {
            return Err(IngestError::invalid(
                &param_location,
                format!("duplicate parameter name '{name}'"),
            ));
        }
        let ty = resolve_type(resolver, &param_location, scope, &raw_param.ty)?;
        parameters.push(Parameter::new(name, ty));
    }
    Ok(ConstructorView::new(accessibility, parameters)
        .with_opt_out(raw.opt_out)
        .with_obsolete(raw.obsolete))
}

fn resolve_type(
    resolver: &Resolver<'_>,
    location: &str,
    scope: &[String],
    expr: &str,
) -> Result<ParamType, IngestError> {
    if expr.trim().is_empty() {
        return Err(IngestError::invalid(location, "parameter type must not be empty"));
    }
    let parsed = parse_type_expr(expr)
        .map_err(|e| IngestError::type_syntax(location.to_string(), expr, e.message, e.span))?;
    resolver
        .resolve(&parsed, scope)
        .map_err(|e| IngestError::invalid_type(location.to_string(), expr, e.message, e.span))
}

fn parse_kind(location: &str, word: &str) -> Result<TypeKind, IngestError> {
    TypeKind::from_keyword(word).ok_or_else(|| {
        IngestError::invalid_with_help(
            location,
            format!("unknown type kind '{word}'"),
            "expected one of 'class', 'struct', 'record', 'record struct'",
        )
    })
}

fn parse_accessibility(location: &str, word: &str) -> Result<Accessibility, IngestError> {
    word.parse::<Accessibility>().map_err(|e| {
        let expected: Vec<&str> = Accessibility::ALL.iter().map(|a| a.as_keyword()).collect();
        IngestError::invalid_with_help(location, e.to_string(), format!("expected one of: {}", expected.join(", ")))
    })
}

fn check_identifier(location: &str, what: &str, name: &str) -> Result<(), IngestError> {
    if !is_valid_identifier(name) || (!name.starts_with('@') && is_keyword(name)) {
        return Err(IngestError::invalid(location, format!("invalid {what} '{name}'")));
    }
    Ok(())
}

fn check_type_parameters(location: &str, params: &[String]) -> Result<(), IngestError> {
    for (i, param) in params.iter().enumerate() {
        check_identifier(location, "type parameter", param)?;
        if params[..i].contains(param) {
            return Err(IngestError::invalid(location, format!("duplicate type parameter '{param}'")));
        }
    }
    Ok(())
}

fn nested_in_namesake(location: &str, name: &str) -> IngestError {
    IngestError::invalid_with_help(
        location,
        format!("type '{name}' is nested in a type of the same name"),
        "a member cannot share its name with its enclosing type",
    )
}
