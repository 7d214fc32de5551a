use crate::universe::TypeInfo;

/// Gives names to top-level declarations.
///
/// A namer must return a name for which `is_taken` is false. Returning a
/// taken name is a configuration error reported by the registry.
pub trait Namer {
    fn name(&self, ty: &TypeInfo, is_taken: &dyn Fn(&str) -> bool) -> String;
}

impl<F> Namer for F
where
    F: Fn(&TypeInfo, &dyn Fn(&str) -> bool) -> String,
{
    fn name(&self, ty: &TypeInfo, is_taken: &dyn Fn(&str) -> bool) -> String {
        self(ty, is_taken)
    }
}

/// Names types by their short name, numbering collisions sequentially
/// (`MyStruct`, `MyStruct2`, `MyStruct3`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {
    fn name(&self, ty: &TypeInfo, is_taken: &dyn Fn(&str) -> bool) -> String {
        sequential_name(ty.name(), is_taken)
    }
}

/// Names types by their package path and short name
/// (`EncodingJsonDecoder`, `OlaholTsreflectGenerator`, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageNamer;

impl Namer for PackageNamer {
    fn name(&self, ty: &TypeInfo, is_taken: &dyn Fn(&str) -> bool) -> String {
        sequential_name(&package_path_name(ty.pkg_path(), ty.name()), is_taken)
    }
}

/// First free name among `base`, `base2`, `base3`, ...
pub fn sequential_name(base: &str, is_taken: &dyn Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }

    (2..)
        .map(|i| format!("{base}{i}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Declaration name of a function bound as `name`: the first letter is
/// lower-cased
pub fn function_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pascal-case `s`, splitting on runs of `.`, `_`, `-` and whitespace.
/// Path separators are kept.
pub fn pascal_case(s: &str) -> String {
    s.split(|c: char| matches!(c, '.' | '_' | '-') || c.is_whitespace())
        .map(title)
        .collect()
}

/// Prefix `name` with the pascal-cased segments of `pkg_path`. Segments
/// containing a dot (hosts, relative markers) are dropped.
pub fn package_path_name(pkg_path: &str, name: &str) -> String {
    let prefix: String = pkg_path
        .split('/')
        .filter(|segment| !segment.contains('.'))
        .map(pascal_case)
        .collect();

    format!("{prefix}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::{Kind, TypeUniverse};
    use std::collections::HashSet;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("domain.name"), "DomainName");
        assert_eq!(pascal_case("snake_case"), "SnakeCase");
        assert_eq!(pascal_case("kebab-case"), "KebabCase");
        assert_eq!(pascal_case("camelCase"), "CamelCase");
        assert_eq!(pascal_case("PascalCase"), "PascalCase");
        assert_eq!(pascal_case("Space Name"), "SpaceName");
        assert_eq!(pascal_case("path/Case/Name"), "Path/Case/Name");
        assert_eq!(pascal_case("mixed_case-name"), "MixedCaseName");
        assert_eq!(pascal_case("mixed case-name"), "MixedCaseName");
        assert_eq!(
            pascal_case("mixed.case___name.kebab-----case..com"),
            "MixedCaseNameKebabCaseCom"
        );
        assert_eq!(pascal_case(".."), "");
        assert_eq!(pascal_case("..relativeName"), "RelativeName");
    }

    #[test]
    fn test_function_name() {
        assert_eq!(function_name("Add"), "add");
        assert_eq!(function_name("addOne"), "addOne");
        assert_eq!(function_name(""), "");
    }

    #[test]
    fn test_package_path_name() {
        assert_eq!(
            package_path_name("github.com/olahol/tsreflect", "Generator"),
            "OlaholTsreflectGenerator"
        );
        assert_eq!(
            package_path_name("github.com/shopspring/decimal", "Decimal"),
            "ShopspringDecimalDecimal"
        );
        assert_eq!(package_path_name("encoding/json", "Decoder"), "EncodingJsonDecoder");
        assert_eq!(package_path_name("../test", "Struct"), "TestStruct");
        assert_eq!(package_path_name("snake_case", "Struct_Name"), "SnakeCaseStruct_Name");
        assert_eq!(package_path_name("empty//part", "Name"), "EmptyPartName");
        assert_eq!(package_path_name("", "Name"), "Name");
    }

    #[test]
    fn test_sequential_name() {
        let taken: HashSet<&str> = ["X", "X2"].into_iter().collect();
        let is_taken = |name: &str| taken.contains(name);

        assert_eq!(sequential_name("Y", &is_taken), "Y");
        assert_eq!(sequential_name("X", &is_taken), "X3");
    }

    #[test]
    fn test_builtin_namers() {
        let mut u = TypeUniverse::new();
        let id = u.declare("SyntaxError", "encoding/json", Kind::Struct(Vec::new()));
        let free = |_: &str| false;

        assert_eq!(DefaultNamer.name(u.info(id), &free), "SyntaxError");
        assert_eq!(PackageNamer.name(u.info(id), &free), "EncodingJsonSyntaxError");
    }
}
