use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Raw struct tag in the conventional `key:"value" key2:"value2"` form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up the value stored under `key`. Returns `None` when the key is
    /// absent or when the tag is malformed before the key is reached.
    pub fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        let mut rest = self.0.as_str();

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                return None;
            }

            let bytes = rest.as_bytes();
            let mut i = 0;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                return None;
            }

            let name = &rest[..i];
            rest = &rest[i + 1..];

            // Scan the quoted value, honoring backslash escapes.
            let bytes = rest.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                return None;
            }

            let quoted = &rest[..=i];
            rest = &rest[i + 1..];

            if name == key {
                return unquote(quoted);
            }
        }
    }
}

impl From<&str> for StructTag {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

fn unquote(quoted: &str) -> Option<Cow<'_, str>> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if !inner.contains('\\') {
        return Some(Cow::Borrowed(inner));
    }

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }

    Some(Cow::Owned(out))
}

/// Field-level directives resolved from a struct tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirectives {
    /// Replacement property name
    pub name: Option<String>,
    /// `omitempty`: the property may be absent
    pub optional: bool,
    /// `string`: the value is encoded as a string whatever its kind
    pub stringify: bool,
}

/// Tag keys consulted for field directives. The fallback key is only read
/// when the primary key is absent (or, for naming, empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagKeys {
    pub primary: String,
    pub fallback: String,
}

impl Default for TagKeys {
    fn default() -> Self {
        Self {
            primary: "json".to_string(),
            fallback: "yaml".to_string(),
        }
    }
}

impl TagKeys {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }

    /// True when the tag asks for the field to be skipped entirely (`"-"`)
    pub fn is_omitted(&self, tag: &StructTag) -> bool {
        match tag.lookup(&self.primary) {
            Some(value) => value == "-",
            None => tag
                .lookup(&self.fallback)
                .is_some_and(|value| value == "-"),
        }
    }

    pub fn directives(&self, tag: &StructTag) -> FieldDirectives {
        let value = match tag.lookup(&self.primary) {
            Some(value) if !value.is_empty() => Some(value),
            _ => tag.lookup(&self.fallback),
        };

        let mut directives = FieldDirectives::default();
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return directives;
        };

        let mut parts = value.split(',');
        if let Some(name) = parts.next().filter(|name| !name.is_empty()) {
            directives.name = Some(name.to_string());
        }

        for option in parts {
            match option {
                "string" => directives.stringify = true,
                "omitempty" => directives.optional = true,
                _ => {}
            }
        }

        directives
    }
}
