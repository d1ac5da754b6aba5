//! Member signature fingerprints.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::model::{GenericBindings, Member, TypeRef};

/// Which facets of a member participate in its signature hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Kind, name, generic arity, parameter types with passing modifiers, value type.
    #[default]
    Base,
    /// Base plus declared accessibility.
    Security,
    /// Base plus modifier keywords.
    Keywords,
    /// Base plus accessibility and modifier keywords.
    Full,
}

impl ComparisonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::Base => "base",
            ComparisonMode::Security => "security",
            ComparisonMode::Keywords => "keywords",
            ComparisonMode::Full => "full",
        }
    }

    pub fn includes_security(&self) -> bool {
        matches!(self, ComparisonMode::Security | ComparisonMode::Full)
    }

    pub fn includes_keywords(&self) -> bool {
        matches!(self, ComparisonMode::Keywords | ComparisonMode::Full)
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(ComparisonMode::Base),
            "security" => Ok(ComparisonMode::Security),
            "keywords" => Ok(ComparisonMode::Keywords),
            "full" => Ok(ComparisonMode::Full),
            _ => Err(format!("unknown comparison mode: {}", s)),
        }
    }
}

/// Fingerprint a member's signature under `mode`.
///
/// Facets are fed to an `FxHasher` in a fixed order: member kind, name, generic arity,
/// parameter count, then each parameter's canonical type and signature-affecting modifier,
/// then the canonical value type, then accessibility and keywords when the mode asks for them.
/// The value is deterministic within a build of this crate and must not be persisted.
pub fn signature_hash(member: &Member, mode: ComparisonMode) -> u64 {
    signature_hash_bound(member, mode, &GenericBindings::new())
}

/// [`signature_hash`] of a member seen through a constructed generic type.
///
/// Placeholders bound in `bindings` hash as their arguments, so `T Find(int)` of
/// `IRepository<T>` seen as `IRepository<Book>` hashes like `Book Find(int)`. Placeholders the
/// member redeclares itself are left alone.
pub fn signature_hash_bound(
    member: &Member,
    mode: ComparisonMode,
    bindings: &GenericBindings,
) -> u64 {
    let shadowed;
    let bindings = if member.generic_parameters().is_empty() {
        bindings
    } else {
        shadowed = bindings.shadowed_by(member.generic_parameters());
        &shadowed
    };
    let canonical = |ty: &TypeRef| ty.substitute(bindings).canonical_name();

    let mut hasher = FxHasher::default();

    member.kind().discriminant().hash(&mut hasher);
    member.name().hash(&mut hasher);
    member.generic_parameters().len().hash(&mut hasher);

    let parameters = member.parameters();
    parameters.len().hash(&mut hasher);
    for parameter in parameters {
        canonical(parameter.parameter_type()).hash(&mut hasher);
        let modifier = parameter.modifier();
        let passing = if modifier.affects_signature() {
            modifier.keyword()
        } else {
            ""
        };
        passing.hash(&mut hasher);
    }

    canonical(member.value_type()).hash(&mut hasher);

    if mode.includes_security() {
        member.security().discriminant().hash(&mut hasher);
    }
    if mode.includes_keywords() {
        member.keywords().bits().hash(&mut hasher);
    }

    hasher.finish()
}
