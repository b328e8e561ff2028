use regex::Regex;
use std::sync::LazyLock;

static VALUE_SET_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:urn:oid:|https?://cts\.nlm\.nih\.gov/fhir/ValueSet/)?([0-9]+(?:\.[0-9]+)*)(?:[|/](.+))?$")
        .expect("value set id pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSetId {
    pub oid: String,
    pub version: Option<String>,
}

/// Splits a composite value set identifier into its OID and optional
/// version.
///
/// Accepts a bare OID, `urn:oid:<oid>` or a VSAC FHIR ValueSet URL, each
/// optionally followed by `|<version>` or `/<version>`. Anything else,
/// including ValueSet URLs from other terminology servers, yields `None`.
pub fn extract_oid_and_version(id: &str) -> Option<ValueSetId> {
    let caps = VALUE_SET_ID.captures(id.trim())?;
    Some(ValueSetId {
        oid: caps[1].to_string(),
        version: caps
            .get(2)
            .map(|m| m.as_str().to_string())
            .filter(|v| !v.is_empty()),
    })
}
