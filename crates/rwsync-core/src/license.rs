//! License classification.
//!
//! Maps an arbitrary upstream license string to one of the accepted license
//! identifiers. Matching is exact and case-sensitive: `"cc-by"` and
//! `" CC-BY"` are not `"CC-BY"`.

/// License value used when the upstream string is not accepted.
pub const CATCH_ALL_LICENSE: &str = "Other";

/// Accepted license identifiers.
pub const ACCEPTED_LICENSES: &[&str] = &[
    "Public Domain",
    "CC-0",
    "PDDL",
    "CC-BY",
    "CDLA-Permissive-1.0",
    "ODC-BY",
    "CC-BY-SA",
    "CDLA-Sharing-1.0",
    "ODC-ODbL",
    "CC BY-NC",
    "CC BY-ND",
    "CC BY-NC-SA",
    "CC BY-NC-ND",
    CATCH_ALL_LICENSE,
];

/// Returns [`ACCEPTED_LICENSES`] as owned strings, for configuration.
pub fn default_accepted_licenses() -> Vec<String> {
    ACCEPTED_LICENSES.iter().map(|l| l.to_string()).collect()
}

/// Classifies an upstream license string.
///
/// Returns the input unchanged when it is a member of `accepted`, and
/// [`CATCH_ALL_LICENSE`] otherwise (including when the provider sent none).
///
/// # Examples
///
/// ```
/// use rwsync_core::license::{classify_license, default_accepted_licenses};
///
/// let accepted = default_accepted_licenses();
/// assert_eq!(classify_license(Some("CC-BY"), &accepted), "CC-BY");
/// assert_eq!(classify_license(Some("proprietary"), &accepted), "Other");
/// assert_eq!(classify_license(None, &accepted), "Other");
/// ```
pub fn classify_license(license: Option<&str>, accepted: &[String]) -> String {
    match license {
        Some(l) if accepted.iter().any(|a| a == l) => l.to_string(),
        _ => CATCH_ALL_LICENSE.to_string(),
    }
}
