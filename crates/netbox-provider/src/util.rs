//! Small deterministic helpers shared by resources

use netbox_client::{NestedTag, WritableNestedTag};
use std::collections::BTreeSet;

/// Maximum length NetBox accepts for slugs
pub const MAX_SLUG_LENGTH: usize = 100;

/// Derive a NetBox slug from a display name.
///
/// ASCII letters are lowercased; letters, digits and `_` are kept; every other run
/// of characters becomes a single `-`. Leading and trailing dashes are dropped and
/// the result is cut to [`MAX_SLUG_LENGTH`].
pub fn get_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() || lower == '_' {
            out.push(lower);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.truncate(MAX_SLUG_LENGTH);
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Sorted, de-duplicated tag names
pub fn tag_names(tags: &[NestedTag]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tag references for write requests, first occurrence wins
pub fn writable_tags(names: &[String]) -> Vec<WritableNestedTag> {
    let mut seen = BTreeSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .map(|name| WritableNestedTag {
            name: name.clone(),
            slug: get_slug(name),
        })
        .collect()
}

/// Join with `separator`, using `conjunction` before the last element.
///
/// `["a", "b", "c"]` with `", "` and `"and"` gives `"a, b and c"`.
pub fn join_with_final_conjunction<S: AsRef<str>>(elems: &[S], separator: &str, conjunction: &str) -> String {
    match elems {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head = init.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(separator);
            format!("{} {} {}", head, conjunction, last.as_ref())
        }
    }
}

/// Attribute description listing the accepted values
pub fn valid_values_description<S: AsRef<str>>(values: &[S]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("`{}`", v.as_ref())).collect();
    format!("Valid values are {}.", join_with_final_conjunction(&quoted, ", ", "and"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(name: &str) -> NestedTag {
        NestedTag {
            id: 1,
            url: String::new(),
            display: name.to_string(),
            name: name.to_string(),
            slug: get_slug(name),
        }
    }

    #[test]
    fn test_get_slug() {
        assert_eq!(get_slug("Core Router"), "core-router");
        assert_eq!(get_slug("  Edge / DMZ  "), "edge-dmz");
        assert_eq!(get_slug("rack_01"), "rack_01");
        assert_eq!(get_slug("Zürich DC"), "z-rich-dc");
        assert_eq!(get_slug("---"), "");
        assert_eq!(get_slug(&"a".repeat(150)).len(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn test_get_slug_no_trailing_dash_after_truncate() {
        let name = format!("{} x", "a".repeat(MAX_SLUG_LENGTH - 1));
        let slug = get_slug(&name);
        assert!(!slug.ends_with('-'));
        assert_eq!(slug.len(), MAX_SLUG_LENGTH - 1);
    }

    #[test]
    fn test_tag_names_sorted_and_unique() {
        let tags = vec![nested("prod"), nested("edge"), nested("prod")];
        assert_eq!(tag_names(&tags), vec!["edge".to_string(), "prod".to_string()]);
        assert!(tag_names(&[]).is_empty());
    }

    #[test]
    fn test_writable_tags() {
        let names = vec!["Prod Env".to_string(), "edge".to_string(), "Prod Env".to_string()];
        assert_eq!(
            writable_tags(&names),
            vec![
                WritableNestedTag { name: "Prod Env".to_string(), slug: "prod-env".to_string() },
                WritableNestedTag { name: "edge".to_string(), slug: "edge".to_string() },
            ]
        );
    }

    #[test]
    fn test_join_with_final_conjunction() {
        let empty: [&str; 0] = [];
        assert_eq!(join_with_final_conjunction(&empty, ", ", "and"), "");
        assert_eq!(join_with_final_conjunction(&["a"], ", ", "and"), "a");
        assert_eq!(join_with_final_conjunction(&["a", "b"], ", ", "and"), "a and b");
        assert_eq!(join_with_final_conjunction(&["a", "b", "c"], ", ", "or"), "a, b or c");
    }

    #[test]
    fn test_valid_values_description() {
        assert_eq!(
            valid_values_description(&["active", "reserved", "deprecated"]),
            "Valid values are `active`, `reserved` and `deprecated`."
        );
    }
}
