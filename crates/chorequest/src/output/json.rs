//! JSON output formatting.

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorequest_core::quest::Child;

    #[test]
    fn test_child_json_is_camel_case() {
        let child = Child::new("parent-1", "Alex");
        let json: serde_json::Value = serde_json::from_str(&format_json(&child)).unwrap();

        assert_eq!(json["parentId"], "parent-1");
        assert_eq!(json["xp"], 0);
        assert_eq!(json["gold"], 0);
    }
}
