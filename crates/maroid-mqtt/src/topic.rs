// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MQTT topic filter helpers.

/// Whether the concrete `topic` matches `filter`.
///
/// `+` matches exactly one level and a trailing `#` matches the parent level
/// and everything below it. Topics starting with `$` are never matched by a
/// filter starting with a wildcard.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    if topic.starts_with('$') && (filter.starts_with('+') || filter.starts_with('#')) {
        return false;
    }

    let mut levels = topic.split('/');
    for part in filter.split('/') {
        match part {
            "#" => return true,
            "+" => {
                if levels.next().is_none() {
                    return false;
                }
            }
            literal => {
                if levels.next() != Some(literal) {
                    return false;
                }
            }
        }
    }
    levels.next().is_none()
}

/// Wraps `topic` in a shared subscription for `group`, if one is set.
pub fn shared_subscription(group: Option<&str>, topic: &str) -> String {
    match group {
        Some(group) if !group.is_empty() => format!("$share/{group}/{topic}"),
        _ => topic.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_wildcard() {
        let filter = "dev/maroid/jasmine/measurement/+";
        assert!(topic_matches(filter, "dev/maroid/jasmine/measurement/soil"));
        assert!(!topic_matches(filter, "dev/maroid/jasmine/measurement"));
        assert!(!topic_matches(filter, "dev/maroid/jasmine/measurement/soil/raw"));
        assert!(topic_matches("a/+/c", "a/b/c"));
        assert!(!topic_matches("a/+/c", "a/b/d"));
    }

    #[test]
    fn multi_level_wildcard() {
        let filter = "dev/maroid/jasmine/#";
        assert!(topic_matches(filter, "dev/maroid/jasmine"));
        assert!(topic_matches(filter, "dev/maroid/jasmine/a/b/c"));
        assert!(!topic_matches(filter, "dev/maroid/rose/a"));
    }

    #[test]
    fn literal_filters() {
        assert!(topic_matches("a/b", "a/b"));
        assert!(!topic_matches("a/b", "a/b/c"));
        assert!(!topic_matches("a/b/c", "a/b"));
        assert!(topic_matches("a//b", "a//b"));
    }

    #[test]
    fn system_topics_hidden_from_leading_wildcards() {
        assert!(!topic_matches("#", "$SYS/broker/uptime"));
        assert!(!topic_matches("+/broker/uptime", "$SYS/broker/uptime"));
        assert!(topic_matches("$SYS/#", "$SYS/broker/uptime"));
    }

    #[test]
    fn shared_group_prefix() {
        assert_eq!(shared_subscription(None, "a/b"), "a/b");
        assert_eq!(shared_subscription(Some(""), "a/b"), "a/b");
        assert_eq!(shared_subscription(Some("hubs"), "a/+"), "$share/hubs/a/+");
    }
}
