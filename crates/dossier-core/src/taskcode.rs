//! Task-code ordering and folder-name sanitization.
//!
//! Task codes are dotted hierarchies (`"3.1.2"`). Ordering is numeric-aware:
//! each dot-delimited segment compares as a number, so `2.10` sorts after
//! `2.3`, not between `2.1` and `2.2`. Non-numeric segments sort after all
//! numeric ones.

use std::cmp::Ordering;

use crate::models::Task;

/// One comparable segment of a task code. Numbers order before (and among
/// themselves below) any non-numeric text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Number(u64),
    Text(String),
}

/// Split a task code into comparable segments.
pub fn code_sort_key(code: &str) -> Vec<Segment> {
    code.split('.')
        .map(|part| match part.trim().parse::<u64>() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Text(part.trim().to_string()),
        })
        .collect()
}

/// Compare two task codes segment-wise.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    code_sort_key(a).cmp(&code_sort_key(b))
}

/// Sort tasks in place by numeric-aware code order.
pub fn sort_tasks_by_code(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| compare_codes(&a.code, &b.code));
}

/// Strip every character that is not alphanumeric, `.`, `_`, `-`, or space.
///
/// Applied to human titles before they become part of a folder name, so the
/// leaf folder `"3.1 Inspection"` is reproducible byte-for-byte.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' '))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use uuid::Uuid;

    fn task(code: &str) -> Task {
        Task {
            id: Uuid::new_v4(),
            code: code.to_string(),
            title: String::new(),
            status: TaskStatus::Upcoming,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_numeric_aware_ordering() {
        let mut tasks: Vec<Task> = ["10.1", "2.3", "2.10", "2.2"].iter().map(|c| task(c)).collect();
        sort_tasks_by_code(&mut tasks);
        let codes: Vec<&str> = tasks.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["2.2", "2.3", "2.10", "10.1"]);
    }

    #[test]
    fn test_shorter_prefix_sorts_first() {
        assert_eq!(compare_codes("2", "2.1"), Ordering::Less);
        assert_eq!(compare_codes("2.1", "2.1.1"), Ordering::Less);
    }

    #[test]
    fn test_non_numeric_segments_sort_last() {
        assert_eq!(compare_codes("2.9", "2.appendix"), Ordering::Less);
        assert_eq!(compare_codes("2.appendix", "2.10"), Ordering::Greater);
    }

    #[test]
    fn test_equal_codes() {
        assert_eq!(compare_codes("3.1.2", "3.1.2"), Ordering::Equal);
    }

    #[test]
    fn test_sanitize_title_keeps_allowed_characters() {
        assert_eq!(
            sanitize_title("HSE Committee Meeting v1.2_final-draft"),
            "HSE Committee Meeting v1.2_final-draft"
        );
    }

    #[test]
    fn test_sanitize_title_strips_punctuation() {
        assert_eq!(sanitize_title("Report (rev #2)! / <draft>"), "Report rev 2  draft");
    }

    #[test]
    fn test_sanitize_title_empty() {
        assert_eq!(sanitize_title(""), "");
        assert_eq!(sanitize_title("###"), "");
    }
}
