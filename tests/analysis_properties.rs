//! Property tests for the diff analyzer.

use gitflow::analysis::{analyze_diff, IssueKind};
use proptest::prelude::*;

proptest! {
    // Diffs with no trigger content never produce findings, regardless of
    // shape. The alphabet is restricted so no secret keyword can appear by
    // accident.
    #[test]
    fn trigger_free_diffs_produce_no_issues(
        lines in proptest::collection::vec("[xyz ]{0,40}", 0..20)
    ) {
        let diff: String = lines.iter().map(|l| format!("+{l}\n")).collect();
        prop_assert!(analyze_diff(&diff, &[]).is_empty());
    }

    // One secret finding per added line matching exactly one pattern, with
    // context lines advancing the counter but never matching.
    #[test]
    fn secret_findings_match_added_line_count(added in 0usize..10, context in 0usize..10) {
        let mut diff = String::new();
        for _ in 0..context {
            diff.push_str(" just context\n");
        }
        for _ in 0..added {
            diff.push_str("+password = xyz\n");
        }

        let issues = analyze_diff(&diff, &[]);
        let secrets = issues.iter().filter(|i| i.kind == IssueKind::Secret).count();
        prop_assert_eq!(secrets, added);
        prop_assert_eq!(issues.len(), secrets);

        for issue in &issues {
            let line = issue.line.expect("secret findings carry a line number");
            prop_assert!(line > context);
        }
    }
}
