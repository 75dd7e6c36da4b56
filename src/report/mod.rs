//! Markdown report generation.
//!
//! Produces the leaderboard document and the CI step summaries. Output is a
//! pure function of its inputs: structure rows follow name order, so
//! rendering the same record and table twice yields identical text.

pub mod inject;

pub use inject::{inject_section, END_MARKER, START_MARKER};

use crate::history::BestTable;
use crate::record::{commit_prefix, RunRecord};
use std::fmt::Write;

/// Note appended to the step summary after the leaderboard step.
pub const LEADERBOARD_UPDATED_NOTE: &str =
    "# Leaderboard updated\nSee **OLYMPICS.md** and README section.\n";

fn ops(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Render the leaderboard for the latest run and the best-ever table.
pub fn render_leaderboard(latest: &RunRecord, best: &BestTable) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("# 🏅 Data Structures Olympics\n".to_string());
    lines.push(
        "Automatic performance comparison (insert/search) executed via GitHub Actions.\n"
            .to_string(),
    );
    lines.push("This section is updated on every push.\n".to_string());

    lines.push("\n## Last run\n".to_string());
    let wl = &latest.workload;
    lines.push(format!(
        "- Commit: `{}`  \n- Timestamp (UTC): `{}`  \n- Workload: insert={}, hit={}, miss={}, reps={}",
        commit_prefix(&latest.commit),
        latest.timestamp,
        wl.n_insert,
        wl.n_hit,
        wl.n_miss,
        latest.repetitions
    ));

    lines.push("\n### Results (medians)\n".to_string());
    lines.push(
        "| Structure | Insert (ms) | Search hit (ms) | Search miss (ms) | Total (ms) | OPS/s hit | OPS/s miss |"
            .to_string(),
    );
    lines.push("|---|---:|---:|---:|---:|---:|---:|".to_string());
    for (name, g) in &latest.aggregate {
        lines.push(format!(
            "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {} | {} |",
            name,
            g.insert_ms.median,
            g.search_hit_ms.median,
            g.search_miss_ms.median,
            g.total_ms.median,
            ops(g.ops_per_sec.search_hit),
            ops(g.ops_per_sec.search_miss),
        ));
    }

    lines.push("\n## Hall of Fame (best total – median ms)\n".to_string());
    lines.push("| Structure | Best total (ms) | Commit | Timestamp (UTC) |".to_string());
    lines.push("|---|---:|---|---|".to_string());
    for (name, b) in best {
        lines.push(format!(
            "| {} | {:.3} | `{}` | {} |",
            name, b.total_ms_median, b.commit, b.timestamp
        ));
    }

    lines.join("\n")
}

/// Render the per-run summary appended to the CI job summary.
pub fn render_step_summary(record: &RunRecord) -> String {
    let mut out = String::from("# Olympics – Latest results\n\n");

    for (name, g) in &record.aggregate {
        // writing to a String cannot fail
        let _ = writeln!(out, "## {}", name);
        let _ = writeln!(
            out,
            "- Insert (ms): median **{:.3}** (mean {:.3} ± {:.3})",
            g.insert_ms.median, g.insert_ms.mean, g.insert_ms.stdev
        );
        let _ = writeln!(out, "- Search hit (ms): median **{:.3}**", g.search_hit_ms.median);
        let _ = writeln!(out, "- Search miss (ms): median **{:.3}**", g.search_miss_ms.median);
        let _ = writeln!(out, "- Total (ms): median **{:.3}**", g.total_ms.median);
        let _ = writeln!(
            out,
            "- OPS/s: insert ~{}, hit ~{}, miss ~{}\n",
            ops(g.ops_per_sec.insert),
            ops(g.ops_per_sec.search_hit),
            ops(g.ops_per_sec.search_miss)
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workload;
    use crate::history::best_ever;
    use crate::measurement::{RunResult, Timings};
    use chrono::{TimeZone, Utc};

    fn latest() -> RunRecord {
        let mut run = RunResult::new();
        run.insert("skiplist", Timings::new(10.0, 5.0, 5.0));
        run.insert("list", Timings::new(1.0, 0.0, 2000.0));
        RunRecord::from_runs(
            vec![run],
            Workload::default(),
            "0123456789abcdef",
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        )
    }

    #[test]
    fn test_leaderboard_contents() {
        let record = latest();
        let best = best_ever([&record]);
        let md = render_leaderboard(&record, &best);

        assert!(md.starts_with("# 🏅 Data Structures Olympics"));
        assert!(md.contains("- Commit: `0123456789ab`"));
        assert!(md.contains("- Timestamp (UTC): `2024-01-02T03:04:05Z`"));
        assert!(md.contains("insert=100000, hit=100000, miss=100000, reps=1"));
        assert!(md.contains("| skiplist | 10.000 | 5.000 | 5.000 | 20.000 | 20000000 | 20000000 |"));
        // zero search-hit median renders as n/a rather than inf
        assert!(md.contains("| list | 1.000 | 0.000 | 2000.000 | 2001.000 | n/a | 50000 |"));
        assert!(md.contains("| skiplist | 20.000 | `0123456789ab` | 2024-01-02T03:04:05Z |"));
    }

    #[test]
    fn test_leaderboard_is_deterministic() {
        let record = latest();
        let best = best_ever([&record]);
        assert_eq!(
            render_leaderboard(&record, &best),
            render_leaderboard(&record, &best)
        );

        let md = render_leaderboard(&record, &best);
        let list_row = md.find("| list |").unwrap();
        let skiplist_row = md.find("| skiplist |").unwrap();
        assert!(list_row < skiplist_row);
    }

    #[test]
    fn test_step_summary() {
        let summary = render_step_summary(&latest());
        assert!(summary.starts_with("# Olympics – Latest results"));
        assert!(summary.contains("## skiplist"));
        assert!(summary.contains("- Insert (ms): median **10.000** (mean 10.000 ± 0.000)"));
        assert!(summary.contains("- OPS/s: insert ~100000000, hit ~n/a, miss ~50000"));
    }
}
