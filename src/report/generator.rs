use crate::domain::TodoItem;
use crate::ledger::{DaySummary, HourlySeries, StudyLedger, SubjectShare};
use crate::persistence::{
    atomic_write, get_typed, registered_user, report_file, JsonFileStore, KEY_TODO_DATA,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Format seconds as "Xh Ym" or "Xm" for display
fn format_duration(seconds: u64) -> String {
    let total_mins = seconds / 60;
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format a 0..=1 fraction with 1 decimal place
fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Generate a markdown study report for the specified date
pub fn generate_report(date: Option<NaiveDate>, output_path: Option<PathBuf>) -> Result<PathBuf> {
    let report_date = date.unwrap_or_else(|| Local::now().date_naive());

    let store = JsonFileStore::open_default()?;
    let Some(user_id) = registered_user(&store)? else {
        anyhow::bail!("No account registered yet. Run `swot register <id>` first.");
    };

    let todos: crate::domain::TodoStore = get_typed(&store, KEY_TODO_DATA)?.unwrap_or_default();
    let ledger = StudyLedger::load(store)?;

    let summary = ledger.summarize(&user_id, report_date);
    let shares = ledger.subject_distribution(&user_id, report_date);
    let hourly = ledger.hourly_distribution(&user_id, report_date);

    let report = build_report(
        &user_id,
        report_date,
        summary,
        &shares,
        &hourly,
        todos.items(report_date),
    );

    let path = match output_path {
        Some(path) => path,
        None => report_file(report_date)?,
    };
    atomic_write(&path, &report)?;

    Ok(path)
}

/// Render the report body (pure, for testability)
pub fn build_report(
    user_id: &str,
    date: NaiveDate,
    summary: DaySummary,
    shares: &[SubjectShare],
    hourly: &[u64; 24],
    todos: &[TodoItem],
) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Study Report - {} ({})\n\n", date, user_id));

    // Summary section
    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Total:** {}\n", format_duration(summary.total_seconds)));
    report.push_str(&format!("- **Focus:** {}\n", format_duration(summary.focus_seconds)));
    report.push_str(&format!("- **Normal:** {}\n\n", format_duration(summary.normal_seconds)));

    // Subject distribution section
    report.push_str("## Subjects\n\n");
    if shares.is_empty() {
        report.push_str("No study time recorded.\n\n");
    } else {
        report.push_str("| Subject | Time | Share |\n");
        report.push_str("|---------|------|-------|\n");
        for share in shares {
            report.push_str(&format!(
                "| {} | {} | {} |\n",
                share.subject,
                format_duration(share.seconds),
                format_percent(share.fraction)
            ));
        }
        report.push('\n');
    }

    // Hourly section, in the unit picked from the day's peak
    let has_hourly = hourly.iter().any(|&secs| secs > 0);
    if has_hourly {
        let series = HourlySeries::from_seconds(hourly);
        report.push_str(&format!("## By Hour ({})\n\n", series.unit.label()));
        for (hour, (&secs, value)) in hourly.iter().zip(series.values.iter()).enumerate() {
            if secs > 0 {
                report.push_str(&format!("- {:02}:00 — {:.1} {}\n", hour, value, series.unit.label()));
            }
        }
        report.push('\n');
    }

    // Todo section
    report.push_str("## Todos\n\n");
    if todos.is_empty() {
        report.push_str("No todos for this date.\n");
    } else {
        for todo in todos {
            let mark = if todo.is_done { "x" } else { " " };
            match &todo.memo {
                Some(memo) => {
                    report.push_str(&format!("- [{}] {} — {}\n", mark, todo.title, memo))
                }
                None => report.push_str(&format!("- [{}] {}\n", mark, todo.title)),
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(59), "0m");
        assert_eq!(format_duration(60), "1m");
        assert_eq!(format_duration(3600), "1h");
        assert_eq!(format_duration(3661), "1h 1m");
    }

    #[test]
    fn test_build_report_with_data() {
        let summary = DaySummary {
            total_seconds: 3661,
            focus_seconds: 3661,
            normal_seconds: 0,
        };
        let shares = vec![SubjectShare {
            subject: "Math".to_string(),
            seconds: 3661,
            fraction: 1.0,
        }];
        let mut hourly = [0u64; 24];
        hourly[13] = 3661;

        let mut todos = TodoStore::new();
        let day = date("2024-01-01");
        todos.add(day, "read chapter 3").unwrap();
        todos.toggle_done(day, 0);
        todos.set_memo(day, 0, "pages 40-60");

        let report = build_report("alice", day, summary, &shares, &hourly, todos.items(day));

        assert!(report.contains("# Study Report - 2024-01-01 (alice)"));
        assert!(report.contains("- **Total:** 1h 1m"));
        assert!(report.contains("| Math | 1h 1m | 100.0% |"));
        // 3661s peak reads in hours
        assert!(report.contains("## By Hour (hr)"));
        assert!(report.contains("- 13:00 — 1.0 hr"));
        assert!(report.contains("- [x] read chapter 3 — pages 40-60"));
    }

    #[test]
    fn test_build_report_empty_day() {
        let report = build_report(
            "alice",
            date("2024-01-01"),
            DaySummary::default(),
            &[],
            &[0u64; 24],
            &[],
        );

        assert!(report.contains("No study time recorded."));
        assert!(report.contains("No todos for this date."));
        assert!(!report.contains("## By Hour"));
    }
}
