//! User-facing text for check results and command replies (Telegram HTML).
//!
//! Everything here is a pure function of its input: no timestamps, no randomness,
//! so a scheduled report and a manual one over the same results are byte-identical.

use crate::{
    formatting::escape_html,
    normalize::domain_url,
    status::{DomainStatus, Outcome, StatusResult},
    store::{AddReport, RemoveReport},
};

pub const REPORT_HEADER: &str = "🔔 <b>Domain Status Report</b>";
pub const EMPTY_WATCHLIST_NOTICE: &str =
    "📭 Watchlist is empty. Add domains with <code>/add domain.com</code>.";

pub const USAGE_ADD: &str = "Usage: <code>/add domain1.com ...</code>\n\
You can also paste a list of domains on new lines after the command.";
pub const USAGE_REMOVE: &str = "Usage: <code>/remove domain1.com ...</code>\n\
You can also paste a list of domains on new lines after the command.";
pub const USAGE_CHECK: &str = "Usage: <code>/check domain.com</code>";

fn marker(status: DomainStatus) -> &'static str {
    match status {
        DomainStatus::Ok => "✅",
        DomainStatus::Blocked => "🔴",
        DomainStatus::Unknown => "❔",
    }
}

/// One line per checked domain.
pub fn format_result(result: &StatusResult) -> String {
    let domain = escape_html(&result.domain);
    match &result.outcome {
        Outcome::Error(err) => {
            format!(
                "❌ Error checking <code>{domain}</code>: {}",
                escape_html(err)
            )
        }
        Outcome::Status { status, ip } => {
            let ip = ip.as_deref().map(escape_html);
            format!(
                "{} <code>{}</code> is <b>{}</b> (IP: <code>{}</code>)",
                marker(*status),
                domain_url(&domain),
                status.label(),
                ip.as_deref().unwrap_or("N/A"),
            )
        }
    }
}

/// Header, a blank line, then one line per result in the given order.
pub fn build_report(results: &[StatusResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 2);
    lines.push(REPORT_HEADER.to_string());
    lines.push(String::new());
    lines.extend(results.iter().map(format_result));
    lines.join("\n")
}

pub fn format_add_report(report: &AddReport) -> String {
    let mut parts = vec!["📝 <b>Bulk Add Report</b>".to_string(), String::new()];
    if !report.added.is_empty() {
        parts.push(format!(
            "✅ Added <b>{}</b> new {}.",
            report.added.len(),
            plural(report.added.len())
        ));
    }
    if !report.already_present.is_empty() {
        parts.push(format!(
            "☑️ Skipped <b>{}</b> {} (already on list).",
            report.already_present.len(),
            plural(report.already_present.len())
        ));
    }
    parts.join("\n")
}

pub fn format_remove_report(report: &RemoveReport) -> String {
    let mut parts = vec!["🗑️ <b>Bulk Remove Report</b>".to_string(), String::new()];
    if !report.removed.is_empty() {
        parts.push(format!(
            "✅ Removed <b>{}</b> {}.",
            report.removed.len(),
            plural(report.removed.len())
        ));
    }
    if !report.not_found.is_empty() {
        parts.push(format!(
            "❓ Could not remove <b>{}</b> {} (not on list).",
            report.not_found.len(),
            plural(report.not_found.len())
        ));
    }
    parts.join("\n")
}

/// One `<code>` span per line, so the message can be split at any line break.
pub fn format_watchlist(domains: &[String]) -> String {
    if domains.is_empty() {
        return EMPTY_WATCHLIST_NOTICE.to_string();
    }
    let mut lines = Vec::with_capacity(domains.len() + 1);
    lines.push(format!("📋 <b>Current Watchlist ({}):</b>", domains.len()));
    lines.extend(
        domains
            .iter()
            .map(|d| format!("- <code>{}</code>", escape_html(&domain_url(d)))),
    );
    lines.join("\n")
}

pub fn checking_notice(domain: &str) -> String {
    format!(
        "🔍 Checking <code>{}</code>...",
        escape_html(&domain_url(domain))
    )
}

pub const CHECKNOW_NOTICE: &str =
    "🔍 On-demand check initiated. I will now check all domains on the watchlist...";

pub fn help_text() -> String {
    [
        "<b>Commands:</b>",
        "<code>/add domain1.com ...</code>\nAdds one or more domains to the watchlist.",
        "<code>/remove domain1.com ...</code>\nRemoves one or more domains.",
        "<code>/list</code>\nShows all watched domains.",
        "<code>/checknow</code>\nTriggers an immediate check of all domains on the watchlist.",
        "<code>/check domain.com</code>\nPerforms a single, one-time check for a specific domain.",
    ]
    .join("\n\n")
}

pub fn welcome_text() -> String {
    format!(
        "👋 <b>Hello, everyone! The domain checker is now active in this chat.</b>\n\n\
I will send periodic domain reports here. Any member can manage the watchlist.\n\n{}",
        help_text()
    )
}

pub fn unknown_command_text(name: &str) -> String {
    format!(
        "🤷 Unknown command <code>/{}</code>.\n\n{}",
        escape_html(name),
        help_text()
    )
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "domain"
    } else {
        "domains"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::split_message;

    #[test]
    fn formats_each_outcome() {
        let ok = StatusResult::status("a.com", DomainStatus::Ok, Some("1.1.1.1".into()));
        assert_eq!(
            format_result(&ok),
            "✅ <code>https://a.com/</code> is <b>OK</b> (IP: <code>1.1.1.1</code>)"
        );

        let blocked = StatusResult::status("b.com", DomainStatus::Blocked, None);
        assert_eq!(
            format_result(&blocked),
            "🔴 <code>https://b.com/</code> is <b>BLOCKED</b> (IP: <code>N/A</code>)"
        );

        let unknown = StatusResult::status("c.com", DomainStatus::Unknown, None);
        assert!(format_result(&unknown).starts_with("❔ "));
        assert!(format_result(&unknown).contains("<b>UNKNOWN</b>"));

        let err = StatusResult::error("d.com", "timed <out>");
        assert_eq!(
            format_result(&err),
            "❌ Error checking <code>d.com</code>: timed &lt;out&gt;"
        );
    }

    #[test]
    fn formatting_is_deterministic() {
        let r = StatusResult::status("a.com", DomainStatus::Blocked, Some("9.9.9.9".into()));
        assert_eq!(format_result(&r), format_result(&r.clone()));
    }

    #[test]
    fn report_keeps_input_order() {
        let report = build_report(&[
            StatusResult::error("a.com", "request timed out after 10s"),
            StatusResult::status("b.com", DomainStatus::Blocked, None),
        ]);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], REPORT_HEADER);
        assert_eq!(lines[1], "");
        assert!(lines[2].contains("a.com") && lines[2].starts_with("❌"));
        assert!(lines[3].contains("b.com") && lines[3].contains("BLOCKED"));
    }

    #[test]
    fn add_and_remove_reports_count_each_side() {
        let add = format_add_report(&AddReport {
            added: vec!["a.com".into(), "b.com".into()],
            already_present: vec!["c.com".into()],
        });
        assert!(add.contains("Added <b>2</b> new domains."));
        assert!(add.contains("Skipped <b>1</b> domain (already on list)."));

        let remove = format_remove_report(&RemoveReport {
            removed: vec![],
            not_found: vec!["x.com".into()],
        });
        assert!(!remove.contains("Removed"));
        assert!(remove.contains("Could not remove <b>1</b> domain (not on list)."));
    }

    #[test]
    fn watchlist_lists_full_urls() {
        let txt = format_watchlist(&["a.com".into(), "b.com".into()]);
        assert!(txt.contains("- <code>https://a.com/</code>\n- <code>https://b.com/</code>"));
        assert_eq!(format_watchlist(&[]), EMPTY_WATCHLIST_NOTICE);
    }

    #[test]
    fn long_watchlist_splits_into_balanced_chunks() {
        let domains: Vec<String> = (0..200)
            .map(|i| format!("some-long-domain-name-{i:03}.example.com"))
            .collect();
        let txt = format_watchlist(&domains);
        let chunks = split_message(&txt, 4000);
        assert!(chunks.len() > 1);

        for chunk in &chunks {
            assert!(chunk.len() <= 4000);
            assert_eq!(
                chunk.matches("<code>").count(),
                chunk.matches("</code>").count()
            );
            assert_eq!(chunk.matches("<b>").count(), chunk.matches("</b>").count());
            assert!(!chunk.contains("<pre>"));
        }
        let listed: usize = chunks.iter().map(|c| c.matches("<code>").count()).sum();
        assert_eq!(listed, 200);
    }
}
