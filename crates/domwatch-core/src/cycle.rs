//! One pass over the watchlist, shared by the scheduler and `/checknow`.
//!
//! There is no lock around a cycle: the scheduler awaits each run before the next
//! tick, but two quick manual triggers can still run side by side and post two
//! reports.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::{
    checker::StatusChecker,
    domain::ChatId,
    messaging::port::MessagingPort,
    pacing::Pacer,
    report::{build_report, EMPTY_WATCHLIST_NOTICE},
    store::WatchlistStore,
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No chat to report to (bot not activated yet).
    NoTarget,
    /// Watchlist empty; one notice sent, no remote calls.
    Empty,
    Reported { checked: usize },
}

#[derive(Clone)]
pub struct CheckCycle {
    store: Arc<WatchlistStore>,
    checker: Arc<StatusChecker>,
    messenger: Arc<dyn MessagingPort>,
    pacing: Duration,
}

impl CheckCycle {
    pub fn new(
        store: Arc<WatchlistStore>,
        checker: Arc<StatusChecker>,
        messenger: Arc<dyn MessagingPort>,
        pacing: Duration,
    ) -> Self {
        Self {
            store,
            checker,
            messenger,
            pacing,
        }
    }

    /// Check every watched domain and post one report.
    ///
    /// `target` overrides the stored report chat. Domains are checked one at a time in
    /// sorted order, at least `pacing` apart, and the report is sent only after the
    /// last check so partial results never reach the chat.
    pub async fn run(&self, target: Option<ChatId>) -> Result<CycleOutcome> {
        let record = self.store.load();
        let Some(chat_id) = target.or(record.target_chat) else {
            warn!("check cycle skipped: no target chat configured (use /start)");
            return Ok(CycleOutcome::NoTarget);
        };

        if record.domains.is_empty() {
            info!(chat_id = chat_id.0, "watchlist empty, sending notice");
            self.messenger
                .send_html(chat_id, EMPTY_WATCHLIST_NOTICE)
                .await?;
            return Ok(CycleOutcome::Empty);
        }

        info!(
            chat_id = chat_id.0,
            domains = record.domains.len(),
            "running domain check"
        );

        let mut pacer = Pacer::new(self.pacing);
        let mut results = Vec::with_capacity(record.domains.len());
        for domain in &record.domains {
            pacer.wait().await;
            results.push(self.checker.check(domain).await);
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        self.messenger
            .send_html(chat_id, &build_report(&results))
            .await?;

        info!(
            chat_id = chat_id.0,
            checked = results.len(),
            failed,
            "domain check finished and report sent"
        );
        Ok(CycleOutcome::Reported {
            checked: results.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        report::REPORT_HEADER,
        testing::{FakeApi, FakeMessenger, Scripted},
    };
    use tokio::time::Instant;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<WatchlistStore>,
        api: Arc<FakeApi>,
        messenger: Arc<FakeMessenger>,
        cycle: CheckCycle,
    }

    fn fixture(api: FakeApi, messenger: FakeMessenger) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(WatchlistStore::new(dir.path().join("domains.json")));
        let api = Arc::new(api);
        let messenger = Arc::new(messenger);
        let checker = Arc::new(StatusChecker::new(api.clone(), Duration::from_secs(10)));
        let cycle = CheckCycle::new(
            store.clone(),
            checker,
            messenger.clone(),
            Duration::from_secs(1),
        );
        Fixture {
            _dir: dir,
            store,
            api,
            messenger,
            cycle,
        }
    }

    #[tokio::test]
    async fn no_target_is_a_noop() {
        let f = fixture(FakeApi::default(), FakeMessenger::default());
        f.store.add_domains(["a.com"]);

        let outcome = f.cycle.run(None).await.unwrap();
        assert_eq!(outcome, CycleOutcome::NoTarget);
        assert!(f.messenger.sent().is_empty());
        assert!(f.api.called_domains().is_empty());
    }

    #[tokio::test]
    async fn empty_watchlist_sends_one_notice_and_no_remote_calls() {
        let f = fixture(FakeApi::default(), FakeMessenger::default());
        f.store.set_target(ChatId(5));

        let outcome = f.cycle.run(None).await.unwrap();
        assert_eq!(outcome, CycleOutcome::Empty);
        assert_eq!(
            f.messenger.sent(),
            vec![(ChatId(5), EMPTY_WATCHLIST_NOTICE.to_string())]
        );
        assert!(f.api.called_domains().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_and_blocked_produce_ordered_two_line_report() {
        let f = fixture(
            FakeApi::new(&[
                ("a.com", Scripted::Hang),
                ("b.com", Scripted::Status("BLOCKED", Some("10.0.0.1"))),
            ]),
            FakeMessenger::default(),
        );
        f.store.set_target(ChatId(9));
        f.store.add_domains(["b.com", "a.com"]);

        let outcome = f.cycle.run(None).await.unwrap();
        assert_eq!(outcome, CycleOutcome::Reported { checked: 2 });
        assert_eq!(f.api.called_domains(), vec!["a.com", "b.com"]);

        let sent = f.messenger.sent();
        assert_eq!(sent.len(), 1);
        let (chat, text) = &sent[0];
        assert_eq!(*chat, ChatId(9));

        let lines: Vec<&str> = text.lines().skip(2).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "❌ Error checking <code>a.com</code>: request timed out after 10s"
        );
        assert_eq!(
            lines[1],
            "🔴 <code>https://b.com/</code> is <b>BLOCKED</b> (IP: <code>10.0.0.1</code>)"
        );
        assert!(text.starts_with(REPORT_HEADER));
    }

    #[tokio::test(start_paused = true)]
    async fn checks_are_paced_sequentially() {
        let f = fixture(FakeApi::default(), FakeMessenger::default());
        f.store.set_target(ChatId(1));
        f.store.add_domains(["a.com", "b.com", "c.com"]);

        let start = Instant::now();
        f.cycle.run(None).await.unwrap();

        let times = f.api.call_times();
        assert_eq!(times.len(), 3);
        for pair in times.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= Duration::from_secs(1));
        }
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn supplied_target_overrides_stored_one() {
        let f = fixture(FakeApi::default(), FakeMessenger::default());
        f.store.set_target(ChatId(1));
        f.store.add_domains(["a.com"]);

        f.cycle.run(Some(ChatId(2))).await.unwrap();
        assert_eq!(f.messenger.sent()[0].0, ChatId(2));
        // Stored target is untouched.
        assert_eq!(f.store.load().target_chat, Some(ChatId(1)));
    }

    #[tokio::test]
    async fn send_failure_is_reported_to_caller() {
        let f = fixture(FakeApi::default(), FakeMessenger::failing());
        f.store.set_target(ChatId(1));
        f.store.add_domains(["a.com"]);

        assert!(f.cycle.run(None).await.is_err());
    }
}
