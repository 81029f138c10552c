use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    checker::StatusChecker,
    cycle::{CheckCycle, CycleOutcome},
    domain::ChatId,
    messaging::{port::MessagingPort, types::Command},
    normalize::parse_domain_args,
    report::{
        checking_notice, format_add_report, format_remove_report, format_result,
        format_watchlist, help_text, unknown_command_text, welcome_text, CHECKNOW_NOTICE,
        USAGE_ADD, USAGE_CHECK, USAGE_REMOVE,
    },
    store::WatchlistStore,
    Result,
};

/// Commands understood by the bot, for menus and help.
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Activate reports in this chat"),
    ("add", "Add domains to the watchlist"),
    ("remove", "Remove domains from the watchlist"),
    ("list", "Show watched domains"),
    ("check", "Check one domain now"),
    ("checknow", "Check the whole watchlist now"),
    ("help", "Show available commands"),
];

/// Maps chat commands onto the store and the check cycle. Every command gets a reply.
#[derive(Clone)]
pub struct CommandDispatcher {
    store: Arc<WatchlistStore>,
    checker: Arc<StatusChecker>,
    cycle: CheckCycle,
    messenger: Arc<dyn MessagingPort>,
}

impl CommandDispatcher {
    pub fn new(
        store: Arc<WatchlistStore>,
        checker: Arc<StatusChecker>,
        cycle: CheckCycle,
        messenger: Arc<dyn MessagingPort>,
    ) -> Self {
        Self {
            store,
            checker,
            cycle,
            messenger,
        }
    }

    pub async fn dispatch(&self, cmd: &Command) -> Result<()> {
        info!(
            chat_id = cmd.chat_id.0,
            user_id = cmd.user_id.0,
            username = cmd.username.as_deref().unwrap_or("unknown"),
            command = %cmd.name,
            "command received"
        );

        let chat_id = cmd.chat_id;
        match cmd.name.as_str() {
            "start" | "activate" => {
                self.store.set_target(chat_id);
                info!(chat_id = chat_id.0, "report target set");
                self.reply(chat_id, &welcome_text()).await
            }
            "help" => self.reply(chat_id, &help_text()).await,
            "add" => {
                let domains = parse_domain_args(&cmd.args);
                if domains.is_empty() {
                    return self.reply(chat_id, USAGE_ADD).await;
                }
                let report = self.store.add_domains(&domains);
                self.reply(chat_id, &format_add_report(&report)).await
            }
            "remove" => {
                let domains = parse_domain_args(&cmd.args);
                if domains.is_empty() {
                    return self.reply(chat_id, USAGE_REMOVE).await;
                }
                let report = self.store.remove_domains(&domains);
                self.reply(chat_id, &format_remove_report(&report)).await
            }
            "list" => {
                let domains = self.store.list();
                self.reply(chat_id, &format_watchlist(&domains)).await
            }
            "check" => {
                let Some(domain) = parse_domain_args(&cmd.args).into_iter().next() else {
                    return self.reply(chat_id, USAGE_CHECK).await;
                };
                self.reply(chat_id, &checking_notice(&domain)).await?;
                let result = self.checker.check(&domain).await;
                self.reply(chat_id, &format_result(&result)).await
            }
            "checknow" => {
                self.reply(chat_id, CHECKNOW_NOTICE).await?;
                match self.cycle.run(Some(chat_id)).await? {
                    CycleOutcome::Reported { checked } => {
                        info!(chat_id = chat_id.0, checked, "manual check finished");
                    }
                    other => info!(chat_id = chat_id.0, outcome = ?other, "manual check finished"),
                }
                Ok(())
            }
            other => {
                warn!(command = other, "unknown command");
                self.reply(chat_id, &unknown_command_text(other)).await
            }
        }
    }

    async fn reply(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.messenger.send_html(chat_id, html).await?;
        Ok(())
    }
}
