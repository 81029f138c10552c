use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};
use tracing::{info, warn};

use domwatch_core::{
    checker::StatusChecker,
    config::Config,
    cycle::CheckCycle,
    dispatcher::{CommandDispatcher, COMMANDS},
    messaging::{
        port::MessagingPort,
        throttled::{ThrottleConfig, ThrottledMessenger},
    },
    ports::DomainStatusApi,
    scheduler::CycleScheduler,
    store::WatchlistStore,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    /// Our own username; commands mentioning another bot are ignored.
    pub bot_username: Option<String>,
    pub dispatcher: Arc<CommandDispatcher>,
}

pub async fn run_polling(cfg: Arc<Config>, api: Arc<dyn DomainStatusApi>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            info!("bot started: @{}", me.username());
            Some(me.username().to_string())
        }
        Err(e) => {
            warn!("get_me failed (continuing): {e}");
            None
        }
    };
    info!(data_file = %cfg.data_file.display(), "watchlist file");

    // Throttle on top of the adapter's own RetryAfter retry.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        cfg.telegram_safe_limit,
    ));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::default(),
    ));

    let store = Arc::new(WatchlistStore::new(cfg.data_file.clone()));
    let checker = Arc::new(StatusChecker::new(api, cfg.check_timeout));
    let cycle = CheckCycle::new(
        store.clone(),
        checker.clone(),
        messenger.clone(),
        cfg.check_pacing,
    );

    let scheduler = CycleScheduler::new(cycle.clone(), cfg.initial_delay, cfg.check_interval);
    scheduler.start().await;

    let dispatcher = Arc::new(CommandDispatcher::new(store, checker, cycle, messenger));

    let menu = COMMANDS
        .iter()
        .map(|(name, desc)| BotCommand::new(*name, *desc))
        .collect::<Vec<_>>();
    if let Err(e) = bot.set_my_commands(menu).await {
        warn!("failed to register bot commands: {e}");
    }

    let state = Arc::new(AppState {
        bot_username,
        dispatcher,
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    scheduler.stop().await;
    info!("bot stopped");

    Ok(())
}
