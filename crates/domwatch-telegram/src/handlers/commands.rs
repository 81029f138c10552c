use std::sync::Arc;

use teloxide::prelude::*;
use tracing::error;

use domwatch_core::{
    domain::{ChatId, UserId},
    messaging::types::Command,
};

use crate::router::AppState;

/// Commands that wait on the remote API run in their own task so the chat's other
/// commands are not queued behind them.
fn runs_detached(name: &str) -> bool {
    matches!(name, "check" | "checknow")
}

fn to_command(msg: &Message, text: &str, bot_username: Option<&str>) -> Option<Command> {
    let user = msg.from();
    let user_id = user.map(|u| u.id.0 as i64).unwrap_or_default();
    let username = user.and_then(|u| u.username.clone());
    Command::parse(
        ChatId(msg.chat.id.0),
        UserId(user_id),
        username,
        text,
        bot_username,
    )
}

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(cmd) = to_command(&msg, text, state.bot_username.as_deref()) else {
        return Ok(());
    };

    if runs_detached(&cmd.name) {
        tokio::spawn(async move {
            run(bot, state, cmd).await;
        });
        return Ok(());
    }

    run(bot, state, cmd).await;
    Ok(())
}

async fn run(bot: Bot, state: Arc<AppState>, cmd: Command) {
    if let Err(e) = state.dispatcher.dispatch(&cmd).await {
        error!(chat_id = cmd.chat_id.0, command = %cmd.name, "command failed: {e}");
        // Last resort reply straight through the bot, bypassing the port that just failed.
        let _ = bot
            .send_message(
                teloxide::types::ChatId(cmd.chat_id.0),
                format!("⚠️ /{} failed: {}", cmd.name, e.user_message()),
            )
            .await;
    }
}
