//! Telegram adapter (teloxide).
//!
//! This crate implements the `domwatch-core` MessagingPort over the Telegram Bot API
//! and routes inbound commands to the core dispatcher.

use async_trait::async_trait;

use teloxide::{prelude::*, types::ParseMode};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use domwatch_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    formatting::split_message,
    messaging::port::MessagingPort,
    Result,
};

const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    safe_limit: usize,
}

impl TelegramMessenger {
    pub fn new(bot: Bot, safe_limit: usize) -> Self {
        Self {
            bot,
            safe_limit: safe_limit.clamp(200, TELEGRAM_MAX_MESSAGE_LEN),
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    /// Sends `html`, split at line boundaries when it exceeds the safe limit.
    /// Returns the reference of the last chunk sent.
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let mut last = None;
        for chunk in split_message(html, self.safe_limit) {
            let msg = self
                .with_retry(|| {
                    self.bot
                        .send_message(Self::tg_chat(chat_id), chunk.clone())
                        .parse_mode(ParseMode::Html)
                })
                .await?;
            last = Some(MessageRef {
                chat_id,
                message_id: MessageId(msg.id.0),
            });
        }

        last.ok_or_else(|| Error::External("refusing to send an empty message".to_string()))
    }
}
