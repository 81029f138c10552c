//! Test doubles for the ports.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::port::MessagingPort,
    ports::DomainStatusApi,
    status::ApiReply,
    Result,
};

/// Scripted reply for one domain.
#[derive(Clone, Debug)]
pub enum Scripted {
    Status(&'static str, Option<&'static str>),
    Failure(&'static str),
    Error(&'static str),
    Hang,
}

/// In-memory `DomainStatusApi` that records calls with their (tokio) timestamps.
/// Unscripted domains answer `allowed`.
#[derive(Default)]
pub struct FakeApi {
    replies: HashMap<String, Scripted>,
    calls: Mutex<Vec<(String, tokio::time::Instant)>>,
}

impl FakeApi {
    pub fn new(replies: &[(&str, Scripted)]) -> Self {
        Self {
            replies: replies
                .iter()
                .map(|(d, r)| (d.to_string(), r.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn called_domains(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(d, _)| d.clone())
            .collect()
    }

    pub fn call_times(&self) -> Vec<tokio::time::Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl DomainStatusApi for FakeApi {
    async fn check_domain(&self, domain: &str) -> Result<ApiReply> {
        self.calls
            .lock()
            .unwrap()
            .push((domain.to_string(), tokio::time::Instant::now()));

        match self.replies.get(domain).cloned() {
            Some(Scripted::Status(status, ip)) => Ok(ApiReply::Success {
                status: status.to_string(),
                ip: ip.map(str::to_string),
            }),
            Some(Scripted::Failure(msg)) => Ok(ApiReply::Failure {
                message: msg.to_string(),
            }),
            Some(Scripted::Error(msg)) => Err(Error::External(msg.to_string())),
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::External("unreachable".to_string()))
            }
            None => Ok(ApiReply::Success {
                status: "allowed".to_string(),
                ip: None,
            }),
        }
    }
}

/// Records every outbound message.
#[derive(Default)]
pub struct FakeMessenger {
    sends: Mutex<Vec<(ChatId, String)>>,
    fail: bool,
}

impl FakeMessenger {
    pub fn failing() -> Self {
        Self {
            sends: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sends.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, t)| t).collect()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        if self.fail {
            return Err(Error::External("send failed".to_string()));
        }
        let mut sends = self.sends.lock().unwrap();
        sends.push((chat_id, html.to_string()));
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(sends.len() as i32),
        })
    }
}
