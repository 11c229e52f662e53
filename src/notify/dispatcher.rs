use {
    crate::{
        config::{ChannelConfig, DF, TelegramAccount},
        error::SignalError,
        notify::MessageTransport,
    },
    futures::future::join_all,
    std::sync::Arc,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelOutcome {
    pub channel_id: u32,
    pub channel_name: String,
    pub result: Result<(), SignalError>,
}

/// Every active channel's settled result, in channel order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SignalError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Fans one message out to every active channel at once.
pub struct NotificationDispatcher {
    transport: Arc<dyn MessageTransport>,
    accounts: Arc<Vec<TelegramAccount>>,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MessageTransport>, accounts: Vec<TelegramAccount>) -> Self {
        Self {
            transport,
            accounts: Arc::new(accounts),
        }
    }

    pub fn accounts(&self) -> &[TelegramAccount] {
        &self.accounts
    }

    /// Waits for every send to settle. Never fails as a whole; inactive channels are ignored.
    pub async fn dispatch(&self, text: &str, channels: &[ChannelConfig]) -> DispatchReport {
        let active: Vec<&ChannelConfig> = channels.iter().filter(|ch| ch.active).collect();
        if active.is_empty() {
            log::info!("📭 No active channels, message not sent");
            return DispatchReport::default();
        }

        let text: Arc<str> = Arc::from(text);
        let handles = active.iter().map(|channel| {
            let account = self.accounts.iter().find(|a| a.id == channel.id).cloned();
            let transport = Arc::clone(&self.transport);
            let text = Arc::clone(&text);
            let label = channel.display_name.clone();

            tokio::spawn(async move {
                let Some(account) = account else {
                    return Err(SignalError::Notification {
                        channel: label,
                        reason: "no credentials configured".to_string(),
                    });
                };
                transport
                    .send(&account, &text)
                    .await
                    .map_err(|e| SignalError::Notification {
                        channel: label,
                        reason: format!("{:#}", e),
                    })
            })
        });

        let settled = join_all(handles).await;

        let outcomes: Vec<ChannelOutcome> = active
            .iter()
            .zip(settled)
            .map(|(channel, joined)| {
                let result = joined.unwrap_or_else(|e| {
                    Err(SignalError::Notification {
                        channel: channel.display_name.clone(),
                        reason: format!("send task aborted: {}", e),
                    })
                });
                ChannelOutcome {
                    channel_id: channel.id,
                    channel_name: channel.display_name.clone(),
                    result,
                }
            })
            .collect();

        let report = DispatchReport { outcomes };
        for failure in report.failures() {
            log::warn!("📵 {}", failure);
        }
        if DF.log_notifications {
            log::info!(
                "📨 Dispatched to {}/{} channels",
                report.successes(),
                report.outcomes.len()
            );
        }
        report
    }
}
