//! Alert notification channels
//!
//! Events go to the log (always) and to Telegram when a bot token and chat
//! are configured. Delivery failures are logged and never reach the caller.

use super::types::{AlertEvent, AlertSeverity};
use crate::error::NotifyError;

use std::time::Duration;

/// Telegram Bot API base
pub const TELEGRAM_API: &str = "https://api.telegram.org";

/// Fixed timeout for a single Telegram delivery
pub const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification channel trait
pub trait Notifier: Send + Sync {
    /// Deliver one event
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Writes events to the process log, at a level matching their severity
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    fn level(severity: AlertSeverity) -> log::Level {
        match severity {
            AlertSeverity::Info => log::Level::Info,
            AlertSeverity::Warning | AlertSeverity::Critical => log::Level::Warn,
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        log::log!(
            Self::level(event.severity()),
            "[{}] {}",
            event.severity(),
            event.message()
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Sends events as Telegram bot messages
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Notifier for the given bot token and chat id
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_base: TELEGRAM_API.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Point the notifier at a different Bot API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: &AlertEvent) -> Result<(), NotifyError> {
        let text = event.message();
        let response = self
            .client
            .post(self.send_url())
            .timeout(TELEGRAM_TIMEOUT)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text.as_str())])
            .send()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// Notification manager
///
/// Fans each event out to every registered channel
pub struct NotificationManager {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationManager {
    /// Manager with no channels
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Log channel plus Telegram when credentials are given
    pub fn from_credentials(telegram: Option<(&str, &str)>) -> Self {
        let mut manager = Self::default();
        match telegram {
            Some((token, chat_id)) => {
                manager.add_notifier(Box::new(TelegramNotifier::new(token, chat_id)));
            }
            None => log::info!("Telegram not configured, alerts go to the log only"),
        }
        manager
    }

    /// Add a notifier
    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Send an event to all channels
    ///
    /// Failures are logged per channel and otherwise ignored.
    pub fn notify_all(&self, event: &AlertEvent) {
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(event) {
                log::warn!("Failed to notify via {}: {}", notifier.name(), e);
            }
        }
    }

    /// Send several events, in order
    pub fn notify_batch(&self, events: &[AlertEvent]) {
        for event in events {
            self.notify_all(event);
        }
    }

    /// Get number of active notifiers
    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        let mut manager = Self::new();
        manager.add_notifier(Box::new(LogNotifier::new()));
        manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::DeviceEndpoint;
    use crate::mock::RecordingNotifier;

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _event: &AlertEvent) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected(401))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn restarted() -> AlertEvent {
        AlertEvent::Restarted {
            device: DeviceEndpoint::new("10.0.0.1"),
        }
    }

    #[test]
    fn test_notification_manager_default() {
        let manager = NotificationManager::default();
        assert_eq!(manager.notifier_count(), 1);
    }

    #[test]
    fn test_from_credentials() {
        assert_eq!(
            NotificationManager::from_credentials(Some(("t", "c"))).notifier_count(),
            2
        );
        assert_eq!(NotificationManager::from_credentials(None).notifier_count(), 1);
    }

    #[test]
    fn test_from_config_credentials() {
        let mut config = Config::default();
        config.telegram.token = Some("t".to_string());
        config.telegram.chat_id = Some(String::new());
        let manager = NotificationManager::from_credentials(config.telegram_credentials());
        assert_eq!(manager.notifier_count(), 1);

        config.telegram.chat_id = Some("c".to_string());
        let manager = NotificationManager::from_credentials(config.telegram_credentials());
        assert_eq!(manager.notifier_count(), 2);
    }

    #[test]
    fn test_failure_does_not_stop_other_channels() {
        let recorder = RecordingNotifier::new();
        let mut manager = NotificationManager::new();
        manager.add_notifier(Box::new(FailingNotifier));
        manager.add_notifier(Box::new(recorder.clone()));

        manager.notify_batch(&[restarted(), restarted()]);

        assert_eq!(recorder.events().len(), 2);
    }

    #[test]
    fn test_telegram_url() {
        let notifier = TelegramNotifier::new("123:abc", "42").with_api_base("http://localhost:1/");
        assert_eq!(notifier.send_url(), "http://localhost:1/bot123:abc/sendMessage");
        assert_eq!(notifier.name(), "telegram");
    }

    #[test]
    fn test_telegram_unreachable_is_transport_error() {
        let notifier = TelegramNotifier::new("t", "c").with_api_base("http://127.0.0.1:9");
        let err = notifier.notify(&restarted()).unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogNotifier::level(AlertSeverity::Info), log::Level::Info);
        assert_eq!(
            LogNotifier::level(AlertSeverity::Critical),
            log::Level::Warn
        );
        assert!(LogNotifier.notify(&restarted()).is_ok());
    }
}
