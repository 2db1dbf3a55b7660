//! OS signal watching for cooperative cancellation
//!
//! A [`SignalWatcher`] listens for a fixed set of signals for as long as it
//! is alive. The first delivery cancels the generator's token, which moves
//! the run into draining-cancel state: workers stop taking new tokens while
//! anything already in flight completes and is tallied. Later deliveries
//! are logged and otherwise ignored.
//!
//! Note that once tokio installs a handler for a signal, the process-wide
//! default action for that signal (terminate) stays replaced even after the
//! watcher is dropped.

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// OS signals that can trigger cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// SIGINT (Ctrl+C)
    Interrupt,
    /// SIGTERM
    Terminate,
    /// SIGHUP
    Hangup,
    /// SIGQUIT
    Quit,
}

impl Signal {
    /// Signals the abuse commands arm by default
    pub fn defaults() -> [Signal; 2] {
        [Signal::Interrupt, Signal::Terminate]
    }

    /// Conventional signal name
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Hangup => "SIGHUP",
            Signal::Quit => "SIGQUIT",
        }
    }

    #[cfg(unix)]
    fn kind(&self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;
        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Hangup => SignalKind::hangup(),
            Signal::Quit => SignalKind::quit(),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().trim_start_matches("SIG") {
            "INT" | "INTERRUPT" => Ok(Signal::Interrupt),
            "TERM" | "TERMINATE" => Ok(Signal::Terminate),
            "HUP" | "HANGUP" => Ok(Signal::Hangup),
            "QUIT" => Ok(Signal::Quit),
            _ => Err(format!("Unknown signal: {}", s)),
        }
    }
}

/// Listens for signals and cancels a token when one arrives
///
/// Listener tasks are aborted when the watcher is dropped.
#[derive(Debug)]
pub struct SignalWatcher {
    handles: Vec<JoinHandle<()>>,
}

impl SignalWatcher {
    /// Start listening for `signals`, cancelling `token` on receipt
    ///
    /// An empty signal list yields an inert watcher. Signals that cannot be
    /// registered are logged and skipped.
    pub fn spawn(signals: &[Signal], token: CancellationToken) -> Self {
        let mut handles = Vec::with_capacity(signals.len());

        for &signal in signals {
            if let Some(handle) = listen(signal, token.clone()) {
                handles.push(handle);
            }
        }

        Self { handles }
    }

    /// Number of signals actively being listened for
    pub fn armed(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for SignalWatcher {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

/// Cancel `token` on behalf of `signal`; repeated deliveries are no-ops
pub(crate) fn request_cancel(signal: Signal, token: &CancellationToken) {
    if token.is_cancelled() {
        tracing::debug!(signal = %signal, "Signal received while already draining");
        return;
    }
    tracing::warn!(
        signal = %signal,
        "Signal received, draining in-flight work before stopping"
    );
    token.cancel();
}

#[cfg(unix)]
fn listen(signal: Signal, token: CancellationToken) -> Option<JoinHandle<()>> {
    let mut stream = match tokio::signal::unix::signal(signal.kind()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(signal = %signal, error = %e, "Failed to register signal handler");
            return None;
        }
    };

    Some(tokio::spawn(async move {
        while stream.recv().await.is_some() {
            request_cancel(signal, &token);
        }
    }))
}

#[cfg(not(unix))]
fn listen(signal: Signal, token: CancellationToken) -> Option<JoinHandle<()>> {
    Some(tokio::spawn(async move {
        loop {
            match tokio::signal::ctrl_c().await {
                Ok(()) => request_cancel(signal, &token),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                    return;
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_from_str() {
        assert_eq!("SIGINT".parse::<Signal>(), Ok(Signal::Interrupt));
        assert_eq!("term".parse::<Signal>(), Ok(Signal::Terminate));
        assert_eq!("HUP".parse::<Signal>(), Ok(Signal::Hangup));
        assert_eq!("sigquit".parse::<Signal>(), Ok(Signal::Quit));
        assert!("usr1".parse::<Signal>().is_err());
    }

    #[test]
    fn test_signal_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&Signal::Interrupt).unwrap(),
            "\"interrupt\""
        );
        let parsed: Signal = serde_json::from_str("\"terminate\"").unwrap();
        assert_eq!(parsed, Signal::Terminate);
    }

    #[test]
    fn test_request_cancel_is_idempotent() {
        let token = CancellationToken::new();
        request_cancel(Signal::Interrupt, &token);
        request_cancel(Signal::Interrupt, &token);
        request_cancel(Signal::Terminate, &token);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_empty_watcher_is_inert() {
        let token = CancellationToken::new();
        let watcher = SignalWatcher::spawn(&[], token.clone());
        assert_eq!(watcher.armed(), 0);
        drop(watcher);
        assert!(!token.is_cancelled());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_watcher_arms_each_signal() {
        let token = CancellationToken::new();
        let watcher = SignalWatcher::spawn(&[Signal::Hangup, Signal::Quit], token.clone());
        assert_eq!(watcher.armed(), 2);
        drop(watcher);
        assert!(!token.is_cancelled());
    }
}
