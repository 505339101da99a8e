use tokio::sync::broadcast;

/// Fan-out for stop requests (signals, or tests ending a run early).
pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;
