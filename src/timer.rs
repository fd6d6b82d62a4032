use crate::app::SharedApp;
use std::time::Duration;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Pending automatic advance for one card instance. Dropping the handle
/// cancels it.
pub struct AutoAdvance {
    ticket: Uuid,
    handle: JoinHandle<()>,
}

impl AutoAdvance {
    pub fn schedule(app: SharedApp, ticket: Uuid, delay: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut app = app.lock().await;
            if app.advance(Some(ticket)) {
                log::debug!("auto-advanced past card instance {}", ticket);
            }
        });
        Self { ticket, handle }
    }

    pub fn ticket(&self) -> Uuid {
        self.ticket
    }

    pub fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
