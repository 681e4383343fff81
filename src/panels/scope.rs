//! Scoped panel tasks
//!
//! A [`PanelScope`] owns the fetches started for a mounted page. Dropping
//! the scope aborts whatever is still in flight, so a response arriving
//! after the user navigated away never touches an unmounted panel.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A panel shared between its owner and the task loading it
pub type Shared<P> = Arc<Mutex<P>>;

pub fn shared<P>(panel: P) -> Shared<P> {
    Arc::new(Mutex::new(panel))
}

pub struct PanelScope {
    name: &'static str,
    tasks: Vec<JoinHandle<()>>,
}

impl PanelScope {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: Vec::new(),
        }
    }

    /// Run `fut` for as long as the scope lives
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push(tokio::spawn(fut));
    }

    /// Tasks not yet finished
    pub fn pending(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait for every task started so far
    pub async fn settle(&mut self) {
        for handle in self.tasks.drain(..) {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(scope = self.name, error = %e, "Panel task panicked");
                }
            }
        }
    }
}

impl Drop for PanelScope {
    fn drop(&mut self) {
        let mut aborted = 0;
        for handle in &self.tasks {
            if !handle.is_finished() {
                handle.abort();
                aborted += 1;
            }
        }
        if aborted > 0 {
            tracing::debug!(scope = self.name, aborted, "Unmounted with fetches in flight");
        }
    }
}
