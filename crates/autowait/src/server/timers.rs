// Timer queue - runs page timers on the tokio runtime
//
// Listeners schedule work with `Document::set_timeout`; the frame drains
// those requests after every interaction and hands them here. Each timer is
// a spawned task that sleeps, then runs its callback under the document
// lock and forwards whatever the callback scheduled in turn.
//
// Navigation bumps the generation and aborts outstanding tasks, so a timer
// from a previous page can never touch the next one. The pending count is
// what `networkidle` watches.

use crate::dom::Document;
use crate::dom::document::Timer;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct QueueState {
    generation: u64,
    pending: usize,
    handles: Vec<JoinHandle<()>>,
}

/// Pending timers of one page.
#[derive(Debug, Clone, Default)]
pub(crate) struct TimerQueue {
    state: Arc<Mutex<QueueState>>,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have not fired yet.
    pub(crate) fn pending(&self) -> usize {
        self.state.lock().pending
    }

    /// Spawns one task per timer against `document`.
    pub(crate) fn schedule(&self, document: &Arc<Mutex<Document>>, timers: Vec<Timer>) {
        if timers.is_empty() {
            return;
        }
        let mut state = self.state.lock();
        state.handles.retain(|h| !h.is_finished());
        let generation = state.generation;
        for timer in timers {
            state.pending += 1;
            tracing::debug!(delay_ms = timer.delay.as_millis() as u64, "Scheduling page timer");
            let queue = self.clone();
            let document = Arc::clone(document);
            state.handles.push(tokio::spawn(async move {
                tokio::time::sleep(timer.delay).await;
                queue.fire(&document, generation, timer);
            }));
        }
    }

    fn fire(&self, document: &Arc<Mutex<Document>>, generation: u64, timer: Timer) {
        let follow_up = {
            let mut doc = document.lock();
            if self.state.lock().generation != generation {
                return;
            }
            (timer.callback)(&mut doc);
            doc.take_scheduled()
        };
        self.schedule(document, follow_up);
        let mut state = self.state.lock();
        if state.generation == generation {
            state.pending = state.pending.saturating_sub(1);
        }
    }

    /// Cancels every outstanding timer (navigation or close).
    pub(crate) fn reset(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.pending = 0;
        for handle in state.handles.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn page() -> (Arc<Mutex<Document>>, TimerQueue) {
        let doc = Document::from_html("<div id='content'></div>");
        (Arc::new(Mutex::new(doc)), TimerQueue::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_fires_after_delay() {
        let (document, queue) = page();
        let timers = {
            let mut doc = document.lock();
            doc.set_timeout(Duration::from_secs(15), |doc| {
                let content = doc.get_element_by_id("content").unwrap();
                doc.append_html(content, "<p class='bg-success'>done</p>").unwrap();
            });
            doc.take_scheduled()
        };
        queue.schedule(&document, timers);
        assert_eq!(queue.pending(), 1);

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert!(document.lock().query_selector(".bg-success").unwrap().is_none());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(document.lock().query_selector(".bg-success").unwrap().is_some());
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_up_timers_stay_pending() {
        let (document, queue) = page();
        let timers = {
            let mut doc = document.lock();
            doc.set_timeout(Duration::from_secs(1), |doc| {
                doc.set_timeout(Duration::from_secs(1), |doc| doc.set_title("second"));
            });
            doc.take_scheduled()
        };
        queue.schedule(&document, timers);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(queue.pending(), 1);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(queue.pending(), 0);
        assert_eq!(document.lock().title(), "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_outstanding_timers() {
        let (document, queue) = page();
        let timers = {
            let mut doc = document.lock();
            doc.set_timeout(Duration::from_secs(1), |doc| doc.set_title("stale"));
            doc.take_scheduled()
        };
        queue.schedule(&document, timers);
        queue.reset();
        assert_eq!(queue.pending(), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(document.lock().title(), "");
    }
}
