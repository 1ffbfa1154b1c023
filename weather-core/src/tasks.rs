//! Keyed background tasks that report back through a channel.
//!
//! Spawning under a key that is already taken aborts the previous task, so
//! at most one task per key can still deliver a result. `debounce` is the
//! same thing with a sleep in front, which makes "restart the timer on every
//! keystroke" fall out of the replacement rule.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(&'static str);

impl TaskKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self(s)
    }
}

struct Finished<A> {
    key: TaskKey,
    id: u64,
    output: A,
}

struct Running {
    id: u64,
    handle: AbortHandle,
}

/// A task stays registered until its output has been received, so
/// [`TaskManager::is_idle`] never misses a result sitting in the channel.
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, Running>,
    next_id: u64,
    tx: mpsc::UnboundedSender<Finished<A>>,
    rx: mpsc::UnboundedReceiver<Finished<A>>,
}

impl<A> Default for TaskManager<A>
where
    A: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TaskManager<A>
where
    A: Send + 'static,
{
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tasks: HashMap::new(),
            next_id: 0,
            tx,
            rx,
        }
    }

    /// Run `future` now, replacing any task under `key`.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.start(key.into(), None, future);
    }

    /// Run `future` after `delay` of quiet, replacing any task under `key`.
    pub fn debounce<F>(&mut self, key: impl Into<TaskKey>, delay: Duration, future: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.start(key.into(), Some(delay), future);
    }

    fn start<F>(&mut self, key: TaskKey, delay: Option<Duration>, future: F)
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.cancel(&key);

        self.next_id += 1;
        let id = self.next_id;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let output = future.await;
            // Receiver gone means the manager was dropped.
            let _ = tx.send(Finished { key, id, output });
        });

        tracing::trace!(task = key.name(), id, ?delay, "task started");
        self.tasks.insert(
            key,
            Running {
                id,
                handle: handle.abort_handle(),
            },
        );
    }

    /// Next task output. Outputs of tasks cancelled after they finished are
    /// still delivered; callers must treat them as possibly stale.
    pub async fn recv(&mut self) -> Option<A> {
        let finished = self.rx.recv().await?;
        if self
            .tasks
            .get(&finished.key)
            .is_some_and(|running| running.id == finished.id)
        {
            self.tasks.remove(&finished.key);
        }
        Some(finished.output)
    }

    /// No-op when nothing runs under `key`.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(running) = self.tasks.remove(key) {
            tracing::trace!(task = key.name(), id = running.id, "task aborted");
            running.handle.abort();
        }
    }

    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks.contains_key(key)
    }

    /// Tasks whose output has not been received yet.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Nothing running and nothing waiting to be received.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty() && self.rx.is_empty()
    }
}

impl<A> TaskManager<A> {
    pub fn cancel_all(&mut self) {
        for (_, running) in self.tasks.drain() {
            running.handle.abort();
        }
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
