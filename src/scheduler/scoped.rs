//! # ScopedTaskScheduler: work keyed to lifecycle windows.
//!
//! ```text
//!            schedule(window, task)
//!                     │
//!         in window ? ├─ yes ─► start ─► running[window] ──(window left)──► cancel
//!                     └─ no ──► waiting[window] ──(window entered)──► start
//!
//! launch(task) ─► start ─► scope-wide (cancelled only by shutdown)
//! shutdown()   ─► cancel root token, discard every waiting task
//! ```
//!
//! Every job gets a child of the scheduler's root token, so `shutdown` reaches
//! every running task with one `cancel`.

use std::mem;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle as TokioJoinHandle;
use tokio_util::sync::CancellationToken;

use crate::contract::Feature;
use crate::lifecycle::{LifecycleStage, Window};
use crate::observers::{ObserverSet, RecordKind};
use crate::tasks::TaskRef;

use super::handle::JobHandle;
use super::runner::{Outcome, run_scoped};

/// A task that has not started yet.
struct PendingJob {
    task: TaskRef,
    name: Arc<str>,
    token: CancellationToken,
    done: oneshot::Sender<Outcome>,
}

/// A task spawned on the runtime.
struct RunningJob {
    token: CancellationToken,
    join: TokioJoinHandle<()>,
}

impl RunningJob {
    fn is_live(&self) -> bool {
        !self.join.is_finished()
    }
}

/// Starts, queues and cancels scoped tasks at window boundaries.
pub struct ScopedTaskScheduler<F: Feature> {
    root: CancellationToken,
    waiting: [Vec<PendingJob>; 3],
    running: [Vec<RunningJob>; 3],
    scope_wide: Vec<RunningJob>,
    observers: Arc<ObserverSet<F>>,
    runtime: Handle,
}

impl<F: Feature> ScopedTaskScheduler<F> {
    pub fn new(observers: Arc<ObserverSet<F>>, runtime: Handle) -> Self {
        Self {
            root: CancellationToken::new(),
            waiting: Default::default(),
            running: Default::default(),
            scope_wide: Vec::new(),
            observers,
            runtime,
        }
    }

    /// Runs `task` while the lifecycle is inside `window`.
    ///
    /// Starts right away if `stage` is inside `window`, otherwise waits for
    /// the next entry. After [`shutdown`](Self::shutdown) the task is
    /// discarded immediately.
    pub fn schedule(&mut self, window: Window, task: TaskRef, stage: LifecycleStage) -> JobHandle {
        let (job, handle) = self.prepare(task);
        if self.is_shut_down() {
            self.discard(job);
        } else if stage.is_in(window) {
            let running = self.start(Some(window), job);
            let slot = &mut self.running[window.index()];
            slot.retain(RunningJob::is_live);
            slot.push(running);
        } else {
            self.observers.emit(|| RecordKind::TaskWaiting {
                task: job.name.clone(),
                window,
            });
            self.waiting[window.index()].push(job);
        }
        handle
    }

    /// Runs `task` now, bound to no window.
    pub fn launch(&mut self, task: TaskRef) -> JobHandle {
        let (job, handle) = self.prepare(task);
        if self.is_shut_down() {
            self.discard(job);
        } else {
            let running = self.start(None, job);
            self.scope_wide.retain(RunningJob::is_live);
            self.scope_wide.push(running);
        }
        handle
    }

    /// Cancels the windows left and starts the windows entered by `prev -> next`.
    ///
    /// Inner windows are torn down before outer ones; outer windows start first.
    pub fn on_stage_changed(&mut self, prev: LifecycleStage, next: LifecycleStage) {
        for window in Window::ALL.into_iter().rev() {
            if window.is_left(prev, next) {
                let jobs = mem::take(&mut self.running[window.index()]);
                tracing::debug!(%window, jobs = jobs.len(), "cancelling scoped tasks");
                for job in jobs {
                    job.token.cancel();
                }
            }
        }

        for window in Window::ALL {
            if window.is_entered(prev, next) {
                let jobs = mem::take(&mut self.waiting[window.index()]);
                for job in jobs {
                    if job.token.is_cancelled() {
                        self.discard(job);
                        continue;
                    }
                    let running = self.start(Some(window), job);
                    self.running[window.index()].push(running);
                }
            }
        }
    }

    /// Cancels every running task and discards every waiting one.
    pub fn shutdown(&mut self) {
        self.root.cancel();
        for slot in &mut self.running {
            slot.clear();
        }
        self.scope_wide.clear();

        let waiting: Vec<PendingJob> = self.waiting.iter_mut().flat_map(mem::take).collect();
        for job in waiting {
            self.discard(job);
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Number of tasks waiting for `window`.
    #[cfg(test)]
    pub fn waiting(&self, window: Window) -> usize {
        self.waiting[window.index()].len()
    }

    /// Number of live tasks registered for cancellation when `window` is left.
    #[cfg(test)]
    pub fn running(&self, window: Window) -> usize {
        self.running[window.index()]
            .iter()
            .filter(|job| job.is_live())
            .count()
    }

    fn prepare(&self, task: TaskRef) -> (PendingJob, JobHandle) {
        let name: Arc<str> = Arc::from(task.name());
        let token = self.root.child_token();
        let (done, rx) = oneshot::channel();
        let handle = JobHandle::new(name.clone(), token.clone(), rx);
        (
            PendingJob {
                task,
                name,
                token,
                done,
            },
            handle,
        )
    }

    fn start(&self, window: Option<Window>, job: PendingJob) -> RunningJob {
        self.observers.emit(|| RecordKind::TaskStarted {
            task: job.name.clone(),
            window,
        });
        let token = job.token.clone();
        let join = self.runtime.spawn(run_scoped(
            job.task,
            job.name,
            job.token,
            Arc::clone(&self.observers),
            job.done,
        ));
        RunningJob { token, join }
    }

    fn discard(&self, job: PendingJob) {
        tracing::debug!(task = &*job.name, "scoped task discarded before start");
        self.observers
            .emit(|| RecordKind::TaskDiscarded { task: job.name.clone() });
        // Dropping `done` resolves the handle to `Canceled`.
        drop(job);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Notify;
    use tokio::time::timeout;

    use super::*;
    use crate::error::TaskError;
    use crate::tasks::TaskFn;
    use crate::testing::Counter;
    use LifecycleStage::*;

    const WAIT: Duration = Duration::from_secs(2);

    fn scheduler() -> ScopedTaskScheduler<Counter> {
        let observers = Arc::new(ObserverSet::new(Arc::from("t"), Vec::new(), &Handle::current()));
        ScopedTaskScheduler::new(observers, Handle::current())
    }

    fn until_cancelled(name: &'static str) -> TaskRef {
        TaskFn::boxed(name, |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err(TaskError::Canceled)
        })
    }

    fn drive(s: &mut ScopedTaskScheduler<Counter>, stages: &[LifecycleStage]) {
        for pair in stages.windows(2) {
            s.on_stage_changed(pair[0], pair[1]);
        }
    }

    #[tokio::test]
    async fn task_inside_window_starts_now_and_stops_on_leave() {
        let mut s = scheduler();
        let mut job = s.schedule(Window::Resumed, until_cancelled("poll"), Resumed);
        assert_eq!(s.running(Window::Resumed), 1);
        assert_eq!(job.try_result(), None);

        s.on_stage_changed(Resumed, Paused);
        assert_eq!(timeout(WAIT, job.join()).await, Ok(Err(TaskError::Canceled)));
    }

    #[tokio::test]
    async fn resumed_task_survives_until_paused() {
        let mut s = scheduler();
        let started = Arc::new(Notify::new());
        let signal = started.clone();
        let job = s.schedule(
            Window::Resumed,
            TaskFn::boxed("ticker", move |ctx: CancellationToken| async move {
                signal.notify_one();
                ctx.cancelled().await;
                Err(TaskError::Canceled)
            }),
            Started,
        );
        assert_eq!(s.waiting(Window::Resumed), 1);

        s.on_stage_changed(Started, Resumed);
        timeout(WAIT, started.notified()).await.expect("task started");
        assert!(!job.is_cancelled());

        s.on_stage_changed(Resumed, Paused);
        assert!(job.is_cancelled());
        assert_eq!(timeout(WAIT, job.join()).await, Ok(Err(TaskError::Canceled)));
    }

    #[tokio::test]
    async fn waiting_tasks_start_on_each_entry_once() {
        let mut s = scheduler();
        let job = s.schedule(
            Window::Started,
            TaskFn::boxed("once", |_ctx: CancellationToken| async { Ok::<_, TaskError>(()) }),
            Attached,
        );
        drive(&mut s, &[Attached, Created, Started]);
        assert_eq!(s.waiting(Window::Started), 0);
        assert_eq!(timeout(WAIT, job.join()).await, Ok(Ok(())));
    }

    #[tokio::test]
    async fn leaving_outer_window_cancels_inner_ones() {
        let mut s = scheduler();
        let created = s.schedule(Window::Created, until_cancelled("c"), Created);
        let resumed = s.schedule(Window::Resumed, until_cancelled("r"), Created);
        drive(&mut s, &[Created, Started, Resumed]);

        // Host skipped straight to Destroyed.
        s.on_stage_changed(Resumed, Destroyed);
        assert!(created.is_cancelled());
        assert!(resumed.is_cancelled());
    }

    #[tokio::test]
    async fn shutdown_discards_waiting_and_later_tasks() {
        let mut s = scheduler();
        let waiting = s.schedule(Window::Resumed, until_cancelled("w"), Created);
        let scoped = s.launch(until_cancelled("bg"));

        s.shutdown();
        assert_eq!(timeout(WAIT, waiting.join()).await, Ok(Err(TaskError::Canceled)));
        assert_eq!(timeout(WAIT, scoped.join()).await, Ok(Err(TaskError::Canceled)));

        let late = s.schedule(Window::Created, until_cancelled("late"), Created);
        assert_eq!(timeout(WAIT, late.join()).await, Ok(Err(TaskError::Canceled)));
    }

    #[tokio::test]
    async fn cancelled_waiting_task_never_runs() {
        let mut s = scheduler();
        let job = s.schedule(
            Window::Started,
            TaskFn::boxed("never", |_ctx: CancellationToken| async {
                Err(TaskError::fail("must not run"))
            }),
            Created,
        );
        job.cancel();
        s.on_stage_changed(Created, Started);
        assert_eq!(timeout(WAIT, job.join()).await, Ok(Err(TaskError::Canceled)));
    }

    #[tokio::test]
    async fn failures_and_panics_surface_on_join() {
        let mut s = scheduler();
        let failing = s.launch(TaskFn::boxed("io", |_ctx: CancellationToken| async {
            Err(TaskError::fail("connection refused"))
        }));
        let panicking = s.launch(TaskFn::boxed("bug", |_ctx: CancellationToken| async {
            let broken = true;
            if broken {
                panic!("boom");
            }
            Ok::<_, TaskError>(())
        }));

        assert_eq!(
            timeout(WAIT, failing.join()).await,
            Ok(Err(TaskError::fail("connection refused")))
        );
        let res = timeout(WAIT, panicking.join()).await.expect("joined");
        assert!(matches!(res, Err(TaskError::Fail { error }) if error.contains("boom")));
    }
}
