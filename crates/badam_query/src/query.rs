use crate::options::QueryOptions;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send>>;
type Producer<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub data: Option<T>,
    /// Set by the first successful attempt.
    pub has_settled: bool,
    /// True while at least one attempt is outstanding.
    pub loading: bool,
    /// Completion time of the last successful attempt.
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            has_settled: false,
            loading: false,
            last_updated: None,
        }
    }
}

struct Control {
    options: QueryOptions,
    ticker: Option<JoinHandle<()>>,
}

struct Inner<T> {
    producer: Producer<T>,
    state: watch::Sender<QueryState<T>>,
    control: Mutex<Control>,
    first_run: AtomicBool,
    disposed: AtomicBool,
    // Only touched inside `state.send_modify` so it stays in step with `loading`.
    in_flight: AtomicUsize,
    started: AtomicU64,
    applied: AtomicU64,
}

/// Handle to a running query. Dropping it disposes the query.
pub struct Query<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates the query and, if enabled, starts the first attempt and the
    /// polling timer. Must be called from within a tokio runtime.
    pub fn new<F, Fut, E>(producer: F, options: QueryOptions) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        let producer: Producer<T> = Box::new(move || {
            let attempt = producer();
            Box::pin(async move { attempt.await.map_err(Into::into) })
        });
        let enabled = options.enabled;
        let (state, _) = watch::channel(QueryState::default());

        let inner = Arc::new(Inner {
            producer,
            state,
            control: Mutex::new(Control {
                options,
                ticker: None,
            }),
            first_run: AtomicBool::new(true),
            disposed: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            started: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        });

        if enabled {
            inner.execute();
        }
        inner.restart_ticker();

        Self { inner }
    }

    pub fn state(&self) -> QueryState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn has_settled(&self) -> bool {
        self.inner.state.borrow().has_settled
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.state.borrow().last_updated
    }

    /// Change notifications for every state write.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.inner.state.subscribe()
    }

    /// Starts a new attempt unless the query is disabled or disposed.
    pub fn refetch(&self) {
        self.inner.execute();
    }

    pub fn set_data(&self, data: T) {
        self.inner.state.send_modify(|state| state.data = Some(data));
    }

    /// Replaces the data with `f(previous)`.
    pub fn update_data(&self, f: impl FnOnce(Option<T>) -> T) {
        self.inner.state.send_modify(|state| {
            let previous = state.data.take();
            state.data = Some(f(previous));
        });
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.control.lock().options.enabled
    }

    /// Re-enabling triggers an attempt and restarts polling. Disabling stops
    /// polling but lets an in-flight attempt finish.
    pub fn set_enabled(&self, enabled: bool) {
        {
            let mut control = self.inner.control.lock();
            if control.options.enabled == enabled {
                return;
            }
            control.options.enabled = enabled;
        }

        if enabled {
            self.inner.execute();
        }
        self.inner.restart_ticker();
    }

    pub fn set_refetch_interval(&self, period: Option<Duration>) {
        self.inner.control.lock().options.refetch_interval = period;
        self.inner.restart_ticker();
    }

    /// Stops polling and drops the result of any attempt still in flight.
    pub fn dispose(&self) {
        self.inner.shutdown();
    }
}

impl<T> Drop for Query<T> {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

impl<T> Inner<T> {
    fn shutdown(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        if let Some(ticker) = self.control.lock().ticker.take() {
            ticker.abort();
        }
    }
}

impl<T> Inner<T>
where
    T: Send + Sync + 'static,
{
    fn execute(self: &Arc<Self>) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        let keep_previous_data = {
            let control = self.control.lock();
            if !control.options.enabled {
                return;
            }
            control.options.keep_previous_data
        };

        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let reset = self.first_run.load(Ordering::SeqCst) || !keep_previous_data;

        self.state.send_modify(|state| {
            if reset {
                state.data = None;
                state.has_settled = false;
            }
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
        });
        debug!(generation, "query attempt started");

        let attempt = (self.producer)();
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = attempt.await;
            inner.complete(generation, result);
        });
    }

    fn complete(&self, generation: u64, result: Result<T, BoxError>) {
        if self.disposed.load(Ordering::SeqCst) {
            debug!(generation, "query disposed, dropping result");
            return;
        }
        self.first_run.store(false, Ordering::SeqCst);

        if let Err(err) = &result {
            error!(generation, error = %err, "query attempt failed");
        }

        self.state.send_modify(|state| {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            state.loading = self.in_flight.load(Ordering::SeqCst) > 0;

            let Ok(data) = result else {
                return;
            };
            // A newer attempt already landed.
            if self.applied.fetch_max(generation, Ordering::SeqCst) > generation {
                debug!(generation, "discarding stale query result");
                return;
            }
            state.data = Some(data);
            state.has_settled = true;
            state.last_updated = Some(Utc::now());
        });
    }

    fn restart_ticker(self: &Arc<Self>) {
        let mut control = self.control.lock();
        if let Some(ticker) = control.ticker.take() {
            ticker.abort();
        }
        if self.disposed.load(Ordering::SeqCst) || !control.options.enabled {
            return;
        }
        let Some(period) = control.options.polling_period() else {
            return;
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        control.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.execute();
            }
        }));
    }
}
