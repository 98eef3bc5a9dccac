/*!
Delivery contexts for observer callbacks.

The broadcaster never runs observer code on its own registry context (unless
asked to with [`Delivery::Inline`]); each notification is handed to a
[`Delivery`] as a boxed task.

Ordering: `Main`, `Serial` and `Inline` run tasks one at a time in the order
they were dispatched, so a single observer sees the updates of a key in
broadcast order. `Pool` runs tasks in parallel and makes no such promise.
*/

use super::serial::{panic_message, SerialContext};
use crate::types::StoreResult;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A unit of observer work.
pub(crate) type Task = Box<dyn FnOnce() + Send>;

const MAIN_LABEL: &str = "telestore.main";

/// Process-wide default delivery context (the "main" context analog).
static MAIN: OnceLock<Option<SerialContext<()>>> = OnceLock::new();

fn main_context() -> Option<&'static SerialContext<()>> {
  MAIN
    .get_or_init(|| match SerialContext::new(MAIN_LABEL, ()) {
      Ok(ctx) => Some(ctx),
      Err(e) => {
        log::error!("Main delivery context unavailable, delivering inline: {e}");
        None
      }
    })
    .as_ref()
}

/// Where observer callbacks run.
#[derive(Clone, Default)]
pub enum Delivery {
  /// Shared process-wide serial context. Default.
  #[default]
  Main,
  /// A caller-provided serial context.
  Serial(SerialContext<()>),
  /// Directly on the broadcaster's registry context. Callbacks must be quick
  /// and must not block on the store.
  Inline,
  /// A rayon thread pool. Callbacks for one observer may run concurrently and
  /// out of order.
  Pool(Arc<DeliveryPool>),
}

impl fmt::Debug for Delivery {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Main => f.write_str("Main"),
      Self::Serial(ctx) => f.debug_tuple("Serial").field(&ctx.label()).finish(),
      Self::Inline => f.write_str("Inline"),
      Self::Pool(pool) => f
        .debug_tuple("Pool")
        .field(&pool.pool.current_num_threads())
        .finish(),
    }
  }
}

impl Delivery {
  /// A dedicated serial delivery context named `label`.
  pub fn serial(label: impl Into<String>) -> StoreResult<Self> {
    Ok(Self::Serial(SerialContext::new(label, ())?))
  }

  /// A parallel delivery pool with `threads` workers.
  pub fn pool(threads: usize) -> StoreResult<Self> {
    let pool = rayon::ThreadPoolBuilder::new()
      .num_threads(threads)
      .thread_name(|i| format!("telestore-delivery-{i}"))
      .panic_handler(|payload| {
        log::error!(
          "Observer callback panicked: {}",
          panic_message(payload.as_ref())
        );
      })
      .build()?;

    Ok(Self::Pool(Arc::new(DeliveryPool {
      pool,
      in_flight: Mutex::new(0),
      idle: Condvar::new(),
    })))
  }

  /// Does this context preserve dispatch order?
  pub const fn is_ordered(&self) -> bool {
    !matches!(self, Self::Pool(_))
  }

  pub(crate) fn dispatch(&self, task: Task) {
    match self {
      Self::Main => match main_context() {
        Some(ctx) => ctx.exec(move |_| task()),
        None => task(),
      },
      Self::Serial(ctx) => ctx.exec(move |_| task()),
      Self::Inline => task(),
      Self::Pool(pool) => DeliveryPool::spawn(pool, task),
    }
  }

  /// Block until every task dispatched before this call has run.
  pub fn flush(&self) -> StoreResult<()> {
    match self {
      Self::Main => main_context().map_or(Ok(()), SerialContext::barrier),
      Self::Serial(ctx) => ctx.barrier(),
      Self::Inline => Ok(()),
      Self::Pool(pool) => {
        pool.wait_idle();
        Ok(())
      }
    }
  }
}

/// Thread pool plus an in-flight counter so [`Delivery::flush`] can wait.
pub struct DeliveryPool {
  pool: rayon::ThreadPool,
  in_flight: Mutex<usize>,
  idle: Condvar,
}

impl fmt::Debug for DeliveryPool {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DeliveryPool")
      .field("threads", &self.pool.current_num_threads())
      .finish_non_exhaustive()
  }
}

impl DeliveryPool {
  fn spawn(this: &Arc<Self>, task: Task) {
    *this.in_flight.lock() += 1;

    let pool = Arc::clone(this);
    this.pool.spawn(move || {
      // Decrement even if the task panics.
      let _done = InFlightGuard(&pool);
      task();
    });
  }

  fn wait_idle(&self) {
    let mut in_flight = self.in_flight.lock();
    while *in_flight > 0 {
      self.idle.wait(&mut in_flight);
    }
  }
}

struct InFlightGuard<'a>(&'a DeliveryPool);

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    let mut in_flight = self.0.in_flight.lock();
    *in_flight = in_flight.saturating_sub(1);
    if *in_flight == 0 {
      self.0.idle.notify_all();
    }
  }
}
