/*!
Serial execution contexts.

A [`SerialContext<S>`] is the "actor via serial queue" pattern: one worker
thread exclusively owns a value of type `S`, and every job submitted to the
context gets `&mut S` in FIFO order. Nothing else ever touches `S`, so there
is no lock to get wrong and any two operations are ordered by when they were
enqueued, regardless of which threads issued them.

The worker runs until the last handle is dropped, drains whatever is still
queued, then exits.
*/

use crate::types::{StoreError, StoreResult};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

type Job<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Handle to a serial context. Clone is cheap (Arc bump).
pub struct SerialContext<S> {
  inner: Arc<Inner<S>>,
}

struct Inner<S> {
  label: String,
  jobs: Option<Sender<Job<S>>>,
  worker: Option<JoinHandle<()>>,
  worker_id: ThreadId,
}

impl<S> Clone for SerialContext<S> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<S> fmt::Debug for SerialContext<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SerialContext")
      .field("label", &self.inner.label)
      .finish_non_exhaustive()
  }
}

impl<S: Send + 'static> SerialContext<S> {
  /// Start a context that owns `state`. The worker thread is named `label`.
  pub fn new(label: impl Into<String>, state: S) -> StoreResult<Self> {
    let label = label.into();
    let (tx, rx) = mpsc::channel::<Job<S>>();

    let thread_label = label.clone();
    let worker = thread::Builder::new()
      .name(label.clone())
      .spawn(move || run(&thread_label, state, &rx))
      .map_err(|source| StoreError::Spawn {
        label: label.clone(),
        source,
      })?;

    Ok(Self {
      inner: Arc::new(Inner {
        worker_id: worker.thread().id(),
        label,
        jobs: Some(tx),
        worker: Some(worker),
      }),
    })
  }

  pub fn label(&self) -> &str {
    &self.inner.label
  }

  /// Is the calling thread this context's worker?
  pub fn is_current(&self) -> bool {
    thread::current().id() == self.inner.worker_id
  }

  /// Enqueue `job` and return immediately.
  pub fn exec(&self, job: impl FnOnce(&mut S) + Send + 'static) {
    let sent = self
      .inner
      .jobs
      .as_ref()
      .is_some_and(|jobs| jobs.send(Box::new(job)).is_ok());
    if !sent {
      log::error!(
        "Serial context '{}' is closed, dropping job",
        self.inner.label
      );
    }
  }

  /// Enqueue `job` and block until it has run, returning its result.
  ///
  /// Fails with [`StoreError::Reentrant`] when called from a job already
  /// running on this context (it would otherwise wait on itself forever), and
  /// with [`StoreError::JobPanicked`] if `job` panics.
  pub fn sync<R: Send + 'static>(
    &self,
    job: impl FnOnce(&mut S) -> R + Send + 'static,
  ) -> StoreResult<R> {
    if self.is_current() {
      return Err(StoreError::Reentrant(self.inner.label.clone()));
    }

    let (tx, rx) = mpsc::sync_channel(1);
    self.exec(move |state| {
      let result = panic::catch_unwind(AssertUnwindSafe(|| job(state)))
        .map_err(|payload| panic_message(payload.as_ref()).to_owned());
      drop(tx.send(result));
    });

    let label = &self.inner.label;
    match rx.recv() {
      Ok(Ok(value)) => Ok(value),
      Ok(Err(message)) => {
        log::error!("Job on serial context '{label}' panicked: {message}");
        Err(StoreError::JobPanicked {
          label: label.clone(),
          message,
        })
      }
      Err(_) => Err(StoreError::ContextClosed(label.clone())),
    }
  }

  /// Block until everything enqueued before this call has run.
  pub fn barrier(&self) -> StoreResult<()> {
    self.sync(|_| ())
  }
}

impl<S> Drop for Inner<S> {
  fn drop(&mut self) {
    // Closing the channel lets the worker drain and exit.
    drop(self.jobs.take());

    let Some(worker) = self.worker.take() else {
      return;
    };
    if thread::current().id() == self.worker_id {
      // Last handle released by one of our own jobs; the loop exits on its own.
      return;
    }
    if worker.join().is_err() {
      log::error!("Serial context '{}' worker panicked", self.label);
    }
  }
}

fn run<S>(label: &str, mut state: S, jobs: &Receiver<Job<S>>) {
  log::debug!("Serial context '{label}' started");

  for job in jobs {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| job(&mut state))) {
      log::error!(
        "Job on serial context '{label}' panicked: {}",
        panic_message(payload.as_ref())
      );
    }
  }

  log::debug!("Serial context '{label}' stopped");
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "<non-string panic payload>"
  }
}
