//! Locality placement.
//!
//! Every primitive instance is pinned to a [`Locality`] when it is created.
//! A locality without a transport runs evaluations inline, in the caller's
//! task. Otherwise the evaluation is handed to the [`Transport`], which runs
//! it on the target locality and returns a future for the result.
//!
//! [`LocalityPool`] is the in-process transport: one multi-threaded tokio
//! runtime per locality, with worker threads named after the locality.

use crate::execution::error::{PrimitiveError, Site};
use crate::execution::id::LocalityId;
use crate::execution::primitive::EvalFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};

/// Remote-invocation capability: run a job on a locality, get its result back.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Run `job` on `locality`. The returned future resolves exactly once.
    fn dispatch(&self, locality: LocalityId, site: Arc<Site>, job: EvalFuture) -> EvalFuture;

    /// Number of localities reachable through this transport.
    fn locality_count(&self) -> usize;
}

/// Placement token carried by each primitive instance.
#[derive(Clone)]
pub struct Locality {
    id: LocalityId,
    transport: Option<Arc<dyn Transport>>,
}

impl Locality {
    /// The calling process; evaluation happens inline.
    pub fn here() -> Self {
        Self {
            id: LocalityId::HERE,
            transport: None,
        }
    }

    /// A locality reached through `transport`.
    pub fn remote(id: LocalityId, transport: Arc<dyn Transport>) -> Self {
        Self {
            id,
            transport: Some(transport),
        }
    }

    pub fn id(&self) -> LocalityId {
        self.id
    }

    pub fn is_inline(&self) -> bool {
        self.transport.is_none()
    }

    /// Run an evaluation job on this locality.
    pub(crate) fn run(&self, site: &Arc<Site>, job: EvalFuture) -> EvalFuture {
        match &self.transport {
            None => job,
            Some(transport) => transport.dispatch(self.id, Arc::clone(site), job),
        }
    }
}

impl Default for Locality {
    fn default() -> Self {
        Self::here()
    }
}

impl fmt::Debug for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locality")
            .field("id", &self.id)
            .field("inline", &self.is_inline())
            .finish()
    }
}

/// In-process localities, one tokio runtime each.
pub struct LocalityPool {
    runtimes: Vec<Runtime>,
    handles: Vec<Handle>,
}

impl LocalityPool {
    /// Start `localities` runtimes with `worker_threads` workers each.
    pub fn new(
        localities: usize,
        worker_threads: usize,
        thread_name_prefix: &str,
    ) -> std::io::Result<Arc<Self>> {
        let mut runtimes = Vec::with_capacity(localities);
        for index in 0..localities {
            let runtime = Builder::new_multi_thread()
                .worker_threads(worker_threads.max(1))
                .thread_name(format!("{}-{}", thread_name_prefix, index))
                .enable_time()
                .build()?;
            runtimes.push(runtime);
        }
        let handles = runtimes.iter().map(|rt| rt.handle().clone()).collect();

        tracing::info!(
            "Locality pool started: {} localities x {} worker threads",
            localities,
            worker_threads.max(1)
        );

        Ok(Arc::new(Self { runtimes, handles }))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handle(&self, id: LocalityId) -> Option<&Handle> {
        self.handles.get(id.index())
    }

    /// Placement token for locality `id`, if the pool hosts it.
    pub fn locality(self: &Arc<Self>, id: LocalityId) -> Option<Locality> {
        if id.index() >= self.len() {
            return None;
        }
        let transport: Arc<dyn Transport> = Arc::clone(self) as Arc<dyn Transport>;
        Some(Locality::remote(id, transport))
    }

    /// All localities hosted by the pool, in id order.
    pub fn localities(self: &Arc<Self>) -> Vec<Locality> {
        (0..self.len() as u32)
            .filter_map(|i| self.locality(LocalityId(i)))
            .collect()
    }

    /// Drive `future` to completion on locality `id` from a synchronous caller.
    ///
    /// Returns `None` when the pool does not host `id`. Must not be called
    /// from inside an async context.
    pub fn block_on<F: Future>(&self, id: LocalityId, future: F) -> Option<F::Output> {
        self.handle(id).map(|handle| handle.block_on(future))
    }
}

impl Transport for LocalityPool {
    fn dispatch(&self, locality: LocalityId, site: Arc<Site>, job: EvalFuture) -> EvalFuture {
        let Some(handle) = self.handle(locality) else {
            let err = PrimitiveError::placement(
                &site,
                format!("{} is not hosted by this pool ({} localities)", locality, self.len()),
            );
            return futures::future::ready(Err(err)).boxed();
        };

        let task = handle.spawn(job);
        async move {
            match task.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("Evaluation of {} on {} failed: {}", site, locality, e);
                    Err(PrimitiveError::placement(
                        &site,
                        format!("evaluation on {} did not complete: {}", locality, e),
                    ))
                }
            }
        }
        .boxed()
    }

    fn locality_count(&self) -> usize {
        self.len()
    }
}

impl Drop for LocalityPool {
    fn drop(&mut self) {
        self.handles.clear();
        for runtime in self.runtimes.drain(..) {
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for LocalityPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalityPool")
            .field("localities", &self.len())
            .finish()
    }
}
