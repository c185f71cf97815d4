//! Test primitives that record how and where they were evaluated

use arrayflow::execution::dataflow::value_operand;
use arrayflow::execution::{Args, EvalFuture, PrimitiveBase, PrimitivePlugin};
use arrayflow::{Locality, PrimitiveHandle, Value};
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn plugin(
    locality: Locality,
    operands: Vec<Value>,
    name: &str,
    p: impl PrimitivePlugin + 'static,
) -> PrimitiveHandle {
    let base = PrimitiveBase::new(operands, name, "fixture");
    PrimitiveHandle::new(locality, base, Box::new(p) as Box<dyn PrimitivePlugin>)
}

/// Counts its evaluations, then evaluates and returns its single operand
pub struct Tally {
    count: Arc<AtomicUsize>,
}

impl PrimitivePlugin for Tally {
    fn kind(&self) -> &str {
        "tally"
    }

    fn eval(&self, base: &PrimitiveBase, args: &Args) -> EvalFuture {
        let count = Arc::clone(&self.count);
        let inner = base.operands()[0].clone();
        let args = Arc::clone(args);
        async move {
            count.fetch_add(1, Ordering::SeqCst);
            value_operand(&inner, &args).await
        }
        .boxed()
    }
}

/// Wrap `inner` in a [`Tally`]; the counter is returned alongside
pub fn tally(inner: Value) -> (PrimitiveHandle, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = plugin(
        Locality::here(),
        vec![inner],
        "tally",
        Tally {
            count: Arc::clone(&count),
        },
    );
    (handle, count)
}

/// Sleeps, records its tag in the shared log, then returns its value
pub struct Delayed {
    delay: Duration,
    tag: usize,
    log: Arc<Mutex<Vec<usize>>>,
}

impl PrimitivePlugin for Delayed {
    fn kind(&self) -> &str {
        "delayed"
    }

    fn eval(&self, base: &PrimitiveBase, _args: &Args) -> EvalFuture {
        let delay = self.delay;
        let tag = self.tag;
        let log = Arc::clone(&self.log);
        let value = base.operands()[0].clone();
        async move {
            tokio::time::sleep(delay).await;
            log.lock().unwrap().push(tag);
            Ok(value)
        }
        .boxed()
    }
}

pub fn delayed(
    value: Value,
    delay_ms: u64,
    tag: usize,
    log: &Arc<Mutex<Vec<usize>>>,
) -> PrimitiveHandle {
    plugin(
        Locality::here(),
        vec![value],
        "delayed",
        Delayed {
            delay: Duration::from_millis(delay_ms),
            tag,
            log: Arc::clone(log),
        },
    )
}

/// Returns the name of the thread it was evaluated on
pub struct ThreadName;

impl PrimitivePlugin for ThreadName {
    fn kind(&self) -> &str {
        "thread_name"
    }

    fn eval(&self, _base: &PrimitiveBase, _args: &Args) -> EvalFuture {
        async move {
            let name = std::thread::current()
                .name()
                .unwrap_or("<unnamed>")
                .to_string();
            Ok(Value::Str(name))
        }
        .boxed()
    }
}

pub fn thread_name(locality: Locality) -> PrimitiveHandle {
    plugin(locality, vec![Value::Empty], "thread_name", ThreadName)
}

/// Panics when evaluated
pub struct Explode;

impl PrimitivePlugin for Explode {
    fn kind(&self) -> &str {
        "explode"
    }

    fn eval(&self, _base: &PrimitiveBase, _args: &Args) -> EvalFuture {
        async move { panic!("worker exploded") }.boxed()
    }
}

pub fn explode(locality: Locality) -> PrimitiveHandle {
    plugin(locality, vec![Value::Empty], "explode", Explode)
}
