// Lazily created single-threaded async context
//
// Backend calls run on a current-thread tokio runtime that is built on first
// use and reused for every later statement. A user interrupt while a call is
// pending abandons that runtime (it may be stuck mid-poll) and the next call
// builds a fresh one.
//
// The Ctrl-C listener is a process-wide SIGINT handler that stays installed
// once registered. It is only used when stdin is a terminal: there the editor
// reads Ctrl-C as a key, while with piped stdin SIGINT must keep its default
// effect of ending the process.

use futures::future::BoxFuture;
use std::future::Future;
use std::io::{self, IsTerminal};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

use crate::errors::ConsoleError;

/// Source of user interrupts raced against every pending backend call.
pub trait InterruptSignal: Send + Sync {
    /// Future that resolves when the user interrupts. Polled on the async
    /// context, so it may use tokio facilities.
    fn interrupted(&self) -> BoxFuture<'static, ()>;
}

/// Interrupts delivered by Ctrl-C (SIGINT).
pub struct CtrlC;

impl InterruptSignal for CtrlC {
    fn interrupted(&self) -> BoxFuture<'static, ()> {
        Box::pin(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                futures::future::pending::<()>().await;
            }
        })
    }
}

/// Never interrupts. Pending calls run to completion or to their timeout.
pub struct NoInterrupt;

impl InterruptSignal for NoInterrupt {
    fn interrupted(&self) -> BoxFuture<'static, ()> {
        Box::pin(futures::future::pending())
    }
}

/// Interrupt source for this process: Ctrl-C for an interactive stdin.
pub fn stdin_interrupt() -> Box<dyn InterruptSignal> {
    interrupt_for(io::stdin().is_terminal())
}

fn interrupt_for(interactive: bool) -> Box<dyn InterruptSignal> {
    if interactive {
        Box::new(CtrlC)
    } else {
        debug!("stdin is not a terminal, Ctrl-C keeps its default action");
        Box::new(NoInterrupt)
    }
}

pub struct LazyRuntime {
    runtime: Option<Runtime>,
    generation: u64,
    interrupt: Box<dyn InterruptSignal>,
}

impl LazyRuntime {
    pub fn new(interrupt: Box<dyn InterruptSignal>) -> Self {
        Self {
            runtime: None,
            generation: 0,
            interrupt,
        }
    }

    /// Whether a runtime is currently alive.
    pub fn is_started(&self) -> bool {
        self.runtime.is_some()
    }

    /// Bumped every time a runtime is discarded after an interrupt. Anything
    /// bound to an older generation (sockets, pools) is unusable.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drive `future` to completion, or until the user interrupts.
    pub fn run<F: Future>(&mut self, future: F) -> Result<F::Output, ConsoleError> {
        let runtime = match self.runtime.take() {
            Some(runtime) => runtime,
            None => {
                let runtime = Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(ConsoleError::Runtime)?;
                debug!(generation = self.generation, "Async context created");
                runtime
            }
        };

        let interrupted = self.interrupt.interrupted();
        let outcome = runtime.block_on(async move {
            tokio::select! {
                biased;
                output = future => Some(output),
                _ = interrupted => None,
            }
        });

        match outcome {
            Some(output) => {
                self.runtime = Some(runtime);
                Ok(output)
            }
            None => {
                runtime.shutdown_background();
                self.generation += 1;
                debug!(generation = self.generation, "Async context discarded after interrupt");
                Err(ConsoleError::ExecutionInterrupted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    struct Immediately;

    impl InterruptSignal for Immediately {
        fn interrupted(&self) -> BoxFuture<'static, ()> {
            Box::pin(async {})
        }
    }

    #[test]
    fn test_runtime_is_created_lazily_and_reused() {
        let mut rt = LazyRuntime::new(Box::new(NoInterrupt));
        assert!(!rt.is_started());

        assert_eq!(rt.run(async { 1 + 1 }).unwrap(), 2);
        assert!(rt.is_started());

        let value = rt
            .run(async {
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                "done"
            })
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(rt.generation(), 0);
    }

    #[test]
    fn test_interrupt_discards_runtime() {
        let mut rt = LazyRuntime::new(Box::new(Immediately));

        let result = rt.run(futures::future::pending::<()>());
        assert!(matches!(result, Err(ConsoleError::ExecutionInterrupted)));
        assert!(!rt.is_started());
        assert_eq!(rt.generation(), 1);

        // A ready future still wins the race and rebuilds the context.
        assert_eq!(rt.run(async { 7 }).unwrap(), 7);
        assert!(rt.is_started());
        assert_eq!(rt.generation(), 1);
    }

    #[test]
    fn test_piped_stdin_never_interrupts() {
        assert!(interrupt_for(false).interrupted().now_or_never().is_none());

        let mut rt = LazyRuntime::new(interrupt_for(false));
        let value = rt
            .run(async {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                "finished"
            })
            .unwrap();
        assert_eq!(value, "finished");
        assert_eq!(rt.generation(), 0);
    }
}
