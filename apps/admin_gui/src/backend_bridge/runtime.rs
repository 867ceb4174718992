//! Tokio runtime that executes gateway calls off the UI thread.

use std::future::Future;

use tokio::runtime::{Builder, Runtime};

pub struct BackendRuntime {
    runtime: Runtime,
}

impl BackendRuntime {
    pub fn start() -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("ereport-backend")
            .enable_all()
            .build()?;
        tracing::info!("backend runtime started");
        Ok(Self { runtime })
    }

    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.runtime.spawn(future);
    }
}
