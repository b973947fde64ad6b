use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Runtime that timer tasks are spawned on: the caller's runtime if there is
/// one, else a lazily built process-wide runtime.
pub(crate) fn handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| {
        RUNTIME
            .get_or_init(|| {
                tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(1)
                    .thread_name("porsesh-progress-timers")
                    .enable_all()
                    .build()
                    .expect("failed to build the progress timer runtime")
            })
            .handle()
            .clone()
    })
}
