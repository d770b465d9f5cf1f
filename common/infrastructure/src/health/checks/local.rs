use crate::health::Check;
use anyhow::Context;
use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::select;
use tokio::sync::oneshot;
use tokio::task::LocalSet;
use tokio::time::{MissedTickBehavior, interval};

/// A check which periodically evaluates a probe on a dedicated thread and reports the
/// latest outcome.
///
/// The probe stops when the check is dropped.
pub struct Local {
    error: Cow<'static, str>,
    state: Arc<AtomicBool>,
    _shutdown: Shutdown,
}

struct Shutdown(Option<oneshot::Sender<()>>);

impl Drop for Shutdown {
    fn drop(&mut self) {
        if let Some(shutdown) = self.0.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Local {
    pub fn spawn_periodic<F, Fut>(
        error: impl Into<Cow<'static, str>>,
        period: Duration,
        f: F,
    ) -> anyhow::Result<Local>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = bool>,
    {
        let state = Arc::new(AtomicBool::new(false));
        let (tx, mut rx) = oneshot::channel::<()>();

        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start dedicated check runtime")?;

        {
            let state = state.clone();
            std::thread::spawn(move || {
                let local = LocalSet::new();
                {
                    let state = state.clone();
                    local.spawn_local(async move {
                        let mut interval = interval(period);
                        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

                        loop {
                            select! {
                                _ = interval.tick() => {
                                    state.store(f().await, Ordering::Release);
                                }
                                _ = &mut rx => {
                                    log::info!("received shutdown signal");
                                    break;
                                }
                            }
                        }
                    });
                }

                rt.block_on(local);

                log::info!("check loop returned");

                // a check which no longer runs is down
                state.store(false, Ordering::Release);
            });
        }

        Ok(Local {
            error: error.into(),
            state,
            _shutdown: Shutdown(Some(tx)),
        })
    }
}

impl Check for Local {
    type Error = Cow<'static, str>;

    async fn run(&self) -> Result<(), Self::Error> {
        match self.state.as_ref().load(Ordering::Acquire) {
            true => Ok(()),
            false => Err(self.error.clone()),
        }
    }
}
