/// Bounded waits around suspension points
use crate::host::Timer;
use futures::future::{self, Either};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{stage} timed out after {ms}ms")]
pub struct Elapsed {
    pub stage: &'static str,
    pub ms: u32,
}

/// Races a future against the timer. Whichever completes first wins; the loser is dropped.
pub struct Deadline<'t, T: Timer> {
    timer: &'t T,
    ms: u32,
}

impl<'t, T: Timer> Deadline<'t, T> {
    pub fn new(timer: &'t T, ms: u32) -> Self {
        Deadline { timer, ms }
    }

    pub async fn run<F: Future>(&self, stage: &'static str, fut: F) -> Result<F::Output, Elapsed> {
        let sleep = self.timer.sleep(self.ms);
        futures::pin_mut!(fut, sleep);

        match future::select(fut, sleep).await {
            Either::Left((output, _)) => Ok(output),
            Either::Right(_) => {
                log::warn!("{} exceeded {}ms", stage, self.ms);
                Err(Elapsed { stage, ms: self.ms })
            }
        }
    }
}
