//! Realtime worker thread spawning.
//!
//! Workers are ordinary named threads that request a fixed-priority
//! scheduling class for themselves after launch. When the platform or
//! privileges refuse, the request degrades to a logged best-effort hint
//! rather than failing the spawn.

use std::io;
use std::thread::{self, JoinHandle};

use log::{debug, warn};

/// Scheduling class for a worker thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedPolicy {
    /// Fixed-priority first-in first-out realtime scheduling.
    Fifo,
    /// Fixed-priority round-robin realtime scheduling.
    RoundRobin,
    /// Default time-sharing scheduling; priority is ignored.
    Normal,
}

/// Scheduling configuration applied to a spawned worker.
#[derive(Clone, Copy, Debug)]
pub struct ThreadConfig {
    pub priority: i32,
    pub policy: SchedPolicy,
}

impl ThreadConfig {
    pub const fn fifo(priority: i32) -> Self {
        Self {
            priority,
            policy: SchedPolicy::Fifo,
        }
    }
}

/// Spawn a named worker and apply `config` from inside it.
pub fn spawn<F, T>(name: &str, config: ThreadConfig, f: F) -> io::Result<JoinHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let thread_name = name.to_string();
    thread::Builder::new().name(thread_name.clone()).spawn(move || {
        match apply_to_current(&config) {
            Ok(()) => debug!(
                "{}: scheduling {:?} priority {}",
                thread_name, config.policy, config.priority
            ),
            Err(code) => warn!(
                "{}: realtime scheduling unavailable (error {}), running best-effort",
                thread_name, code
            ),
        }
        f()
    })
}

#[cfg(unix)]
fn apply_to_current(config: &ThreadConfig) -> Result<(), i32> {
    let policy = match config.policy {
        SchedPolicy::Fifo => libc::SCHED_FIFO,
        SchedPolicy::RoundRobin => libc::SCHED_RR,
        SchedPolicy::Normal => return Ok(()),
    };
    let param = libc::sched_param {
        sched_priority: config.priority,
    };
    let rc = unsafe { libc::pthread_setschedparam(libc::pthread_self(), policy, &param) };
    if rc == 0 {
        Ok(())
    } else {
        Err(rc)
    }
}

#[cfg(not(unix))]
fn apply_to_current(_config: &ThreadConfig) -> Result<(), i32> {
    // No realtime class to request; the priority stays a hint.
    Ok(())
}
