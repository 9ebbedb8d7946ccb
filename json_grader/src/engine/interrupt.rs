//! Graceful stop of running results.
//!
//! A result that is registered here can be told to stop from anywhere in the
//! process (a signal handler, a watchdog thread, a supervising harness). The
//! currently running test always completes; the engine simply does not start
//! the next one.

use crate::engine::result::TestResult;
use log::info;
use std::sync::{
    Arc, Mutex, OnceLock, Weak,
    atomic::{AtomicBool, Ordering},
};

/// Shared "please stop" flag of a result.
#[derive(Debug, Default, Clone)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Weak set of registered results. Dropping a result unregisters it.
#[derive(Debug, Default)]
pub struct InterruptRegistry {
    flags: Mutex<Vec<Weak<AtomicBool>>>,
}

impl InterruptRegistry {
    /// The registry shared by the whole process. Runners register here.
    pub fn global() -> &'static InterruptRegistry {
        static GLOBAL: OnceLock<InterruptRegistry> = OnceLock::new();
        GLOBAL.get_or_init(InterruptRegistry::default)
    }

    pub fn register(&self, result: &dyn TestResult) {
        let flag = Arc::downgrade(&result.state().stop_flag().0);
        let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        flags.retain(|f| f.strong_count() > 0);
        flags.push(flag);
    }

    /// Asks every live registered result to stop. Returns how many were reached.
    pub fn interrupt(&self) -> usize {
        let flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        let mut reached = 0;
        for flag in flags.iter().filter_map(Weak::upgrade) {
            flag.store(true, Ordering::SeqCst);
            reached += 1;
        }
        info!("🛑 Interrupt requested for {reached} running result(s)");
        reached
    }

    pub fn live_results(&self) -> usize {
        let flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        flags.iter().filter(|f| f.strong_count() > 0).count()
    }
}
