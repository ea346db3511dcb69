use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for response-clock timers. Timestamps are opaque to callers; the
/// trial controller only ever subtracts them through `elapsed`.
pub trait Timer: Clone + Send + Sync {
    type Timestamp: Copy + Clone + Send + Sync;
    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
    fn sleep(&self, d: Duration);
}

/// Round a duration to the nearest whole millisecond.
pub fn to_whole_millis(d: Duration) -> u64 {
    (d.as_nanos() as f64 / 1_000_000.0).round() as u64
}

/// Monotonic wall-clock timer with platform-specific sleep paths.
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    start: Instant,
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "windows")]
        self.windows_sleep(duration);
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(target_os = "macos")]
        self.macos_sleep(duration);
        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "windows")]
    fn windows_sleep(&self, duration: Duration) {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::Foundation::FILETIME;
        use windows::Win32::System::Threading::{
            CreateWaitableTimerW, SetWaitableTimer, WaitForSingleObject,
        };

        unsafe {
            let Ok(timer) = CreateWaitableTimerW(None, true, None) else {
                std::thread::sleep(duration);
                return;
            };

            let intervals = -(duration.as_nanos() as i64 / 100);
            let due_time = FILETIME {
                dwLowDateTime: intervals as u32,
                dwHighDateTime: (intervals >> 32) as u32,
            };

            if SetWaitableTimer(timer, &due_time, 0, None, None, false).is_ok() {
                WaitForSingleObject(timer, u32::MAX);
            }
            let _ = CloseHandle(timer);
        }
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }

    #[cfg(target_os = "macos")]
    fn macos_sleep(&self, duration: Duration) {
        use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};

        // Spin for sub-100us waits, the scheduler is too coarse there.
        if duration.as_nanos() < 100_000 {
            unsafe {
                let start = mach_absolute_time();
                let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
                mach_timebase_info(&mut timebase);

                let target_ticks =
                    duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;

                while mach_absolute_time() - start < target_ticks {
                    std::hint::spin_loop();
                }
            }
        } else {
            std::thread::sleep(duration);
        }
    }
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    fn sleep(&self, d: Duration) {
        self.high_precision_sleep(d)
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer that only moves when told to. Lets tests and the visual simulator
/// pin elapsed response times exactly.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_advances_only_on_demand() {
        let timer = ManualTimer::new();
        let t0 = timer.now();
        assert_eq!(timer.elapsed(t0), Duration::ZERO);

        timer.advance(Duration::from_millis(1234));
        assert_eq!(timer.elapsed(t0), Duration::from_millis(1234));
    }

    #[test]
    fn manual_timer_clones_share_the_clock() {
        let timer = ManualTimer::new();
        let clone = timer.clone();
        timer.advance(Duration::from_millis(10));
        assert_eq!(clone.now(), timer.now());
    }

    #[test]
    fn high_precision_timer_is_monotonic() {
        let timer = HighPrecisionTimer::new();
        let t0 = timer.now();
        let t1 = timer.now();
        assert!(t1 >= t0);
    }

    #[test]
    fn whole_millis_rounds_to_nearest() {
        assert_eq!(to_whole_millis(Duration::from_micros(1499)), 1);
        assert_eq!(to_whole_millis(Duration::from_micros(1500)), 2);
        assert_eq!(to_whole_millis(Duration::ZERO), 0);
    }
}
