#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub memory_usage_mb: u64,
    pub peak_memory_mb: u64,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
}

/// Per-phase timing and memory reporting for a batch run.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Option<System>,
    pid: Option<Pid>,
    start_time: Instant,
    phase_start: Instant,
    peak_memory: u64,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        if !enabled {
            return Self {
                system: None,
                pid: None,
                start_time: now,
                phase_start: now,
                peak_memory: 0,
            };
        }

        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();

        // 取不到 PID 時只記錄時間
        let pid = sysinfo::get_current_pid().ok();

        Self {
            system: Some(system),
            pid,
            start_time: now,
            phase_start: now,
            peak_memory: 0,
        }
    }

    /// Closes the current phase and starts timing the next one.
    pub fn finish_phase(&mut self, phase: &str) -> Option<PhaseStats> {
        let system = self.system.as_mut()?;
        system.refresh_all();

        let memory_mb = self
            .pid
            .and_then(|pid| system.process(pid))
            .map(|process| process.memory() / 1024 / 1024)
            .unwrap_or(0);
        self.peak_memory = self.peak_memory.max(memory_mb);

        let stats = PhaseStats {
            phase: phase.to_string(),
            memory_usage_mb: memory_mb,
            peak_memory_mb: self.peak_memory,
            phase_time: self.phase_start.elapsed(),
            elapsed_time: self.start_time.elapsed(),
        };
        self.phase_start = Instant::now();

        tracing::info!(
            "📊 {} - Memory: {}MB, Peak: {}MB, Phase: {:?}, Total: {:?}",
            stats.phase,
            stats.memory_usage_mb,
            stats.peak_memory_mb,
            stats.phase_time,
            stats.elapsed_time
        );
        Some(stats)
    }

    pub fn is_enabled(&self) -> bool {
        self.system.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn finish_phase(&mut self, _phase: &str) -> Option<()> {
        None
    }

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let mut monitor = SystemMonitor::new(false);
        assert!(!monitor.is_enabled());
        assert!(monitor.finish_phase("extract").is_none());
    }

    #[test]
    fn test_enabled_monitor_tracks_peak() {
        let mut monitor = SystemMonitor::new(true);
        let first = monitor.finish_phase("extract").unwrap();
        let second = monitor.finish_phase("transform").unwrap();
        assert_eq!(second.phase, "transform");
        assert!(second.peak_memory_mb >= first.memory_usage_mb);
        assert!(second.elapsed_time >= first.elapsed_time);
    }
}
