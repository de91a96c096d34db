//! Control loop daemon
//!
//! Single-threaded scheduler for a [`ControlEngine`]: sleeps for the
//! active schedule's interval, ticks while that schedule is still current
//! and runs the exit sequence when shutdown is requested.

use crate::device::{FanActuator, TemperatureSensor};
use crate::domain::SpeedLevel;
use crate::engine::{ControlEngine, ExitChoice, ExitOutcome, ExitPolicy, TickReport};
use crate::error::AppError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Configuration for the daemon
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// How to answer the exit prompt
    pub on_exit: ExitPolicy,
    /// Granularity of shutdown checks while waiting for the next tick
    pub poll_interval: Duration,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            on_exit: ExitPolicy::Ask,
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// Control loop around one engine
pub struct Daemon<S, A> {
    engine: ControlEngine<S, A>,
    config: DaemonConfig,
}

impl<S: TemperatureSensor, A: FanActuator> Daemon<S, A> {
    /// Wrap an engine that has already been given a profile
    pub fn new(engine: ControlEngine<S, A>, config: DaemonConfig) -> Self {
        Self { engine, config }
    }

    /// Run until shutdown is requested and confirmed, or the sensor fails
    ///
    /// `on_report` receives every tick report; `confirm` is asked for the
    /// exit choice when the policy is [`ExitPolicy::Ask`] and the fan is
    /// not on auto.
    pub fn run<R, C>(
        &mut self,
        shutdown: &AtomicBool,
        mut on_report: R,
        mut confirm: C,
    ) -> Result<(), AppError>
    where
        R: FnMut(&TickReport),
        C: FnMut(SpeedLevel) -> ExitChoice,
    {
        loop {
            if shutdown.swap(false, Ordering::SeqCst) {
                match self.exit_sequence(&mut confirm)? {
                    ExitOutcome::Terminate => return Ok(()),
                    ExitOutcome::Resumed => continue,
                }
            }

            let Some(handle) = self.engine.schedule() else {
                log::info!("No tick schedule installed, leaving control loop");
                return Ok(());
            };

            if !self.wait(handle.interval(), shutdown) {
                continue;
            }
            if !self.engine.is_current(&handle) {
                continue;
            }

            match self.engine.tick() {
                Ok(report) => on_report(&report),
                Err(e) => {
                    log::error!("Control tick failed: {}", e);
                    self.exit_sequence(&mut confirm)?;
                    return Err(e.into());
                }
            }
        }
    }

    /// Decide and apply the exit choice
    pub fn exit_sequence<C>(&mut self, confirm: &mut C) -> Result<ExitOutcome, AppError>
    where
        C: FnMut(SpeedLevel) -> ExitChoice,
    {
        let choice = match (self.config.on_exit, self.engine.pending_exit_speed()) {
            (_, None) => ExitChoice::RestoreAuto,
            (ExitPolicy::Restore, Some(_)) => ExitChoice::RestoreAuto,
            (ExitPolicy::Keep, Some(_)) => ExitChoice::Keep,
            (ExitPolicy::Ask, Some(speed)) => confirm(speed),
        };
        log::debug!("Exit choice: {:?}", choice);

        Ok(self.engine.exit(choice)?)
    }

    /// Sleep for `interval`; false if shutdown was requested meanwhile
    fn wait(&self, interval: Duration, shutdown: &AtomicBool) -> bool {
        let deadline = Instant::now() + interval;
        loop {
            if shutdown.load(Ordering::SeqCst) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(self.config.poll_interval.min(deadline - now));
        }
    }

    /// Get the engine
    pub fn engine(&self) -> &ControlEngine<S, A> {
        &self.engine
    }

    /// Get the daemon configuration
    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validate_manual, ScanInterval};
    use crate::mock::{RecordingFan, ScriptedSensor};

    fn manual_daemon(on_exit: ExitPolicy) -> Daemon<ScriptedSensor, RecordingFan> {
        let mut engine = ControlEngine::new(ScriptedSensor::new([50]), RecordingFan::new());
        engine
            .apply_manual(validate_manual(
                SpeedLevel::new(4).unwrap(),
                ScanInterval::from_secs(1).unwrap(),
            ))
            .unwrap();
        Daemon::new(
            engine,
            DaemonConfig {
                on_exit,
                poll_interval: Duration::from_millis(5),
            },
        )
    }

    #[test]
    fn test_daemon_config_default() {
        let config = DaemonConfig::default();
        assert_eq!(config.on_exit, ExitPolicy::Ask);
        assert_eq!(config.poll_interval, Duration::from_millis(200));
    }

    #[test]
    fn test_shutdown_with_restore_policy() {
        let mut daemon = manual_daemon(ExitPolicy::Restore);
        let shutdown = AtomicBool::new(true);

        daemon
            .run(&shutdown, |_| {}, |_| panic!("should not prompt"))
            .unwrap();
        assert_eq!(
            daemon.engine().actuator().writes(),
            &[SpeedLevel::new(4).unwrap(), SpeedLevel::AUTO]
        );
        assert!(!daemon.engine().is_running());
    }

    #[test]
    fn test_shutdown_with_keep_policy() {
        let mut daemon = manual_daemon(ExitPolicy::Keep);
        let shutdown = AtomicBool::new(true);

        daemon.run(&shutdown, |_| {}, |_| ExitChoice::RestoreAuto).unwrap();
        assert_eq!(
            daemon.engine().actuator().writes(),
            &[SpeedLevel::new(4).unwrap()]
        );
    }

    #[test]
    fn test_ask_policy_prompts_with_current_level() {
        let mut daemon = manual_daemon(ExitPolicy::Ask);
        let mut asked = None;

        let outcome = daemon
            .exit_sequence(&mut |speed| {
                asked = Some(speed);
                ExitChoice::Defer
            })
            .unwrap();
        assert_eq!(outcome, ExitOutcome::Resumed);
        assert_eq!(asked, Some(SpeedLevel::new(4).unwrap()));
        assert!(daemon.engine().is_running());
    }

    #[test]
    fn test_sensor_failure_ends_run() {
        let mut daemon = manual_daemon(ExitPolicy::Restore);
        daemon.engine.sensor_mut().push_failure();
        let shutdown = AtomicBool::new(false);
        let mut reports = 0;

        let result = daemon.run(&shutdown, |_| reports += 1, |_| ExitChoice::Keep);
        assert!(matches!(result, Err(AppError::Engine(_))));
        assert_eq!(reports, 0);
        // restore policy still hands the fan back
        assert_eq!(
            daemon.engine().actuator().writes().last(),
            Some(&SpeedLevel::AUTO)
        );
    }
}
