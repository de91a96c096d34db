//! Fan control engine
//!
//! [`ControlEngine`] owns the control mode, the level last applied to the
//! fan, the hysteresis bit and the tick schedule. Collaborators drive it
//! only through `apply_*`, [`ControlEngine::tick`], [`ControlEngine::stop`]
//! and the exit sequence. The only side effects are the sensor read and
//! the actuator write.

pub mod report;
pub mod schedule;

pub use report::{ApplyOutcome, ExitChoice, ExitOutcome, ExitPolicy, ModeKind, TickReport};
pub use schedule::{Schedule, ScheduleHandle};

use crate::device::{FanActuator, TemperatureSensor};
use crate::domain::curve::{check_curve, solve};
use crate::domain::{
    AutoProfile, ConfigurationWarning, CurveSolution, FanCurve, ManualProfile, Profile,
    ScanInterval, SpeedLevel, Temperature,
};
use crate::error::{ActuatorError, EngineError};

/// Active control mode and its mode-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Stopped,
    Auto {
        profile: AutoProfile,
        /// Set while the critical level is applied
        was_critical: bool,
    },
    Manual(ManualProfile),
    Curve {
        curve: FanCurve,
        /// Level the curve last settled on
        last_speed: SpeedLevel,
    },
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Stopped => ModeKind::Stopped,
            Mode::Auto { .. } => ModeKind::Auto,
            Mode::Manual(_) => ModeKind::Manual,
            Mode::Curve { .. } => ModeKind::Curve,
        }
    }
}

/// Temperature-to-fan-level decision engine
pub struct ControlEngine<S, A> {
    sensor: S,
    actuator: A,
    mode: Mode,
    current_speed: SpeedLevel,
    schedule: Schedule,
}

impl<S: TemperatureSensor, A: FanActuator> ControlEngine<S, A> {
    /// Create a stopped engine; the fan is assumed to be under firmware control
    pub fn new(sensor: S, actuator: A) -> Self {
        Self {
            sensor,
            actuator,
            mode: Mode::Stopped,
            current_speed: SpeedLevel::AUTO,
            schedule: Schedule::new(),
        }
    }

    /// Run threshold/hysteresis control
    ///
    /// Re-applying the running profile is a no-op. Otherwise the schedule is
    /// cancelled, one tick runs immediately and a new schedule is installed.
    /// Coming from another mode the fan is first handed back to the
    /// firmware; a running auto profile keeps its hysteresis state.
    pub fn apply_auto(&mut self, profile: AutoProfile) -> Result<ApplyOutcome, EngineError> {
        let was_critical = match self.mode {
            Mode::Auto {
                profile: active, ..
            } if active == profile => {
                log::debug!("Auto profile unchanged, nothing to apply");
                return Ok(ApplyOutcome::Unchanged);
            }
            Mode::Auto { was_critical, .. } => was_critical,
            _ => {
                if !self.current_speed.is_auto() {
                    // failure is logged; was_critical keeps the next tick retrying
                    let _ = self.write(SpeedLevel::AUTO);
                }
                !self.current_speed.is_auto()
            }
        };

        self.schedule.cancel();
        self.mode = Mode::Auto {
            profile,
            was_critical,
        };
        log::info!("Automatic control: {}", profile);

        self.start(profile.scan_interval())
    }

    /// Hold a fixed fan level
    ///
    /// Re-applying the same level and interval is a no-op. Otherwise the
    /// level is written immediately, then one tick runs and a new schedule
    /// is installed.
    pub fn apply_manual(&mut self, profile: ManualProfile) -> Result<ApplyOutcome, EngineError> {
        if let Mode::Manual(active) = &self.mode {
            if *active == profile {
                log::debug!("Manual profile unchanged, nothing to apply");
                return Ok(ApplyOutcome::Unchanged);
            }
        }

        self.schedule.cancel();
        let _ = self.write(profile.fixed_speed());
        self.mode = Mode::Manual(profile);
        log::info!("Manual control: {}", profile);

        self.start(profile.scan_interval())
    }

    /// Follow a stepped fan curve
    ///
    /// While already following a curve, new values are adopted in place:
    /// with the same interval the next scheduled tick picks them up, with a
    /// new interval the schedule is reinstalled without an extra tick.
    pub fn apply_curve(&mut self, curve: FanCurve) -> Result<ApplyOutcome, EngineError> {
        if let Mode::Curve { curve: active, .. } = &self.mode {
            if *active == curve {
                log::debug!("Fan curve unchanged, nothing to apply");
                return Ok(ApplyOutcome::Unchanged);
            }
        }

        if let Some(warning) = check_curve(&curve) {
            log::warn!("Fan curve: {}", warning);
        }

        if let Mode::Curve { curve: active, .. } = &mut self.mode {
            let interval_changed = active.scan_interval() != curve.scan_interval();
            *active = curve;
            log::info!("Fan curve updated: {}", curve);

            if !interval_changed {
                return Ok(ApplyOutcome::Adopted);
            }
            self.schedule.install(curve.scan_interval().as_duration());
            return Ok(ApplyOutcome::Rescheduled);
        }

        self.schedule.cancel();
        self.mode = Mode::Curve {
            curve,
            last_speed: self.current_speed,
        };
        log::info!("Curve control: {}", curve);

        self.start(curve.scan_interval())
    }

    /// Apply any validated profile
    pub fn apply(&mut self, profile: Profile) -> Result<ApplyOutcome, EngineError> {
        match profile {
            Profile::Auto(p) => self.apply_auto(p),
            Profile::Manual(p) => self.apply_manual(p),
            Profile::Curve(c) => self.apply_curve(c),
        }
    }

    /// Run one control step
    ///
    /// Reads the temperature and applies the active mode's decision. A
    /// sensor failure stops the engine; a failed write is reported and
    /// retried on the next tick.
    pub fn tick(&mut self) -> Result<TickReport, EngineError> {
        if self.mode == Mode::Stopped {
            return Err(EngineError::NotRunning);
        }

        let temp = match self.sensor.read_temperature() {
            Ok(temp) => temp,
            Err(e) => {
                log::error!(
                    "Cannot read CPU temperature, is the kernel running with thinkpad_acpi? {}",
                    e
                );
                self.stop();
                return Err(EngineError::Sensor(e));
            }
        };

        let report = match self.mode {
            Mode::Stopped => return Err(EngineError::NotRunning),
            Mode::Auto {
                profile,
                was_critical,
            } => self.tick_auto(temp, profile, was_critical),
            Mode::Manual(profile) => self.tick_manual(temp, profile),
            Mode::Curve { curve, last_speed } => self.tick_curve(temp, curve, last_speed),
        };

        log::debug!("{}", report);
        Ok(report)
    }

    /// Cancel the schedule and stop controlling the fan
    ///
    /// The fan stays at whatever level it was last set to.
    pub fn stop(&mut self) {
        self.schedule.cancel();
        if self.mode != Mode::Stopped {
            log::info!("Stopping {}", self.mode.kind());
        }
        self.mode = Mode::Stopped;
    }

    /// Level to offer restoring on exit; `None` when the fan is already on auto
    pub fn pending_exit_speed(&self) -> Option<SpeedLevel> {
        (!self.current_speed.is_auto()).then_some(self.current_speed)
    }

    /// Finish the exit sequence with the operator's choice
    pub fn exit(&mut self, choice: ExitChoice) -> Result<ExitOutcome, EngineError> {
        match choice {
            ExitChoice::Defer => {
                log::info!("Exit cancelled, continuing {}", self.mode.kind());
                Ok(ExitOutcome::Resumed)
            }
            ExitChoice::Keep => {
                self.stop();
                log::info!("Exiting with fan level {}", self.current_speed);
                Ok(ExitOutcome::Terminate)
            }
            ExitChoice::RestoreAuto => {
                self.stop();
                if !self.current_speed.is_auto() {
                    self.write(SpeedLevel::AUTO)?;
                }
                log::info!("Exiting with fan under firmware control");
                Ok(ExitOutcome::Terminate)
            }
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode != Mode::Stopped
    }

    /// Level last written successfully
    pub fn current_speed(&self) -> SpeedLevel {
        self.current_speed
    }

    /// Active tick schedule
    pub fn schedule(&self) -> Option<ScheduleHandle> {
        self.schedule.active()
    }

    /// Whether `handle` should still fire
    pub fn is_current(&self, handle: &ScheduleHandle) -> bool {
        self.schedule.is_current(handle)
    }

    /// Number of schedules cancelled so far
    pub fn cancellations(&self) -> u64 {
        self.schedule.cancellations()
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    fn start(&mut self, interval: ScanInterval) -> Result<ApplyOutcome, EngineError> {
        let report = self.tick()?;
        self.schedule.install(interval.as_duration());
        Ok(ApplyOutcome::Started(report))
    }

    fn tick_auto(
        &mut self,
        temp: Temperature,
        profile: AutoProfile,
        was_critical: bool,
    ) -> TickReport {
        let critical = temp >= profile.crit_temp();

        // also covers a critical level changed while hot
        if critical && (!was_critical || self.current_speed != profile.critical_speed()) {
            let result = self.write(profile.critical_speed());
            if result.is_ok() {
                self.set_was_critical(true);
            }
            let status = format!(
                "Temperature is critical, Fan level set to {}",
                profile.critical_speed()
            );
            return self.report(temp, status, result.is_ok(), None, result.err());
        }

        if was_critical && !critical {
            let result = self.write(SpeedLevel::AUTO);
            if result.is_ok() {
                self.set_was_critical(false);
            }
            let status = format!("Temperature is safe, Fan level set to {}", SpeedLevel::AUTO);
            return self.report(temp, status, result.is_ok(), None, result.err());
        }

        let status = if was_critical {
            format!("CRITICAL - Fan level: {}", self.current_speed)
        } else {
            format!("SAFE - Fan level: {}", self.current_speed)
        };
        self.report(temp, status, false, None, None)
    }

    fn tick_manual(&mut self, temp: Temperature, profile: ManualProfile) -> TickReport {
        let fixed = profile.fixed_speed();
        if self.current_speed != fixed {
            // the write in apply_manual failed
            let result = self.write(fixed);
            let status = format!("Manual control is active! - Fan level {}", fixed);
            return self.report(temp, status, result.is_ok(), None, result.err());
        }

        let status = format!("Manual control is active! - Fan level {}", fixed);
        self.report(temp, status, false, None, None)
    }

    fn tick_curve(
        &mut self,
        temp: Temperature,
        fan_curve: FanCurve,
        last_speed: SpeedLevel,
    ) -> TickReport {
        let solution = if temp.offset(fan_curve.delta_temp()) <= fan_curve.safe_temp() {
            CurveSolution {
                speed: fan_curve.safe_speed(),
                warning: None,
            }
        } else if temp >= fan_curve.crit_temp() {
            CurveSolution {
                speed: fan_curve.crit_speed(),
                warning: None,
            }
        } else {
            solve(&fan_curve, temp)
        };

        if let Some(warning) = &solution.warning {
            log::warn!("Fan curve: {}", warning);
        }

        let target = solution.speed;
        if target == last_speed {
            let status = format!("Fan level {} (unchanged)", last_speed);
            return self.report(temp, status, false, solution.warning, None);
        }

        let direction = if target > last_speed { "up" } else { "down" };
        match self.write(target) {
            Ok(()) => {
                if let Mode::Curve { last_speed, .. } = &mut self.mode {
                    *last_speed = target;
                }
                let status = format!("Fan level {} ({} from {})", target, direction, last_speed);
                self.report(temp, status, true, solution.warning, None)
            }
            Err(e) => {
                let status = format!(
                    "Fan level {} (unchanged, {} to {} failed)",
                    last_speed, direction, target
                );
                self.report(temp, status, false, solution.warning, Some(e))
            }
        }
    }

    fn set_was_critical(&mut self, value: bool) {
        if let Mode::Auto { was_critical, .. } = &mut self.mode {
            *was_critical = value;
        }
    }

    /// Write a level; `current_speed` only follows successful writes
    fn write(&mut self, level: SpeedLevel) -> Result<(), ActuatorError> {
        match self.actuator.write_speed(level) {
            Ok(()) => {
                log::info!("Fan speed set to {}", level);
                self.current_speed = level;
                Ok(())
            }
            Err(e) => {
                log::warn!("{}", e);
                Err(e)
            }
        }
    }

    fn report(
        &self,
        temperature: Temperature,
        status: String,
        changed: bool,
        warning: Option<ConfigurationWarning>,
        write_error: Option<ActuatorError>,
    ) -> TickReport {
        TickReport {
            temperature,
            mode: self.mode.kind(),
            speed: self.current_speed,
            changed,
            status,
            warning,
            write_error,
        }
    }
}
