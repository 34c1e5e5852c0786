//! Service mode timer
//!
//! After installation the node samples its sensors at a fast rate so the
//! installer sees live values quickly. A one-shot task ends service mode:
//! it switches the sensors to the normal rate and removes itself from the
//! task table.

use crate::config::NodeConfig;
use crate::errors::NodeResult;
use crate::node::{Task, TaskTable};
use crate::scheduler::{Plan, TaskId};
use crate::time::Timestamp;
use crate::traits::SamplingControl;

/// One-shot switch from service to normal sampling
#[derive(Debug, Clone)]
pub struct ServiceModeTimer {
    task: TaskId,
    normal_interval_ms: Timestamp,
    active: bool,
}

impl ServiceModeTimer {
    /// Enter service mode and register the exit task
    ///
    /// Returns `None` when the configuration disables service mode; the
    /// sensors then run at the normal rate from boot.
    pub fn arm<S: SamplingControl>(
        config: &NodeConfig,
        scheduler: &mut TaskTable,
        sensors: &mut S,
    ) -> NodeResult<Option<Self>> {
        sensors.set_sampling_interval(config.boot_sample_interval_ms());
        if config.service_duration_ms == 0 {
            return Ok(None);
        }

        let task = scheduler.register(Task::ServiceModeExit, config.service_duration_ms)?;
        log_info!(
            "Service mode: sampling every {} ms for {} ms",
            config.service_sample_interval_ms,
            config.service_duration_ms
        );

        Ok(Some(Self {
            task,
            normal_interval_ms: config.sample_interval_ms,
            active: true,
        }))
    }

    /// Task body: apply the normal rate and deregister
    pub fn fire<S: SamplingControl>(&mut self, sensors: &mut S) -> Plan {
        sensors.set_sampling_interval(self.normal_interval_ms);
        self.active = false;
        log_info!("Service mode over, sampling every {} ms", self.normal_interval_ms);
        Plan::Unregister
    }

    /// Whether service mode is still running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Slot of the exit task while it is registered
    pub fn task(&self) -> TaskId {
        self.task
    }
}
