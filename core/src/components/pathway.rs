use rand::Rng;

use crate::clinic::Clinic;
use crate::patient::{PatientId, Stage};
use crate::scheduler::Context;
use crate::traits::{Process, Suspend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Arriving,
    Queued,
    InService,
}

/// One patient's walk through the stages of its route.
#[derive(Debug)]
pub struct CarePathway {
    patient: PatientId,
    route: [Stage; 3],
    leg: usize,
    phase: Phase,
}

impl CarePathway {
    pub fn new(patient: PatientId, route: [Stage; 3]) -> Self {
        Self {
            patient,
            route,
            leg: 0,
            phase: Phase::Arriving,
        }
    }
}

impl<R: Rng> Process<Clinic<R>> for CarePathway {
    fn resume(&mut self, cx: &mut Context<'_, Clinic<R>>) -> Suspend {
        let now = cx.now();
        loop {
            let Some(&stage) = self.route.get(self.leg) else {
                cx.env().patient_mut(self.patient).exit = Some(now);
                return Suspend::Finished;
            };
            let clinic = cx.env();
            let pool = clinic.team(stage).pool;
            let times = clinic.patient_mut(self.patient).stage_mut(stage);

            match self.phase {
                Phase::Arriving => {
                    times.entry = Some(now);
                    self.phase = Phase::Queued;
                    return Suspend::Request(pool);
                }
                Phase::Queued => {
                    times.start = Some(now);
                    self.phase = Phase::InService;
                    return Suspend::Timeout(clinic.service_time(stage));
                }
                Phase::InService => {
                    times.exit = Some(now);
                    cx.release(pool);
                    self.leg += 1;
                    self.phase = Phase::Arriving;
                }
            }
        }
    }
}
