use rand::Rng;

use crate::clinic::Clinic;
use crate::components::CarePathway;
use crate::scheduler::Context;
use crate::traits::{Process, Suspend};

/// Walk-in source: one patient per activation, then sleep for an exponential
/// interarrival gap. Never finishes; the horizon ends it.
#[derive(Debug, Default)]
pub struct PatientGenerator;

impl<R: Rng> Process<Clinic<R>> for PatientGenerator {
    fn resume(&mut self, cx: &mut Context<'_, Clinic<R>>) -> Suspend {
        let now = cx.now();
        let patient = cx.env().admit(now);
        let route = cx.env().patients()[patient as usize].route();
        cx.spawn(Box::new(CarePathway::new(patient, route)));
        Suspend::Timeout(cx.env().interarrival_time())
    }
}
