use serde::{Deserialize, Serialize};

use crate::engine::SimTime;

pub type PatientId = u64;

/// One service point of the clinic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Registration,
    Triage,
    Ed,
    Acu,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Registration, Stage::Triage, Stage::Ed, Stage::Acu];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Registration => "registration",
            Stage::Triage => "triage",
            Stage::Ed => "ed",
            Stage::Acu => "acu",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Treatment {
    Ed,
    Acu,
}

impl Treatment {
    pub fn stage(self) -> Stage {
        match self {
            Treatment::Ed => Stage::Ed,
            Treatment::Acu => Stage::Acu,
        }
    }
}

/// Entry, service start and exit of one stage; unset until reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    pub entry: Option<SimTime>,
    pub start: Option<SimTime>,
    pub exit: Option<SimTime>,
}

impl StageTimes {
    /// Time spent queueing before service began.
    pub fn wait(&self) -> Option<SimTime> {
        Some(self.start? - self.entry?)
    }
}

/// A patient's journey. Only the treatment branch chosen on arrival has a
/// timestamp record, so a patient can never be seen by both ED and ACU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub treatment: Treatment,
    pub registration: StageTimes,
    pub triage: StageTimes,
    pub care: StageTimes,
    pub exit: Option<SimTime>,
}

impl Patient {
    pub fn new(id: PatientId, treatment: Treatment) -> Self {
        Self {
            id,
            treatment,
            registration: StageTimes::default(),
            triage: StageTimes::default(),
            care: StageTimes::default(),
            exit: None,
        }
    }

    pub fn is_for_ed(&self) -> bool {
        self.treatment == Treatment::Ed
    }

    pub fn route(&self) -> [Stage; 3] {
        [Stage::Registration, Stage::Triage, self.treatment.stage()]
    }

    /// Timestamps for `stage`, or `None` for the treatment branch not taken.
    pub fn stage(&self, stage: Stage) -> Option<&StageTimes> {
        match stage {
            Stage::Registration => Some(&self.registration),
            Stage::Triage => Some(&self.triage),
            s if s == self.treatment.stage() => Some(&self.care),
            _ => None,
        }
    }

    pub(crate) fn stage_mut(&mut self, stage: Stage) -> &mut StageTimes {
        match stage {
            Stage::Registration => &mut self.registration,
            Stage::Triage => &mut self.triage,
            _ => {
                debug_assert_eq!(stage, self.treatment.stage(), "patient {} off route", self.id);
                &mut self.care
            }
        }
    }

    /// Every recorded timestamp along the route, in visiting order.
    pub fn timeline(&self) -> Vec<SimTime> {
        [self.registration, self.triage, self.care]
            .iter()
            .flat_map(|t| [t.entry, t.start, t.exit])
            .chain(std::iter::once(self.exit))
            .flatten()
            .collect()
    }
}
