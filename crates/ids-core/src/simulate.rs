//! Multi-day simulation over an event catalogue.
//!
//! Every day draws exactly one value per event, in lexicographic name order,
//! from a caller-supplied generator. Reseed (or build a fresh generator via
//! [`crate::generate::seeded_rng`]) before each independent pass when the
//! output must be reproducible.

use crate::events::{event_names, should_report, NoProgress, Phase, ProgressEvent, ProgressSink};
use crate::generate::sample;
use crate::table::{ActivityTable, DayRow};
use ids_common::{Error, EventCatalogue, EventDefinition, EventStatistics, Result, StatsSet};

/// Drives the value generator across a day range.
#[derive(Debug, Clone, Copy)]
pub struct SimulationEngine<'a> {
    events: &'a EventCatalogue,
    stats: &'a StatsSet,
    phase: Phase,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(events: &'a EventCatalogue, stats: &'a StatsSet) -> Self {
        Self {
            events,
            stats,
            phase: Phase::Baseline,
        }
    }

    /// Tag progress events with `phase`.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    /// Simulate `days` days.
    ///
    /// Fails before drawing anything if `days` is zero or if the catalogue
    /// and statistics do not name exactly the same events.
    pub fn run<R, P>(&self, days: u32, rng: &mut R, progress: &mut P) -> Result<ActivityTable>
    where
        R: rand::Rng + ?Sized,
        P: ProgressSink + ?Sized,
    {
        if days == 0 {
            return Err(Error::InvalidValue {
                field: "days".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }
        let plan = self.plan()?;

        let columns: Vec<String> = plan.iter().map(|(def, _)| def.name.clone()).collect();
        let mut table = ActivityTable::new(columns);

        progress.emit(&ProgressEvent::new(
            event_names::SIMULATION_STARTED,
            self.phase,
            0,
            days,
        ));

        for day in 1..=days {
            let row: DayRow = plan
                .iter()
                .map(|(def, stat)| (def.name.clone(), sample(def, stat, rng)))
                .collect();
            table.insert_day(day, row);

            if should_report(day, days) {
                progress.emit(&ProgressEvent::new(
                    event_names::SIMULATION_PROGRESS,
                    self.phase,
                    day,
                    days,
                ));
            }
        }

        progress.emit(&ProgressEvent::new(
            event_names::SIMULATION_COMPLETE,
            self.phase,
            days,
            days,
        ));
        Ok(table)
    }

    /// Pair every definition with its statistics, in column order.
    fn plan(&self) -> Result<Vec<(&'a EventDefinition, &'a EventStatistics)>> {
        if let Some(extra) = self.stats.keys().find(|name| !self.events.contains_key(*name)) {
            return Err(Error::UnknownEvent(extra.clone()));
        }
        self.events
            .iter()
            .map(|(name, def)| {
                self.stats
                    .get(name)
                    .map(|stat| (def, stat))
                    .ok_or_else(|| Error::UnknownEvent(name.clone()))
            })
            .collect()
    }
}

/// Simulate without progress reporting.
pub fn simulate<R: rand::Rng + ?Sized>(
    events: &EventCatalogue,
    stats: &StatsSet,
    days: u32,
    rng: &mut R,
) -> Result<ActivityTable> {
    SimulationEngine::new(events, stats).run(days, rng, &mut NoProgress)
}
