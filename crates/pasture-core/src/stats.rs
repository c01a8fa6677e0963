//! Population counts and per-tick event tallies.

use serde::{Deserialize, Serialize};

/// Census taken after seeding and after every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub tick: u64,
    pub prey: usize,
    pub predators: usize,
    /// Patches currently fully grown
    pub grown_patches: usize,
}

impl PopulationCounts {
    pub fn is_extinct(&self) -> bool {
        self.prey == 0 && self.predators == 0
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub prey_born: u32,
    pub predators_born: u32,
    pub prey_starved: u32,
    pub predators_starved: u32,
    /// Prey removed by predation
    pub kills: u32,
    /// Fully grown patches eaten by prey
    pub grazes: u32,
    /// Patches that became fully grown
    pub regrown: u32,
}

/// Event tallies accumulated over a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub ticks: u64,
    pub prey_born: u64,
    pub predators_born: u64,
    pub prey_starved: u64,
    pub predators_starved: u64,
    pub kills: u64,
    pub grazes: u64,
    pub regrown: u64,
    /// Largest combined prey and predator population seen
    pub peak_mobile_population: usize,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick into the totals
    pub fn update(&mut self, summary: &TickSummary, counts: &PopulationCounts) {
        self.ticks += 1;
        self.prey_born += summary.prey_born as u64;
        self.predators_born += summary.predators_born as u64;
        self.prey_starved += summary.prey_starved as u64;
        self.predators_starved += summary.predators_starved as u64;
        self.kills += summary.kills as u64;
        self.grazes += summary.grazes as u64;
        self.regrown += summary.regrown as u64;
        self.peak_mobile_population = self
            .peak_mobile_population
            .max(counts.prey + counts.predators);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_accumulate() {
        let mut totals = RunTotals::new();
        let summary = TickSummary {
            prey_born: 2,
            kills: 1,
            grazes: 3,
            ..Default::default()
        };
        let counts = PopulationCounts {
            tick: 1,
            prey: 10,
            predators: 4,
            grown_patches: 0,
        };

        totals.update(&summary, &counts);
        totals.update(&summary, &PopulationCounts { prey: 3, ..counts });

        assert_eq!(totals.ticks, 2);
        assert_eq!(totals.prey_born, 4);
        assert_eq!(totals.kills, 2);
        assert_eq!(totals.grazes, 6);
        assert_eq!(totals.peak_mobile_population, 14);
    }

    #[test]
    fn test_extinction() {
        assert!(PopulationCounts::default().is_extinct());
        let counts = PopulationCounts {
            predators: 1,
            ..Default::default()
        };
        assert!(!counts.is_extinct());
    }
}
