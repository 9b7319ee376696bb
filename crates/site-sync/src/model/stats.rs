use super::ProjectStatus;
use std::collections::BTreeMap;

/// The subset of a project the aggregate needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSample {
    pub status: ProjectStatus,
    pub budget: f64,
    pub spent: f64,
    pub progress: f64,
}

/// Summary over the full project set at computation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStats {
    pub total: usize,
    /// Every status is present, zero when no project has it.
    pub by_status: BTreeMap<ProjectStatus, usize>,
    pub total_budget: f64,
    pub total_spent: f64,
    /// Zero for an empty set.
    pub average_progress: f64,
    pub over_budget: usize,
}

impl ProjectStats {
    pub fn from_samples(samples: &[StatsSample]) -> Self {
        let mut by_status: BTreeMap<ProjectStatus, usize> =
            ProjectStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut total_budget = 0.0;
        let mut total_spent = 0.0;
        let mut progress_sum = 0.0;
        let mut over_budget = 0;

        for sample in samples {
            *by_status.entry(sample.status).or_insert(0) += 1;
            total_budget += sample.budget;
            total_spent += sample.spent;
            progress_sum += sample.progress;
            if sample.spent > sample.budget {
                over_budget += 1;
            }
        }

        let average_progress = if samples.is_empty() {
            0.0
        } else {
            progress_sum / samples.len() as f64
        };

        Self {
            total: samples.len(),
            by_status,
            total_budget,
            total_spent,
            average_progress,
            over_budget,
        }
    }

    pub fn count(&self, status: ProjectStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

impl Default for ProjectStats {
    fn default() -> Self {
        Self::from_samples(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ProjectStatus, budget: f64, spent: f64, progress: f64) -> StatsSample {
        StatsSample {
            status,
            budget,
            spent,
            progress,
        }
    }

    #[test]
    fn test_empty_set_is_all_zeros() {
        let stats = ProjectStats::from_samples(&[]);

        assert_eq!(stats.total, 0);
        for status in ProjectStatus::ALL {
            assert_eq!(stats.count(status), 0);
        }
        assert_eq!(stats.by_status.len(), ProjectStatus::ALL.len());
        assert_eq!(stats.total_budget, 0.0);
        assert_eq!(stats.total_spent, 0.0);
        assert_eq!(stats.average_progress, 0.0);
        assert_eq!(stats.over_budget, 0);
    }

    #[test]
    fn test_sums_counts_and_average() {
        let stats = ProjectStats::from_samples(&[
            sample(ProjectStatus::Active, 100.0, 40.0, 20.0),
            sample(ProjectStatus::Active, 50.0, 75.0, 60.0),
            sample(ProjectStatus::Completed, 10.0, 10.0, 100.0),
        ]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(ProjectStatus::Active), 2);
        assert_eq!(stats.count(ProjectStatus::Completed), 1);
        assert_eq!(stats.count(ProjectStatus::Paused), 0);
        assert_eq!(stats.total_budget, 160.0);
        assert_eq!(stats.total_spent, 125.0);
        assert_eq!(stats.average_progress, 60.0);
        assert_eq!(stats.over_budget, 1);
    }
}
