use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use log::{info, warn};
use serde::Serialize;
use tokio::task;
use uuid::Uuid;

use solver_core::algorithms::SteepestDescent;
use solver_core::search::Search;
use solver_core::stop_criteria::{MaxRuntime, MaxSteps};

use crate::problem::knapsack::{FlipNeighbourhood, KnapsackProblem};

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct JobResult {
    pub selected_items: Vec<bool>,
    pub total_value: f64,
    pub steps_taken: u64,
}

#[derive(Serialize, Clone, Debug)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub error: Option<String>,
}

/// Request payload describing one knapsack instance to solve.
#[derive(serde::Deserialize, Debug)]
pub struct SolveRequest {
    pub items: Vec<crate::problem::knapsack::Item>,
    pub capacity: u32,
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
    pub max_runtime_seconds: Option<u64>,
}

fn default_max_steps() -> u64 {
    10_000
}

/// Tracks in-flight and completed knapsack-solving jobs, the way the
/// teacher's job manager tracks schedule-optimization jobs: an in-memory
/// map keyed by job id, mutated from a background task spawned per job.
#[derive(Clone)]
pub struct JobManager {
    jobs: Arc<DashMap<Uuid, Arc<Mutex<Job>>>>,
}

impl JobManager {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
        }
    }

    pub fn create_job(&self, request: SolveRequest) -> Uuid {
        let job_id = Uuid::new_v4();
        let job = Arc::new(Mutex::new(Job {
            id: job_id,
            status: JobStatus::Pending,
            result: None,
            error: None,
        }));
        self.jobs.insert(job_id, job.clone());

        task::spawn_blocking(move || {
            {
                let mut j = job.lock().unwrap();
                j.status = JobStatus::Running;
            }
            info!("job {job_id} started");

            match solve(request) {
                Ok(result) => {
                    let mut j = job.lock().unwrap();
                    j.status = JobStatus::Completed;
                    j.result = Some(result);
                }
                Err(error) => {
                    warn!("job {job_id} failed: {error}");
                    let mut j = job.lock().unwrap();
                    j.status = JobStatus::Failed;
                    j.error = Some(error.to_string());
                }
            }
        });

        job_id
    }

    pub fn get_job(&self, id: Uuid) -> Option<Job> {
        self.jobs.get(&id).map(|job| job.lock().unwrap().clone())
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

fn solve(request: SolveRequest) -> Result<JobResult, solver_core::error::SearchError> {
    let item_count = request.items.len();
    let problem = Arc::new(KnapsackProblem {
        items: request.items,
        capacity: request.capacity,
    });
    let neighbourhood = FlipNeighbourhood { item_count };
    let initial_solution = vec![false; item_count];

    let search = SteepestDescent::new(problem, neighbourhood, Some(initial_solution));
    search.add_stop_criterion(Arc::new(MaxSteps { limit: request.max_steps }))?;
    if let Some(seconds) = request.max_runtime_seconds {
        search.add_stop_criterion(Arc::new(MaxRuntime {
            limit: Duration::from_secs(seconds),
        }))?;
    }

    search.start()?;

    let (solution, evaluation) = search
        .best_solution()
        .unwrap_or_else(|| (vec![false; item_count], solver_core::model::SimpleEvaluation(0.0)));
    Ok(JobResult {
        selected_items: solution,
        total_value: evaluation.0,
        steps_taken: search.metadata().steps_taken,
    })
}
