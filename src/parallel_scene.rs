// THEORY:
// The parallel analyzer runs the same pairwise containment test as the sequential
// `ContainmentAnalyzer`, but spreads the candidate containers across a pool of
// blocking tasks. Each candidate comparison is already independent: it owns its
// scratch canvas and only reads the shapes. The one shared mutable resource, the
// containment relation, is touched only after every batch has reported back, and
// verdicts are merged in candidate order so results match the sequential path.

use crate::core_modules::containment::{
    ContainmentAnalyzer, ContainmentRelation, containment_test,
};
use crate::core_modules::shape::{Shape, ShapeId};
use crate::error::Result;
use crate::scene::SceneConfig;
use futures::future::join_all;
use log::debug;
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct ParallelAnalyzer {
    analyzer: ContainmentAnalyzer,
    workers: usize,
}

impl ParallelAnalyzer {
    /// One worker per logical CPU.
    pub fn new(config: SceneConfig) -> Result<Self> {
        Self::with_workers(config, num_cpus::get())
    }

    pub fn with_workers(config: SceneConfig, workers: usize) -> Result<Self> {
        Ok(Self {
            analyzer: ContainmentAnalyzer::new(config)?,
            workers: workers.max(1),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Parallel counterpart of `ContainmentAnalyzer::analyze_newest`.
    pub async fn analyze_newest(&mut self, shapes: Arc<[Shape]>) -> Result<Vec<ShapeId>> {
        let Some(newest_index) = shapes.len().checked_sub(1) else {
            return Ok(Vec::new());
        };
        let candidates = newest_index;
        let batch_size = candidates.div_ceil(self.workers).max(1);
        let config = self.analyzer.config().clone();

        let tasks = (0..candidates).step_by(batch_size).map(|start| {
            let end = (start + batch_size).min(candidates);
            let shapes = Arc::clone(&shapes);
            let config = config.clone();
            tokio::task::spawn_blocking(move || {
                let newest = &shapes[newest_index];
                shapes[start..end]
                    .iter()
                    .filter(|container| containment_test::encloses(&config, container, newest))
                    .map(Shape::id)
                    .collect::<Vec<ShapeId>>()
            })
        });

        let mut containers = Vec::new();
        for batch in join_all(tasks).await {
            containers.extend(batch?);
        }

        let newest = shapes[newest_index].id();
        self.analyzer.record_all(newest, &containers);
        debug!(
            "{} checked against {} shapes on {} workers, inside of {:?}",
            newest, candidates, self.workers, containers
        );
        Ok(containers)
    }

    pub fn relation(&self) -> &ContainmentRelation {
        self.analyzer.relation()
    }

    pub fn contains(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.analyzer.contains(id)
    }

    pub fn contained_by(&self, id: ShapeId) -> BTreeSet<ShapeId> {
        self.analyzer.contained_by(id)
    }

    pub fn clear(&mut self) {
        self.analyzer.clear();
    }
}
