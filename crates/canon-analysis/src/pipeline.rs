use canon_config::AnalysisConfig;
use canon_model::{CanonicalModel, ClassId, MetadataSupplier};
use rayon::prelude::*;

use crate::accessors::synthesize_properties;
use crate::collect::{collect, Snapshot};
use crate::conflicts::resolve_conflicts;
use crate::error::StructuralError;
use crate::overloads::resolve_overloads;
use crate::type_graph::walk;

const TARGET: &str = "canon.analysis";

/// Result of analysing one class of a batch.
pub type ClassOutcome = (ClassId, Result<CanonicalModel, StructuralError>);

/// Run the whole pipeline for one class.
///
/// The supplier is queried up front; a [`StructuralError`] aborts this class
/// only. Diagnostics never abort: a flagged model is still a valid model.
pub fn analyze_class<S>(
    supplier: &S,
    class: ClassId,
    config: &AnalysisConfig,
) -> Result<CanonicalModel, StructuralError>
where
    S: MetadataSupplier + ?Sized,
{
    analyze_class_with(supplier, class, config, Stages::Parallel)
}

/// Run the member passes over an already collected snapshot.
pub fn analyze_snapshot(snapshot: &Snapshot, config: &AnalysisConfig) -> CanonicalModel {
    run_stages(snapshot, config, Stages::Parallel)
}

/// Analyse `classes` on a rayon pool sized by `config.threads`.
///
/// Results come back in request order. A class that fails structurally does
/// not affect the others.
pub fn analyze_classes<S>(
    supplier: &S,
    classes: &[ClassId],
    config: &AnalysisConfig,
) -> Vec<ClassOutcome>
where
    S: MetadataSupplier + Sync + ?Sized,
{
    let span = tracing::debug_span!(target: TARGET, "analyze_classes", classes = classes.len());
    let _guard = span.enter();

    let run_parallel = || -> Vec<ClassOutcome> {
        classes
            .par_iter()
            .map(|&class| (class, analyze_class_with(supplier, class, config, Stages::Parallel)))
            .collect()
    };

    let outcomes = match build_pool(config.worker_threads()) {
        Pool::Global => run_parallel(),
        Pool::Rayon(pool) => pool.install(run_parallel),
        Pool::Inline => classes
            .iter()
            .map(|&class| (class, analyze_class_with(supplier, class, config, Stages::Sequential)))
            .collect(),
    };

    let failed = outcomes.iter().filter(|(_, result)| result.is_err()).count();
    tracing::debug!(
        target: TARGET,
        analysed = outcomes.len() - failed,
        failed,
        "batch analysis finished"
    );
    outcomes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stages {
    Parallel,
    Sequential,
}

fn analyze_class_with<S>(
    supplier: &S,
    class: ClassId,
    config: &AnalysisConfig,
    stages: Stages,
) -> Result<CanonicalModel, StructuralError>
where
    S: MetadataSupplier + ?Sized,
{
    let span = tracing::debug_span!(target: TARGET, "analyze_class", class = %class);
    let _guard = span.enter();

    let snapshot = collect(supplier, class).inspect_err(|err| {
        tracing::warn!(target: TARGET, class = %class, error = %err, "class analysis aborted");
    })?;
    Ok(run_stages(&snapshot, config, stages))
}

fn run_stages(snapshot: &Snapshot, config: &AnalysisConfig, stages: Stages) -> CanonicalModel {
    let (properties, (overloads, graph)) = match stages {
        Stages::Parallel => rayon::join(
            || synthesize_properties(snapshot, config),
            || {
                rayon::join(
                    || resolve_overloads(snapshot, config),
                    || walk(snapshot, config),
                )
            },
        ),
        Stages::Sequential => (
            synthesize_properties(snapshot, config),
            (resolve_overloads(snapshot, config), walk(snapshot, config)),
        ),
    };

    tracing::debug!(
        target: TARGET,
        properties = properties.len(),
        groups = overloads.groups.len(),
        inherited = graph.inherited.len(),
        overrides = graph.overrides.len(),
        "member passes finished"
    );

    let model = resolve_conflicts(snapshot, properties, overloads, graph);
    if model.is_flagged() {
        tracing::debug!(
            target: TARGET,
            class = %model.class,
            diagnostics = model.diagnostics.len(),
            "model carries conflict diagnostics"
        );
    }
    model
}

enum Pool {
    Global,
    Rayon(rayon::ThreadPool),
    Inline,
}

fn build_pool(threads: Option<usize>) -> Pool {
    let Some(threads) = threads else {
        return Pool::Global;
    };
    // Thread creation can fail under low process limits; shrink the pool
    // instead of failing the batch.
    let mut threads = threads.max(1);
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|idx| format!("canon-analysis-{idx}"))
            .build()
        {
            Ok(pool) => return Pool::Rayon(pool),
            Err(_) if threads > 1 => {
                threads = (threads / 2).max(1);
            }
            Err(err) => {
                tracing::warn!(
                    target: TARGET,
                    error = %err,
                    "could not start analysis workers; analysing inline"
                );
                return Pool::Inline;
            }
        }
    }
}
