use crate::config::AppConfig;
use crate::data::{FeatureTable, TargetSeries};
use crate::engines::evaluation::{ColumnView, FitnessEvaluator, SignalCompiler};
use crate::engines::generation::{
    builder::TreeBuilder,
    early_stopping::EarlyStopping,
    hall_of_fame::HallOfFame,
    individual::{Individual, Origin},
    operators::{select_tournament, subtree_crossover, subtree_mutation, within_size_limit},
};
use crate::error::Result;
use crate::functions::PrimitiveSet;
use crate::types::{GenerationStats, TerminationReason};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::sync::Arc;

pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
    fn on_early_stop(&mut self, _generation: usize, _validation_return: f64) {}
}

/// How a run ended and what each generation looked like
#[derive(Debug, Clone)]
pub struct EvolutionSummary {
    pub history: Vec<GenerationStats>,
    /// Variation rounds completed; generation 0 (initial population) not counted
    pub generations_run: usize,
    pub termination: TerminationReason,
}

/// Generational GP loop.
///
/// Generation 0 scores the random initial population. Every later generation
/// selects by tournament, applies crossover and mutation to a fresh copy, scores
/// the changed individuals on the training split, merges the result into the
/// Hall of Fame and asks the early-stopping controller whether the best-ever
/// individual has reached the validation target. The engine is the only owner
/// of the random generator and the Hall of Fame; scoring never touches either.
pub struct EvolutionEngine {
    config: AppConfig,
    pset: Arc<PrimitiveSet>,
    compiler: SignalCompiler,
    evaluator: FitnessEvaluator,
    early_stopping: EarlyStopping,
    hall_of_fame: HallOfFame,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: AppConfig, pset: Arc<PrimitiveSet>) -> Self {
        let rng = StdRng::seed_from_u64(config.evolution.seed);
        let compiler = SignalCompiler::new(Arc::clone(&pset), config.signal.clone());
        let evaluator = FitnessEvaluator::new(config.fitness.clone());
        let early_stopping = EarlyStopping::new(config.early_stopping.clone());
        let hall_of_fame = HallOfFame::new(config.evolution.hall_of_fame_size);

        Self {
            config,
            pset,
            compiler,
            evaluator,
            early_stopping,
            hall_of_fame,
            rng,
        }
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(
        &mut self,
        train: &FeatureTable,
        train_targets: &TargetSeries,
        validation: &FeatureTable,
        validation_targets: &TargetSeries,
        mut callback: C,
    ) -> Result<EvolutionSummary> {
        let train_view = ColumnView::resolve(train, self.pset.feature_names())?;
        let validation_view = ColumnView::resolve(validation, self.pset.feature_names())?;

        let mut population = self.initialize_population();
        let mut history = Vec::new();
        let mut generations_run = 0;
        let mut termination = TerminationReason::GenerationBudget;

        for generation in 0..=self.config.evolution.max_generations {
            callback.on_generation_start(generation);

            let mut size_reverts = 0;
            if generation > 0 {
                let selected = select_tournament(
                    &population,
                    self.config.evolution.population_size,
                    self.config.evolution.tournament_size,
                    &mut self.rng,
                );
                let (offspring, reverts) = self.vary(selected, generation);
                population = offspring;
                size_reverts = reverts;
            }

            let evaluations =
                self.evaluate_population(&mut population, &train_view, train_targets.values());
            let admitted = self.hall_of_fame.update(&population);
            log::debug!(
                "Generation {}: {} evaluations, {} size reverts, {} admitted to Hall of Fame",
                generation,
                evaluations,
                size_reverts,
                admitted
            );

            let check = self.early_stopping.check(
                self.hall_of_fame.best(),
                &self.compiler,
                &validation_view,
                validation_targets.values(),
            );

            let stats = self.generation_stats(
                generation,
                &population,
                evaluations,
                size_reverts,
                check.validation_return,
            );
            callback.on_generation_complete(&stats);
            history.push(stats);
            generations_run = generation;

            if check.should_stop {
                callback.on_early_stop(generation, check.validation_return);
                termination = TerminationReason::EarlyStop;
                break;
            }
        }

        log::info!(
            "Search finished after {} generations ({})",
            generations_run,
            termination
        );

        Ok(EvolutionSummary {
            history,
            generations_run,
            termination,
        })
    }

    fn initialize_population(&mut self) -> Vec<Individual> {
        let evo = &self.config.evolution;
        let builder = TreeBuilder::new(&self.pset);
        (0..evo.population_size)
            .map(|_| {
                let root = builder.generate(
                    evo.init_method,
                    evo.init_min_depth,
                    evo.init_max_depth,
                    &mut self.rng,
                );
                Individual::new(root, Origin::Initial, 0)
            })
            .collect()
    }

    /// Score every individual without a cached fitness; returns how many were scored
    fn evaluate_population(
        &self,
        population: &mut [Individual],
        view: &ColumnView<'_>,
        targets: &[f64],
    ) -> usize {
        let pending = population.iter().filter(|i| !i.is_evaluated()).count();
        let compiler = &self.compiler;
        let evaluator = &self.evaluator;

        let score = |individual: &mut Individual| {
            let signal = compiler.signal(individual.root(), view);
            individual.set_fitness(evaluator.score(&signal, targets));
        };

        if self.config.evolution.parallel_evaluation {
            population
                .par_iter_mut()
                .filter(|i| !i.is_evaluated())
                .for_each(score);
        } else {
            population
                .iter_mut()
                .filter(|i| !i.is_evaluated())
                .for_each(score);
        }

        pending
    }

    /// Crossover on consecutive pairs, then mutation per individual. Offspring over
    /// the size limit are discarded and the pre-operation individual is kept.
    fn vary(
        &mut self,
        mut offspring: Vec<Individual>,
        generation: usize,
    ) -> (Vec<Individual>, usize) {
        let evo = &self.config.evolution;
        let builder = TreeBuilder::new(&self.pset);
        let mut reverts = 0;

        for i in (1..offspring.len()).step_by(2) {
            if self.rng.gen::<f64>() < evo.crossover_rate {
                let mut first = offspring[i - 1].root().clone();
                let mut second = offspring[i].root().clone();
                if subtree_crossover(&mut first, &mut second, &mut self.rng) {
                    for (slot, child) in [(i - 1, first), (i, second)] {
                        if within_size_limit(&child, evo.max_tree_size) {
                            offspring[slot].replace_root(child, Origin::Crossover, generation);
                        } else {
                            reverts += 1;
                        }
                    }
                }
            }
        }

        for individual in offspring.iter_mut() {
            if self.rng.gen::<f64>() < evo.mutation_rate {
                let mut tree = individual.root().clone();
                let mutated = subtree_mutation(
                    &mut tree,
                    &builder,
                    evo.init_method,
                    evo.mutation_min_depth,
                    evo.mutation_max_depth,
                    &mut self.rng,
                );
                if mutated {
                    if within_size_limit(&tree, evo.max_tree_size) {
                        individual.replace_root(tree, Origin::Mutation, generation);
                    } else {
                        reverts += 1;
                    }
                }
            }
        }

        (offspring, reverts)
    }

    fn generation_stats(
        &self,
        generation: usize,
        population: &[Individual],
        evaluations: usize,
        size_reverts: usize,
        validation_return: f64,
    ) -> GenerationStats {
        let fitness: Vec<f64> = population.iter().map(Individual::rank_fitness).collect();
        let max_fitness = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_fitness = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let mean_fitness = if fitness.is_empty() {
            0.0
        } else {
            fitness.iter().sum::<f64>() / fitness.len() as f64
        };

        GenerationStats {
            generation,
            max_fitness,
            mean_fitness,
            min_fitness,
            evaluations,
            size_reverts,
            hall_of_fame_best: self
                .hall_of_fame
                .best()
                .map(Individual::rank_fitness)
                .unwrap_or(f64::NEG_INFINITY),
            validation_return,
        }
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    pub fn into_hall_of_fame(self) -> HallOfFame {
        self.hall_of_fame
    }

    pub fn compiler(&self) -> &SignalCompiler {
        &self.compiler
    }
}
