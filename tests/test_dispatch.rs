use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use chrono::NaiveDate;
use rand::{rngs::StdRng, SeedableRng};
use rotagen::{
    caching::PriorGeneration,
    constraints::{ConstraintSet, RequiredRoleConstraint, ScheduledHoursConstraint},
    contiguity::ContiguityBonus,
    error::{Result, RotaError},
    evolution::{
        Challenge, DispatchOptions, GeneVector, PopulationDispatcher, PopulationFitness,
        ScheduleContext, ScheduleFitness, Score,
    },
    roster::{Person, Roster},
    time_grid::ScheduleWindow,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Wraps a challenge and counts how often it is called.
#[derive(Clone)]
struct Counting<C> {
    inner: C,
    calls: Arc<AtomicUsize>,
}

impl<C> Counting<C> {
    fn new(inner: C) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P, C: Challenge<P>> Challenge<P> for Counting<C> {
    fn score(&self, individual: &P) -> Result<Score> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.score(individual)
    }
}

#[derive(Clone)]
struct GeneSum;

impl Challenge<GeneVector> for GeneSum {
    fn score(&self, individual: &GeneVector) -> Result<Score> {
        Ok(individual.iter().map(|&gene| gene as Score).sum())
    }
}

fn options() -> DispatchOptions {
    DispatchOptions::builder()
        .num_threads(4)
        .parallel_threshold(2)
        .build()
}

fn genes(values: &[usize]) -> GeneVector {
    GeneVector::new(values.to_vec())
}

#[test]
fn test_carried_over_parents_are_not_rescored() {
    init_tracing();
    let challenge = Counting::new(GeneSum);
    let dispatcher = PopulationDispatcher::with_options(challenge.clone(), &options()).unwrap();

    let parents = vec![genes(&[1, 1]), genes(&[2, 2]), genes(&[3, 3])];
    // Deliberately not what GeneSum would compute, to prove the value is reused.
    let fitness = vec![111, 222, 333];
    let prior = PriorGeneration::new(&parents, &fitness).unwrap();

    let population = vec![genes(&[3, 3]), genes(&[1, 1]), genes(&[2, 2]), genes(&[1, 1])];
    let result = dispatcher.evaluate(&population, Some(&prior)).unwrap();

    assert_eq!(result.scores, vec![333, 111, 222, 111]);
    assert_eq!(result.reused, 4);
    assert_eq!(result.evaluated, 0);
    assert_eq!(challenge.calls(), 0);
}

#[test]
fn test_mixed_generation_keeps_population_order() {
    let challenge = Counting::new(GeneSum);
    let dispatcher = PopulationDispatcher::with_options(challenge.clone(), &options()).unwrap();

    let parents = vec![genes(&[5, 5])];
    let fitness = vec![1000];
    let prior = PriorGeneration::new(&parents, &fitness).unwrap();

    let population: Vec<GeneVector> = (0..20)
        .map(|i| if i % 5 == 0 { genes(&[5, 5]) } else { genes(&[i, 1]) })
        .collect();
    let result = dispatcher.evaluate(&population, Some(&prior)).unwrap();

    for (i, score) in result.scores.iter().enumerate() {
        let expected = if i % 5 == 0 { 1000 } else { i as Score + 1 };
        assert_eq!(*score, expected, "individual {}", i);
    }
    assert_eq!(result.reused, 4);
    assert_eq!(result.evaluated, 16);
    assert_eq!(challenge.calls(), 16);
}

#[test]
fn test_first_generation_has_no_prior() {
    let challenge = Counting::new(GeneSum);
    let dispatcher = PopulationDispatcher::with_options(challenge.clone(), &options()).unwrap();

    let population = vec![genes(&[1]), genes(&[1]), genes(&[4])];
    let result = dispatcher.population_fitness(&population, None).unwrap();
    assert_eq!(result.scores, vec![1, 1, 4]);
    assert_eq!(challenge.calls(), 3);

    let empty_parents: Vec<GeneVector> = vec![];
    let empty_fitness: Vec<Score> = vec![];
    let prior = PriorGeneration::new(&empty_parents, &empty_fitness).unwrap();
    let result = dispatcher.evaluate(&population, Some(&prior)).unwrap();
    assert_eq!(result.evaluated, 3);
    assert_eq!(challenge.calls(), 6);
}

#[test]
fn test_duplicate_parents_first_match_wins() {
    let dispatcher = PopulationDispatcher::with_options(GeneSum, &options()).unwrap();
    let parents = vec![genes(&[7]), genes(&[7])];
    let fitness = vec![70, 700];
    let prior = PriorGeneration::new(&parents, &fitness).unwrap();

    let result = dispatcher.evaluate(&[genes(&[7])], Some(&prior)).unwrap();
    assert_eq!(result.scores, vec![70]);
}

#[test]
fn test_misaligned_prior_rejected() {
    let parents = vec![genes(&[1]), genes(&[2])];
    let fitness = vec![1];
    assert!(matches!(
        PriorGeneration::new(&parents, &fitness),
        Err(RotaError::PriorGeneration {
            parents: 2,
            fitness: 1
        })
    ));
}

#[test]
fn test_empty_population() {
    let dispatcher = PopulationDispatcher::with_options(GeneSum, &options()).unwrap();
    let population: Vec<GeneVector> = vec![];
    let result = dispatcher.evaluate(&population, None).unwrap();
    assert!(result.scores.is_empty());
    assert_eq!(result.best(), None);
}

fn schedule_fitness() -> ScheduleFitness {
    let roster = Roster::new(vec![
        Person::new(0, "Ada", 20, 8).with_role("lead"),
        Person::new(1, "Bob", 20, 8),
        Person::new(2, "Cy", 4, 4).with_role("lead"),
    ])
    .unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(ScheduledHoursConstraint::new("9:00-12:00", "Mon-Wed").unwrap())
        .with_constraint(RequiredRoleConstraint::new("9:00-9:00", "Mon-Wed", "lead").unwrap())
        .build()
        .with_person_caps(&roster);
    let context = ScheduleContext::from_constraints(
        roster,
        constraints,
        ScheduleWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
        ),
        ContiguityBonus::default(),
    )
    .unwrap();
    ScheduleFitness::new(context)
}

#[test]
fn test_dispatch_matches_direct_evaluation() {
    init_tracing();
    let fitness = schedule_fitness();
    let space = fitness.context().gene_space().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let population = space.sample_population(40, &mut rng);

    let challenge = Counting::new(fitness.clone());
    let dispatcher = PopulationDispatcher::with_options(challenge.clone(), &options()).unwrap();
    let first = dispatcher.evaluate(&population, None).unwrap();

    for (individual, score) in population.iter().zip(&first.scores) {
        assert_eq!(*score, fitness.fitness(individual).unwrap());
        assert!(*score <= fitness.context().max_fitness());
    }

    // Next generation: the parents survive, one new child joins.
    let prior = PriorGeneration::new(&population, &first.scores).unwrap();
    let mut next = population.clone();
    next.push(GeneVector::new(vec![0; space.len()]));
    let calls_before = challenge.calls();
    let second = dispatcher.evaluate(&next, Some(&prior)).unwrap();

    assert_eq!(&second.scores[..population.len()], &first.scores[..]);
    assert_eq!(second.evaluated, 1);
    assert_eq!(challenge.calls(), calls_before + 1);
}

#[test]
fn test_invalid_individual_fails_whole_generation() {
    let fitness = schedule_fitness();
    let length = fitness.context().hours().len();
    let dispatcher = PopulationDispatcher::with_options(fitness, &options()).unwrap();

    let mut population = vec![GeneVector::new(vec![0; length]); 5];
    population[3] = GeneVector::new(vec![9; length]);
    match dispatcher.evaluate(&population, None) {
        Err(RotaError::Evaluation { index, source }) => {
            assert_eq!(index, 3);
            assert!(matches!(*source, RotaError::UnknownPerson(9)));
        }
        other => panic!("expected evaluation error, got {:?}", other),
    }
}

#[test]
fn test_shared_pool_serves_two_dispatchers() {
    let pool = options().build_pool().unwrap();
    let sums = PopulationDispatcher::new(GeneSum, Arc::clone(&pool));
    let schedule = PopulationDispatcher::new(schedule_fitness(), Arc::clone(&pool));

    let result = sums.evaluate(&[genes(&[2, 3])], None).unwrap();
    assert_eq!(result.scores, vec![5]);

    let length = schedule.challenge().context().hours().len();
    let result = schedule
        .evaluate(&[GeneVector::new(vec![0; length])], None)
        .unwrap();
    assert_eq!(result.scores.len(), 1);
}

#[cfg(feature = "serde")]
#[test]
fn test_breakdown_serializes() {
    let fitness = schedule_fitness();
    let length = fitness.context().hours().len();
    let breakdown = fitness.explain(&vec![0; length][..]).unwrap();
    let json = serde_json::to_string(&breakdown).unwrap();
    let back: rotagen::evolution::FitnessBreakdown = serde_json::from_str(&json).unwrap();
    assert_eq!(back, breakdown);

    let json = serde_json::to_string(&options()).unwrap();
    let decoded: DispatchOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, options());
}
