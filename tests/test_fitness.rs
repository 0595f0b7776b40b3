use std::sync::Arc;

use chrono::NaiveDate;
use rotagen::{
    constraints::{
        Constraint, ConstraintSet, MaxHoursPerDayConstraint, MaxHoursPerWeekConstraint,
        RequiredRoleConstraint, ScheduledHoursConstraint,
    },
    contiguity::ContiguityBonus,
    error::RotaError,
    evolution::{Challenge, GeneVector, ScheduleContext, ScheduleFitness},
    roster::{Person, Roster},
    time_grid::{HourSlot, ScheduleWindow},
};

fn date(day: u32) -> NaiveDate {
    // January 2024 starts on a Monday.
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn one_hour_window() -> (Vec<HourSlot>, ScheduleWindow) {
    (
        vec![HourSlot::new(date(1), 9).unwrap()],
        ScheduleWindow::new(date(1), date(2)),
    )
}

#[test]
fn test_single_person_single_hour() {
    let person = Person::new(0, "Ada", 40, 8);
    let roster = Roster::new(vec![person]).unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(ScheduledHoursConstraint::new("9:00-9:00", "Mon-Mon").unwrap())
        .build();
    let (hours, window) = one_hour_window();
    let context =
        ScheduleContext::new(hours, roster, constraints, window, ContiguityBonus::default())
            .unwrap();
    let fitness = ScheduleFitness::new(context);

    assert_eq!(fitness.score(&GeneVector::new(vec![0])).unwrap(), 100);
}

#[test]
fn test_missing_role_contributes_nothing() {
    let roster = Roster::new(vec![
        Person::new(0, "Ada", 40, 8).with_role("cook"),
        Person::new(1, "Bob", 40, 8).with_role("lead"),
    ])
    .unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(RequiredRoleConstraint::new("9:00-9:00", "Mon-Mon", "lead").unwrap())
        .build();
    let (hours, window) = one_hour_window();
    let context =
        ScheduleContext::new(hours, roster, constraints, window, ContiguityBonus::default())
            .unwrap();
    let fitness = ScheduleFitness::new(context);

    // diff = 2 people - 1 distinct = 1, worth 1 point either way.
    assert_eq!(fitness.fitness(&[0]).unwrap(), 1);
    assert_eq!(fitness.fitness(&[1]).unwrap(), 100 + 1);
}

#[test]
fn test_zero_weekly_cap() {
    let roster = Roster::new(vec![
        Person::new(0, "Ada", 0, 8),
        Person::new(1, "Bob", 40, 8),
    ])
    .unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(MaxHoursPerWeekConstraint::new(roster.get(0).unwrap()))
        .build();
    let (hours, window) = one_hour_window();
    let context =
        ScheduleContext::new(hours, roster, constraints, window, ContiguityBonus::default())
            .unwrap();
    let fitness = ScheduleFitness::new(context);

    assert_eq!(fitness.fitness(&[0]).unwrap(), 1);
    assert_eq!(fitness.fitness(&[1]).unwrap(), 10 + 1);
}

#[test]
fn test_score_invariant_under_constraint_order() {
    let people = vec![
        Person::new(0, "Ada", 3, 2).with_role("lead"),
        Person::new(1, "Bob", 2, 2),
        Person::new(2, "Cy", 5, 5).with_role("lead"),
    ];
    let roster = Roster::new(people).unwrap();
    let mut rules: Vec<Arc<dyn Constraint>> = vec![
        Arc::new(ScheduledHoursConstraint::new("9:00-11:00", "Mon-Tue").unwrap()),
        Arc::new(RequiredRoleConstraint::new("9:00-9:00", "Mon-Tue", "lead").unwrap()),
        Arc::new(ScheduledHoursConstraint::new("12:00-12:00", "Wed-Wed").unwrap()),
    ];
    for person in roster.people() {
        rules.push(Arc::new(MaxHoursPerWeekConstraint::new(person)));
        rules.push(Arc::new(MaxHoursPerDayConstraint::new(person)));
    }

    let window = ScheduleWindow::new(date(1), date(8));
    let build = |order: &[Arc<dyn Constraint>]| {
        let mut set = ConstraintSet::new();
        for rule in order {
            set.add_shared(Arc::clone(rule));
        }
        ScheduleFitness::new(
            ScheduleContext::from_constraints(
                roster.clone(),
                set,
                window,
                ContiguityBonus::default(),
            )
            .unwrap(),
        )
    };

    let forward = build(&rules);
    let mut reversed_rules = rules.clone();
    reversed_rules.reverse();
    let reversed = build(&reversed_rules);
    let mut rotated_rules = rules.clone();
    rotated_rules.rotate_left(3);
    let rotated = build(&rotated_rules);

    assert_eq!(forward.context().hours().len(), 7);
    let candidates: [&[usize]; 4] = [
        &[0, 0, 0, 2, 2, 2, 1],
        &[1, 1, 1, 1, 1, 1, 1],
        &[2, 0, 1, 0, 2, 1, 2],
        &[2, 2, 2, 2, 2, 2, 2],
    ];
    for genes in candidates {
        let expected = forward.fitness(genes).unwrap();
        assert_eq!(reversed.fitness(genes).unwrap(), expected);
        assert_eq!(rotated.fitness(genes).unwrap(), expected);
    }
}

#[test]
fn test_unscheduled_hour_breaks_coverage() {
    let roster = Roster::new(vec![Person::new(0, "Ada", 40, 8)]).unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(ScheduledHoursConstraint::new("9:00-10:00", "Mon-Mon").unwrap())
        .build();
    // Only 9:00 is scheduled; the constraint also needs 10:00.
    let (hours, window) = one_hour_window();
    let context =
        ScheduleContext::new(hours, roster, constraints, window, ContiguityBonus::default())
            .unwrap();
    let fitness = ScheduleFitness::new(context);

    let breakdown = fitness.explain(&[0]).unwrap();
    assert!(!breakdown.verdicts[0].satisfied);
    assert_eq!(breakdown.total, 0);
}

#[test]
fn test_saturated_week_fails_loudly() {
    let people: Vec<Person> = (0..5)
        .map(|id| Person::new(id, format!("p{}", id), 40, 8))
        .collect();
    let roster = Roster::new(people).unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(ScheduledHoursConstraint::new("9:00-10:00", "Mon-Fri").unwrap())
        .build();
    let context = ScheduleContext::from_constraints(
        roster,
        constraints,
        ScheduleWindow::new(date(1), date(8)),
        ContiguityBonus::default(),
    )
    .unwrap();
    let fitness = ScheduleFitness::new(context);

    // One person per weekday: diff 4 on all five days.
    let genes = [0, 0, 1, 1, 2, 2, 3, 3, 4, 4];
    assert!(matches!(
        fitness.fitness(&genes),
        Err(RotaError::BonusSaturated { score: 250, days: 5 })
    ));

    // Two people on Friday drops the total below the trip-wire.
    let genes = [0, 0, 1, 1, 2, 2, 3, 3, 4, 0];
    assert_eq!(fitness.fitness(&genes).unwrap(), 100 + 4 * 50 + 20);
}

#[test]
fn test_evaluator_shared_across_threads() {
    let roster = Roster::new(vec![
        Person::new(0, "Ada", 40, 8),
        Person::new(1, "Bob", 40, 8),
    ])
    .unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(ScheduledHoursConstraint::new("9:00-12:00", "Mon-Mon").unwrap())
        .build()
        .with_person_caps(&roster);
    let fitness = ScheduleFitness::new(
        ScheduleContext::from_constraints(
            roster,
            constraints,
            ScheduleWindow::new(date(1), date(2)),
            ContiguityBonus::default(),
        )
        .unwrap(),
    );

    let expected = fitness.fitness(&[0, 1, 0, 1]).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let fitness = fitness.clone();
            std::thread::spawn(move || fitness.fitness(&[0, 1, 0, 1]).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_unbounded_saturation_days_scores_normally() {
    let roster = Roster::new(vec![Person::new(0, "Ada", 40, 8)]).unwrap();
    let constraints = ConstraintSet::builder()
        .with_constraint(ScheduledHoursConstraint::new("9:00-9:00", "Mon-Mon").unwrap())
        .build();
    let (hours, window) = one_hour_window();
    let bonus = ContiguityBonus::default().with_saturation_days(Some(usize::MAX));
    let context = ScheduleContext::new(hours, roster, constraints, window, bonus).unwrap();
    let fitness = ScheduleFitness::new(context);

    assert_eq!(fitness.fitness(&[0]).unwrap(), 100);
}

#[cfg(feature = "serde")]
#[test]
fn test_loaded_contiguity_config_is_validated() {
    for raw in [
        r#"{"table":[],"saturation_days":5}"#,
        r#"{"table":[50,0],"saturation_days":5}"#,
    ] {
        assert!(
            serde_json::from_str::<ContiguityBonus>(raw).is_err(),
            "{} should be rejected",
            raw
        );
    }

    let bonus: ContiguityBonus =
        serde_json::from_str(r#"{"table":[0,3],"saturation_days":null}"#).unwrap();
    let roster = Roster::new(vec![
        Person::new(0, "Ada", 40, 8),
        Person::new(1, "Bob", 40, 8),
    ])
    .unwrap();
    let (hours, window) = one_hour_window();
    let context =
        ScheduleContext::new(hours, roster, ConstraintSet::new(), window, bonus).unwrap();
    assert_eq!(ScheduleFitness::new(context).fitness(&[1]).unwrap(), 3);
}

#[cfg(feature = "serde")]
#[test]
fn test_loaded_hours_must_be_whole() {
    let hours: Vec<HourSlot> =
        serde_json::from_str(r#"["2024-01-01T09:00:00","2024-01-01T10:00:00"]"#).unwrap();
    assert_eq!(hours[1], HourSlot::new(date(1), 10).unwrap());
    assert!(serde_json::from_str::<Vec<HourSlot>>(r#"["2024-01-01T09:30:00"]"#).is_err());
}
