//! Balanced transportation problem with three sources and four destinations.
use crate::algorithm::SolverSettings;
use crate::algorithm::log::IterationLog;
use crate::algorithm::transportation::{solve_transportation, TransportationStep};
use crate::algorithm::transportation::cycle::Cycle;
use crate::algorithm::transportation::initial::minimum_cost;
use crate::algorithm::transportation::potentials::{entering_cell, Potentials};
use crate::data::transportation::TransportationProblem;
use crate::io::problem::parse_transportation;
use crate::R;

const PROBLEM_TEXT: &str = "
# three factories, four warehouses
supply: 20 50 30
demand: 30 20 40 10
costs:
2 3 11 7
1 0 6 1
5 8 15 9
";

fn problem() -> TransportationProblem {
    parse_transportation(PROBLEM_TEXT).unwrap()
}

#[test]
fn first_improvement_by_hand() {
    let problem = problem();
    let (balanced, dummy) = problem.balance().unwrap();
    assert_eq!(dummy, None);
    assert_eq!(balanced, problem);

    let mut log = IterationLog::new();
    let allocation = minimum_cost(&balanced, &mut log).unwrap();
    assert_eq!(allocation.nr_basic(), 3 + 4 - 1);
    assert_eq!(allocation.total_cost().unwrap(), R!(660));

    let potentials = Potentials::compute(&allocation).unwrap();
    assert_eq!(potentials.u, [R!(0), R!(-6), R!(4)]);
    assert_eq!(potentials.v, [R!(7), R!(6), R!(11), R!(7)]);
    let reduced_costs = potentials.reduced_costs(&allocation).unwrap();
    assert_eq!(reduced_costs[2][0], R!(-6));
    assert_eq!(entering_cell(&reduced_costs), Some((2, 0)));

    let cycle = Cycle::find(&allocation, (2, 0)).unwrap();
    assert_eq!(cycle.cells(), [(2, 0), (1, 0), (1, 3), (0, 3), (0, 2), (2, 2)]);
    assert_eq!(cycle.leaving_cell(&allocation), ((0, 3), R!(10)));
    // Every unit moved saves 6
    assert_eq!(R!(660) - R!(6) * R!(10), R!(600));
}

#[test]
fn invariants_hold_at_every_step() {
    let problem = problem();
    let (solution, log) = solve_transportation(&problem, &SolverSettings::default()).unwrap();

    let mut previous_cost = None;
    for step in &log {
        if let TransportationStep::Improve { allocation, total_cost, .. }
        | TransportationStep::Optimal { allocation, total_cost, .. } = step {
            assert_eq!(allocation.nr_basic(), 3 + 4 - 1);
            for (source, &supply) in problem.supply().iter().enumerate() {
                assert_eq!(allocation.row_sum(source).unwrap(), supply);
            }
            for (destination, &demand) in problem.demand().iter().enumerate() {
                assert_eq!(allocation.column_sum(destination).unwrap(), demand);
            }
            if let Some(previous) = previous_cost {
                assert!(*total_cost <= previous);
            }
            previous_cost = Some(*total_cost);
        }
    }

    match log.last() {
        Some(TransportationStep::Optimal { reduced_costs, total_cost, .. }) => {
            assert!(reduced_costs.iter().flatten().all(|value| !value.is_negative()));
            assert_eq!(*total_cost, solution.total_cost);
        },
        other => panic!("expected the optimality check, got {:?}", other),
    }
    assert_eq!(solution.total_cost, R!(460));
}
