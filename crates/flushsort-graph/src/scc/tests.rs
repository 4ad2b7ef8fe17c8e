use super::*;
use crate::{error::CycleError, topo::IndegreeTopologicalSort, traversal::DepthFirstSearch};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn graph_from(vertices: u32, arcs: &[(u32, u32)]) -> Digraph<u32, (u32, u32)> {
    let mut graph = Digraph::new();
    for vertex in 0..vertices {
        graph.add_vertex(vertex);
    }
    for &(origin, destination) in arcs {
        graph.put_arc(origin, destination, (origin, destination));
    }

    graph
}

fn normalized<I>(components: I) -> BTreeSet<BTreeSet<u32>>
where
    I: IntoIterator<Item = Vec<u32>>,
{
    components
        .into_iter()
        .map(|members| members.into_iter().collect())
        .collect()
}

fn reachable(graph: &Digraph<u32, (u32, u32)>, from: u32) -> BTreeSet<u32> {
    DepthFirstSearch::new(graph, &from).copied().collect()
}

#[test]
fn empty_graph_has_no_components() {
    let graph = graph_from(0, &[]);

    assert_eq!(StrongConnection::new(&graph).count(), 0);
    assert_eq!(StrongConnection::new(&graph).contract().component_count(), 0);
}

#[test]
fn isolated_and_self_arc_vertices_are_singletons() {
    let graph = graph_from(2, &[(1, 1)]);
    let found = normalized(StrongConnection::new(&graph));

    assert_eq!(
        found,
        BTreeSet::from([BTreeSet::from([0]), BTreeSet::from([1])])
    );
}

#[test]
fn two_cycles_joined_by_a_bridge() {
    // {0,1,2} -> {3,4}, 5 isolated
    let graph = graph_from(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 3)]);
    let found = normalized(StrongConnection::new(&graph));

    assert_eq!(
        found,
        BTreeSet::from([
            BTreeSet::from([0, 1, 2]),
            BTreeSet::from([3, 4]),
            BTreeSet::from([5]),
        ])
    );
}

#[test]
fn contract_merges_parallel_arcs_and_drops_internal_ones() {
    let graph = graph_from(4, &[(0, 1), (1, 0), (0, 2), (1, 2), (2, 3)]);
    let condensation = StrongConnection::new(&graph).contract();

    assert_eq!(condensation.component_count(), 3);
    let top = condensation.component_of(&0).expect("0 has a component");
    let middle = condensation.component_of(&2).expect("2 has a component");
    let bottom = condensation.component_of(&3).expect("3 has a component");
    assert_eq!(condensation.component_of(&1), Some(top));

    let mut merged = condensation
        .graph()
        .get_arc(&top, &middle)
        .expect("cycle feeds 2")
        .clone();
    merged.sort_unstable();
    assert_eq!(merged, vec![(0, 2), (1, 2)]);
    assert_eq!(condensation.graph().get_arc(&middle, &bottom), Some(&vec![(2, 3)]));
    assert_eq!(condensation.graph().size(), 2);
    assert_eq!(condensation.members(middle), &[2]);
}

#[test]
fn lazy_iteration_then_contract_keeps_every_component() {
    let graph = graph_from(3, &[(0, 1), (1, 2)]);
    let mut connection = StrongConnection::new(&graph);
    let first = connection.next().expect("at least one component");
    assert_eq!(connection.component_of(&first[0]).map(ComponentId::index), Some(0));

    let condensation = connection.contract();
    assert_eq!(condensation.component_count(), 3);
    assert_eq!(condensation.graph().size(), 2);
}

#[test]
fn component_id_display() {
    assert_eq!(ComponentId(3).to_string(), "component#3");
}

fn arb_graph() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (1u32..14).prop_flat_map(|vertices| {
        (
            Just(vertices),
            prop::collection::vec((0..vertices, 0..vertices), 0..40),
        )
    })
}

fn arb_dag() -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    arb_graph().prop_map(|(vertices, arcs)| {
        let forward = arcs
            .into_iter()
            .filter(|(origin, destination)| origin < destination)
            .collect();

        (vertices, forward)
    })
}

proptest! {
    #[test]
    fn components_partition_by_mutual_reachability((vertices, arcs) in arb_graph()) {
        let graph = graph_from(vertices, &arcs);
        let components: Vec<Vec<u32>> = StrongConnection::new(&graph).collect();

        let mut owner = std::collections::HashMap::new();
        for (index, members) in components.iter().enumerate() {
            for member in members {
                prop_assert!(owner.insert(*member, index).is_none(), "vertex claimed twice");
            }
        }
        prop_assert_eq!(owner.len(), vertices as usize);

        let reach: Vec<BTreeSet<u32>> = (0..vertices).map(|v| reachable(&graph, v)).collect();
        for a in 0..vertices {
            for b in 0..vertices {
                let mutual = reach[a as usize].contains(&b) && reach[b as usize].contains(&a);
                prop_assert_eq!(owner[&a] == owner[&b], mutual);
            }
        }
    }

    #[test]
    fn condensation_is_acyclic((vertices, arcs) in arb_graph()) {
        let graph = graph_from(vertices, &arcs);
        let condensation = StrongConnection::new(&graph).contract();
        let order: Result<Vec<_>, CycleError> =
            IndegreeTopologicalSort::new(condensation.graph()).collect();

        prop_assert_eq!(order.map(|o| o.len()).ok(), Some(condensation.component_count()));
    }

    #[test]
    fn dag_contracts_to_singletons_one_to_one((vertices, arcs) in arb_dag()) {
        let graph = graph_from(vertices, &arcs);
        let condensation = StrongConnection::new(&graph).contract();

        prop_assert_eq!(condensation.component_count(), vertices as usize);
        prop_assert_eq!(condensation.graph().size(), graph.size());
        for (_, members) in condensation.components() {
            prop_assert_eq!(members.len(), 1);
        }
        for &(origin, destination) in &arcs {
            let from = condensation.component_of(&origin).expect("origin component");
            let to = condensation.component_of(&destination).expect("destination component");
            prop_assert_eq!(
                condensation.graph().get_arc(&from, &to),
                Some(&vec![(origin, destination)])
            );
        }
    }
}
