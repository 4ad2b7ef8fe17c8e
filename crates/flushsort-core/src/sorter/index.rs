use crate::{
    error::{MetadataError, SortError},
    model::{RelationshipModel, SchemaProvider, TableModel, TableName},
};
use flushsort_graph::{
    ComponentId, Digraph, DigraphView, IndegreeTopologicalSort, StrongConnection,
};
use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashMap},
};

///
/// ComponentRecord
///
/// Position of one table in the published order. Tables sharing a
/// component are mutually dependent and rank equally.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ComponentRecord {
    pub rank: usize,
    pub component: ComponentId,
}

///
/// IndexStats
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndexStats {
    pub tables: usize,
    pub components: usize,
    pub arcs: usize,
}

///
/// SorterIndex
///
/// Immutable table ordering built from one schema snapshot. Published
/// behind an `Arc` and never mutated afterwards.
///

#[derive(Debug, Default)]
pub struct SorterIndex {
    generation: u64,
    records: HashMap<TableName, ComponentRecord>,
    reflexive: HashMap<TableName, Vec<RelationshipModel>>,
    stats: IndexStats,
}

impl SorterIndex {
    /// Placeholder published before the first successful build.
    #[must_use]
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// Build the referential digraph for `schema` and rank its
    /// components. Every metadata problem is collected before failing.
    pub(crate) fn build(schema: &dyn SchemaProvider, generation: u64) -> Result<Self, SortError> {
        let mut problems = Vec::new();
        let mut by_name: HashMap<&str, &TableModel> = HashMap::new();
        let mut graph: Digraph<TableName, BTreeSet<String>> = Digraph::new();

        for table in schema.tables() {
            if by_name.insert(table.name.as_str(), table).is_some() {
                problems.push(MetadataError::DuplicateTable {
                    table: table.name.clone(),
                });
            }
            graph.add_vertex(table.name.clone());
        }

        let mut reflexive: HashMap<TableName, Vec<RelationshipModel>> = HashMap::new();
        for table in schema.tables() {
            for relationship in &table.relationships {
                let checked = check_relationship(&by_name, table, relationship, &mut problems);
                let Some(target) = checked else {
                    continue;
                };
                if !relationship.is_dependency() {
                    continue;
                }

                let mut recorded = false;
                for join in &relationship.joins {
                    if !target.is_primary_key(&join.target) {
                        continue;
                    }

                    // target row must be written before the source row
                    graph
                        .arc_or_insert_with(target.name.clone(), table.name.clone(), BTreeSet::new)
                        .insert(join.target.clone());

                    if !recorded && relationship.is_reflexive_for(&table.name) {
                        reflexive
                            .entry(table.name.clone())
                            .or_default()
                            .push(relationship.clone());
                        recorded = true;
                    }
                }
            }
        }

        if !problems.is_empty() {
            return Err(SortError::metadata(problems));
        }

        let condensation = StrongConnection::new(&graph).contract();

        let mut ranks: HashMap<ComponentId, usize> =
            HashMap::with_capacity(condensation.component_count());
        for (rank, component) in IndegreeTopologicalSort::new(condensation.graph()).enumerate() {
            let component = component.map_err(|err| {
                SortError::index_internal(format!("table condensation is not acyclic: {err}"))
            })?;
            ranks.insert(*component, rank);
        }

        let mut records = HashMap::with_capacity(graph.order());
        for (component, members) in condensation.components() {
            let rank = ranks.get(&component).copied().ok_or_else(|| {
                SortError::index_internal(format!("{component} was never ranked"))
            })?;
            for table in members {
                records.insert(table.clone(), ComponentRecord { rank, component });
            }
        }

        Ok(Self {
            generation,
            records,
            reflexive,
            stats: IndexStats {
                tables: graph.order(),
                components: condensation.component_count(),
                arcs: graph.size(),
            },
        })
    }

    /// Successful rebuilds published before (and including) this one.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn stats(&self) -> IndexStats {
        self.stats
    }

    #[must_use]
    pub fn record(&self, table: &str) -> Option<ComponentRecord> {
        self.records.get(table).copied()
    }

    #[must_use]
    pub fn rank(&self, table: &str) -> Option<usize> {
        self.record(table).map(|record| record.rank)
    }

    #[must_use]
    pub fn component(&self, table: &str) -> Option<ComponentId> {
        self.record(table).map(|record| record.component)
    }

    /// Insert-order comparison of two tables.
    ///
    /// Members of one component compare equal. Tables unknown to this
    /// index sort before every known table and equal to each other.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.record(a), self.record(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) if a.component == b.component => Ordering::Equal,
            (Some(a), Some(b)) => a.rank.cmp(&b.rank),
        }
    }

    #[must_use]
    pub fn is_reflexive(&self, table: &str) -> bool {
        self.reflexive.contains_key(table)
    }

    /// Reflexive relationships of `table`, in declaration order.
    #[must_use]
    pub fn reflexive_relationships(&self, table: &str) -> &[RelationshipModel] {
        self.reflexive
            .get(table)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// check_relationship
// validates one relationship and returns its target table when usable
fn check_relationship<'s>(
    by_name: &HashMap<&str, &'s TableModel>,
    table: &TableModel,
    relationship: &RelationshipModel,
    problems: &mut Vec<MetadataError>,
) -> Option<&'s TableModel> {
    let Some(target) = by_name.get(relationship.target.as_str()).copied() else {
        problems.push(MetadataError::UnknownTargetTable {
            table: table.name.clone(),
            relationship: relationship.name.clone(),
            target: relationship.target.clone(),
        });
        return None;
    };

    if relationship.joins.is_empty() {
        problems.push(MetadataError::EmptyJoins {
            table: table.name.clone(),
            relationship: relationship.name.clone(),
        });
        return None;
    }

    let before = problems.len();
    for join in &relationship.joins {
        for (owner, attribute) in [(table, &join.source), (target, &join.target)] {
            if owner.get_attribute(attribute).is_none() {
                problems.push(MetadataError::UnknownJoinAttribute {
                    table: table.name.clone(),
                    relationship: relationship.name.clone(),
                    owner: owner.name.clone(),
                    attribute: attribute.clone(),
                });
            }
        }
    }

    (problems.len() == before).then_some(target)
}

///
/// TESTS
///
