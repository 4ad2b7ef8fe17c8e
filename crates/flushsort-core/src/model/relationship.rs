use crate::model::TableName;

///
/// JoinModel
///
/// One (source column, target column) pair of a relationship.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinModel {
    pub source: String,
    pub target: String,
}

///
/// RelationshipModel
/// Directed relationship from the owning table to `target`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelationshipModel {
    /// Name used to read the relationship off a live object.
    pub name: String,
    pub target: TableName,
    /// Join pairs, in declaration order.
    pub joins: Vec<JoinModel>,
    pub to_many: bool,
    /// The target's primary key is derived from this table's key.
    pub to_dependent_pk: bool,
    /// This table's primary key is derived from the target's key.
    pub to_master_pk: bool,
}

impl RelationshipModel {
    #[must_use]
    pub fn to_one(name: impl Into<String>, target: impl Into<TableName>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            joins: Vec::new(),
            to_many: false,
            to_dependent_pk: false,
            to_master_pk: false,
        }
    }

    #[must_use]
    pub fn to_many(name: impl Into<String>, target: impl Into<TableName>) -> Self {
        Self {
            to_many: true,
            ..Self::to_one(name, target)
        }
    }

    #[must_use]
    pub fn join(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.joins.push(JoinModel {
            source: source.into(),
            target: target.into(),
        });
        self
    }

    #[must_use]
    pub const fn dependent_pk(mut self) -> Self {
        self.to_dependent_pk = true;
        self
    }

    #[must_use]
    pub const fn master_pk(mut self) -> Self {
        self.to_master_pk = true;
        self
    }

    /// Whether this relationship can make the target row a prerequisite of
    /// the source row.
    ///
    /// Plain to-one relationships qualify unless they point at a dependent
    /// primary key; relationships flagged as deriving this table's key from
    /// the target qualify regardless of cardinality.
    #[must_use]
    pub const fn is_dependency(&self) -> bool {
        (!self.to_many && !self.to_dependent_pk) || self.to_master_pk
    }

    #[must_use]
    pub fn is_reflexive_for(&self, table: &str) -> bool {
        self.target.as_str() == table
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_rule_follows_the_three_flags() {
        let plain = RelationshipModel::to_one("customer", "CUSTOMER");
        let dependent = RelationshipModel::to_one("detail", "DETAIL").dependent_pk();
        let children = RelationshipModel::to_many("lines", "ORDER_LINE");
        let extension_master = RelationshipModel::to_many("base", "BASE").master_pk();
        let one_master = RelationshipModel::to_one("base", "BASE").master_pk();

        assert!(plain.is_dependency());
        assert!(!dependent.is_dependency());
        assert!(!children.is_dependency());
        assert!(extension_master.is_dependency());
        assert!(one_master.is_dependency());
    }

    #[test]
    fn builder_keeps_join_order() {
        let relationship = RelationshipModel::to_one("parent", "NODE")
            .join("PARENT_A", "A")
            .join("PARENT_B", "B");

        let sources: Vec<&str> = relationship
            .joins
            .iter()
            .map(|join| join.source.as_str())
            .collect();
        assert_eq!(sources, vec!["PARENT_A", "PARENT_B"]);
        assert!(relationship.is_reflexive_for("NODE"));
    }
}
