use crate::model::{RelationshipModel, TableName};

///
/// AttributeModel
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeModel {
    pub name: String,
    pub primary_key: bool,
}

///
/// TableModel
/// Runtime metadata for one persistent table.
///

#[derive(Clone, Debug)]
pub struct TableModel {
    /// Unique table name; the sorter's identity for the table.
    pub name: TableName,
    /// Column list; primary-key columns are flagged.
    pub attributes: Vec<AttributeModel>,
    /// Outgoing relationships, in declaration order.
    pub relationships: Vec<RelationshipModel>,
}

impl TableModel {
    #[must_use]
    pub fn new(name: impl Into<TableName>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    #[must_use]
    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeModel {
            name: name.into(),
            primary_key: true,
        });
        self
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(AttributeModel {
            name: name.into(),
            primary_key: false,
        });
        self
    }

    #[must_use]
    pub fn relationship(mut self, relationship: RelationshipModel) -> Self {
        self.relationships.push(relationship);
        self
    }

    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeModel> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    #[must_use]
    pub fn is_primary_key(&self, name: &str) -> bool {
        self.get_attribute(name)
            .is_some_and(|attribute| attribute.primary_key)
    }
}
