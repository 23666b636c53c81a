use std::collections::{HashMap, HashSet};

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QuerySelect};

use crate::entities::category;

/// Index over the `(id, parent)` links of the category table.
#[derive(Debug, Default, Clone)]
pub struct CategoryTree {
    parents: HashMap<i64, i64>,
}

impl CategoryTree {
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = (i64, Option<i64>)>,
    {
        let mut tree = Self::default();
        for (id, parent) in links {
            if let Some(parent) = parent {
                tree.parents.insert(id, parent);
            }
        }
        tree
    }

    pub async fn load<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let links: Vec<(i64, Option<i64>)> = category::Entity::find()
            .select_only()
            .column(category::Column::Id)
            .column(category::Column::ParentCategoryId)
            .into_tuple()
            .all(db)
            .await?;
        Ok(Self::from_links(links))
    }

    pub fn parent(&self, id: i64) -> Option<i64> {
        self.parents.get(&id).copied()
    }

    /// Walks up from `id`, nearest parent first. Stops if stored data
    /// already contains a loop.
    pub fn ancestors(&self, id: i64) -> Vec<i64> {
        let mut seen = HashSet::from([id]);
        let mut out = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if !seen.insert(parent) {
                break;
            }
            out.push(parent);
            current = parent;
        }
        out
    }

    /// True when giving `id` the parent `new_parent` would make `id` its own
    /// ancestor.
    pub fn would_create_cycle(&self, id: i64, new_parent: i64) -> bool {
        new_parent == id || self.ancestors(new_parent).contains(&id)
    }
}
