//! Settings arena and dependency graph
//!
//! A recipe's option settings form a tree. Instead of parent/child pointers
//! the tree is stored as an arena keyed by fully qualified id (the dotted
//! path from the root, e.g. `ECSCluster.ClusterArn`).
//!
//! `DependsOn` entries are forward edges from a setting to the setting whose
//! value controls it. The reverse mapping ("dependents") is computed once when
//! the tree is built and never changes afterwards.
//!
//! # Example
//!
//! ```
//! use deploy_core::tree::SettingsTree;
//! use deploy_meta::{OptionSettingItem, OptionSettingValueType, PropertyDependency};
//!
//! let create_new = OptionSettingItem::new("CreateNew", OptionSettingValueType::Bool);
//! let mut arn = OptionSettingItem::new("RoleArn", OptionSettingValueType::String);
//! arn.depends_on.push(PropertyDependency {
//!     id: "Role.CreateNew".to_string(),
//!     value: Some(serde_json::json!(false)),
//!     operation: None,
//! });
//! let mut role = OptionSettingItem::new("Role", OptionSettingValueType::Object);
//! role.child_option_settings = vec![create_new, arn];
//!
//! let tree = SettingsTree::build("Recipe", &[role]).unwrap();
//! let dependents: Vec<&str> = tree.dependents_of("Role.CreateNew").collect();
//! assert_eq!(dependents, vec!["Role.RoleArn"]);
//! ```

use std::collections::{BTreeSet, HashMap};

use deploy_meta::{OptionSettingItem, OptionSettingValueType};

use crate::error::{Error, Result};

/// One setting in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingNode {
    /// Dotted path from the root setting
    pub fully_qualified_id: String,
    /// Fully qualified id of the parent Object setting
    pub parent: Option<String>,
    /// Fully qualified ids of child settings, in declaration order
    pub children: Vec<String>,
    /// Setting metadata. `child_option_settings` is always empty here; the
    /// children live in the arena.
    pub item: OptionSettingItem,
}

impl SettingNode {
    /// Id of the setting, unique among its siblings.
    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn value_type(&self) -> OptionSettingValueType {
        self.item.value_type
    }

    pub fn is_object(&self) -> bool {
        self.item.value_type == OptionSettingValueType::Object
    }
}

/// Read-only arena of a recipe's settings plus the reverse dependency index.
#[derive(Debug, Clone, Default)]
pub struct SettingsTree {
    nodes: HashMap<String, SettingNode>,
    /// Root fully qualified ids, in declaration order
    roots: Vec<String>,
    /// Every fully qualified id in pre-order
    order: Vec<String>,
    /// Setting -> settings whose `DependsOn` references it
    dependents: HashMap<String, BTreeSet<String>>,
}

impl SettingsTree {
    /// Build the arena for a recipe's root settings and link dependents.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateSettingId` if two settings share a fully
    /// qualified id, and `Error::DependencyNotFound` if a `DependsOn` entry
    /// references a setting that does not exist.
    pub fn build(recipe_id: &str, settings: &[OptionSettingItem]) -> Result<Self> {
        let mut tree = Self::default();
        for item in settings {
            let fq_id = tree.insert(recipe_id, item, None)?;
            tree.roots.push(fq_id);
        }
        tree.link_dependents(recipe_id)?;
        Ok(tree)
    }

    fn insert(
        &mut self,
        recipe_id: &str,
        item: &OptionSettingItem,
        parent: Option<&str>,
    ) -> Result<String> {
        let fq_id = match parent {
            Some(parent) => format!("{parent}.{}", item.id),
            None => item.id.clone(),
        };
        if self.nodes.contains_key(&fq_id) {
            return Err(Error::DuplicateSettingId {
                recipe_id: recipe_id.to_string(),
                id: fq_id,
            });
        }

        let mut stripped = item.clone();
        stripped.child_option_settings = Vec::new();
        self.nodes.insert(
            fq_id.clone(),
            SettingNode {
                fully_qualified_id: fq_id.clone(),
                parent: parent.map(str::to_string),
                children: Vec::new(),
                item: stripped,
            },
        );
        self.order.push(fq_id.clone());

        let mut children = Vec::with_capacity(item.child_option_settings.len());
        for child in &item.child_option_settings {
            children.push(self.insert(recipe_id, child, Some(&fq_id))?);
        }
        if let Some(node) = self.nodes.get_mut(&fq_id) {
            node.children = children;
        }

        Ok(fq_id)
    }

    /// Walk every declared forward edge once and record the reverse edge.
    fn link_dependents(&mut self, recipe_id: &str) -> Result<()> {
        let mut dependents: HashMap<String, BTreeSet<String>> = HashMap::new();

        for fq_id in &self.order {
            let Some(node) = self.nodes.get(fq_id) else {
                continue;
            };
            for dependency in &node.item.depends_on {
                if !self.nodes.contains_key(&dependency.id) {
                    return Err(Error::DependencyNotFound {
                        recipe_id: recipe_id.to_string(),
                        setting_id: fq_id.clone(),
                        depends_on: dependency.id.clone(),
                    });
                }
                if dependency.id == *fq_id {
                    tracing::warn!(recipe_id, setting = %fq_id, "Ignoring setting that depends on itself");
                    continue;
                }
                dependents
                    .entry(dependency.id.clone())
                    .or_default()
                    .insert(fq_id.clone());
            }
        }

        self.dependents = dependents;
        Ok(())
    }

    /// Look up a setting by fully qualified id.
    pub fn get(&self, fully_qualified_id: &str) -> Option<&SettingNode> {
        self.nodes.get(fully_qualified_id)
    }

    pub fn contains(&self, fully_qualified_id: &str) -> bool {
        self.nodes.contains_key(fully_qualified_id)
    }

    /// Root settings in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = &SettingNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct children of a setting in declaration order.
    pub fn children(&self, fully_qualified_id: &str) -> impl Iterator<Item = &SettingNode> {
        self.nodes
            .get(fully_qualified_id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    /// Every setting in pre-order (parents before children).
    pub fn iter(&self) -> impl Iterator<Item = &SettingNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Settings whose visibility depends on the given setting, sorted by id.
    pub fn dependents_of(&self, fully_qualified_id: &str) -> impl Iterator<Item = &str> {
        self.dependents
            .get(fully_qualified_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Report `DependsOn` cycles.
    ///
    /// Each entry lists the fully qualified ids of one strongly connected
    /// component with more than one member, sorted. Cycles are tolerated by
    /// the resolver because dependents are never followed recursively.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut finder = CycleFinder {
            tree: self,
            index: 0,
            indices: HashMap::new(),
            low_links: HashMap::new(),
            stack: Vec::new(),
            on_stack: BTreeSet::new(),
            components: Vec::new(),
        };
        for fq_id in &self.order {
            if !finder.indices.contains_key(fq_id.as_str()) {
                finder.visit(fq_id);
            }
        }

        let mut cycles: Vec<Vec<String>> = finder
            .components
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|mut component| {
                component.sort();
                component
            })
            .collect();
        cycles.sort();
        cycles
    }

    fn forward_edges<'a>(&'a self, fully_qualified_id: &str) -> impl Iterator<Item = &'a str> {
        self.nodes
            .get(fully_qualified_id)
            .map(|node| node.item.depends_on.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|dependency| dependency.id.as_str())
            .filter(move |id| *id != fully_qualified_id)
    }
}

/// Tarjan's strongly connected components over the `DependsOn` edges.
struct CycleFinder<'a> {
    tree: &'a SettingsTree,
    index: usize,
    indices: HashMap<&'a str, usize>,
    low_links: HashMap<&'a str, usize>,
    stack: Vec<&'a str>,
    on_stack: BTreeSet<&'a str>,
    components: Vec<Vec<String>>,
}

impl<'a> CycleFinder<'a> {
    fn visit(&mut self, id: &'a str) {
        self.indices.insert(id, self.index);
        self.low_links.insert(id, self.index);
        self.index += 1;
        self.stack.push(id);
        self.on_stack.insert(id);

        let tree = self.tree;
        for next in tree.forward_edges(id) {
            if !self.indices.contains_key(next) {
                self.visit(next);
                let low = self.low_links[next].min(self.low_links[id]);
                self.low_links.insert(id, low);
            } else if self.on_stack.contains(next) {
                let low = self.indices[next].min(self.low_links[id]);
                self.low_links.insert(id, low);
            }
        }

        if self.low_links[id] == self.indices[id] {
            let mut component = Vec::new();
            while let Some(member) = self.stack.pop() {
                self.on_stack.remove(member);
                component.push(member.to_string());
                if member == id {
                    break;
                }
            }
            self.components.push(component);
        }
    }
}
