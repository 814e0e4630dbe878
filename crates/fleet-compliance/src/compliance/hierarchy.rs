use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::domain::{Entity, EntityId};

/// Contract violations detected while assembling a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("entity id '{0}' appears more than once")]
    DuplicateId(EntityId),
    #[error("entity '{entity}' references unknown parent '{parent}'")]
    MissingParent { entity: EntityId, parent: EntityId },
    #[error("entity '{entity}' is a {kind} and cannot have a parent")]
    ParentNotSupported { entity: EntityId, kind: &'static str },
    #[error("entity '{entity}' sits deeper than the {limit}-level hierarchy limit")]
    TooDeep { entity: EntityId, limit: usize },
}

/// What to do with an entity whose parent id matches no entity in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingParentPolicy {
    /// Promote the entity to a root.
    #[default]
    Root,
    /// Report the entity as an orphan.
    Orphan,
    /// Fail with [`HierarchyError::MissingParent`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    /// The entity's own id appears in its ancestor chain.
    Cycle,
    /// The ancestor chain loops without passing through the entity.
    AncestorCycle,
    MissingParent,
    /// The parent exists but is a different kind of entity.
    KindMismatch,
    /// Some ancestor was itself rejected.
    OrphanedAncestor,
}

impl OrphanReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cycle => "Cyclic parent reference",
            Self::AncestorCycle => "Ancestor is part of a cycle",
            Self::MissingParent => "Parent not found",
            Self::KindMismatch => "Parent is a different kind of entity",
            Self::OrphanedAncestor => "Ancestor was rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode<'a> {
    pub entity: &'a Entity,
    pub children: Vec<HierarchyNode<'a>>,
}

impl HierarchyNode<'_> {
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::depth)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan<'a> {
    pub entity: &'a Entity,
    pub reason: OrphanReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hierarchy<'a> {
    pub roots: Vec<HierarchyNode<'a>>,
    pub orphans: Vec<Orphan<'a>>,
}

impl<'a> Hierarchy<'a> {
    pub fn find(&self, id: &EntityId) -> Option<&HierarchyNode<'a>> {
        fn search<'n, 'a>(
            nodes: &'n [HierarchyNode<'a>],
            id: &EntityId,
        ) -> Option<&'n HierarchyNode<'a>> {
            for node in nodes {
                if &node.entity.id == id {
                    return Some(node);
                }
                if let Some(found) = search(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }

        search(&self.roots, id)
    }

    pub fn is_orphan(&self, id: &EntityId) -> bool {
        self.orphans.iter().any(|orphan| &orphan.entity.id == id)
    }
}

/// Deepest parent chain accepted by [`HierarchyBuilder`]; roots sit at depth 1.
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 256;

/// Placement decided for one input entity.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Root,
    Child { parent: usize, depth: usize },
    Orphan(OrphanReason),
}

impl Placement {
    fn depth(self) -> usize {
        match self {
            Self::Root => 1,
            Self::Child { depth, .. } => depth,
            Self::Orphan(_) => 0,
        }
    }

    /// Placement of an entity whose parent resolved to `self`.
    fn below(self, parent: usize) -> Self {
        match self {
            Self::Root | Self::Child { .. } => Self::Child {
                parent,
                depth: self.depth() + 1,
            },
            Self::Orphan(OrphanReason::Cycle | OrphanReason::AncestorCycle) => {
                Self::Orphan(OrphanReason::AncestorCycle)
            }
            Self::Orphan(_) => Self::Orphan(OrphanReason::OrphanedAncestor),
        }
    }
}

/// Outcome of the checks that only look at an entity and its direct parent.
#[derive(Debug, Clone, Copy)]
enum Link {
    Settled(Placement),
    Parent(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Done,
}

/// Assembles flat entity lists into a parent/child forest.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyBuilder {
    missing_parent: MissingParentPolicy,
    max_depth: usize,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new(MissingParentPolicy::default())
    }
}

impl HierarchyBuilder {
    pub fn new(missing_parent: MissingParentPolicy) -> Self {
        Self {
            missing_parent,
            max_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn build<'a>(&self, entities: &'a [Entity]) -> Result<Hierarchy<'a>, HierarchyError> {
        let index = index_by_id(entities)?;
        let links = entities
            .iter()
            .enumerate()
            .map(|(position, entity)| self.link(position, entity, entities, &index))
            .collect::<Result<Vec<_>, _>>()?;
        let placements = resolve(&links);

        if let Some(position) = placements
            .iter()
            .position(|placement| placement.depth() > self.max_depth)
        {
            return Err(HierarchyError::TooDeep {
                entity: entities[position].id.clone(),
                limit: self.max_depth,
            });
        }

        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); entities.len()];
        let mut roots = Vec::new();
        let mut orphans = Vec::new();

        for (position, placement) in placements.into_iter().enumerate() {
            match placement {
                Placement::Root => roots.push(position),
                Placement::Child { parent, .. } => children_of[parent].push(position),
                Placement::Orphan(reason) => {
                    debug!(
                        entity = %entities[position].id,
                        reason = reason.label(),
                        "hierarchy edge rejected"
                    );
                    orphans.push(Orphan {
                        entity: &entities[position],
                        reason,
                    });
                }
            }
        }

        let roots = roots
            .into_iter()
            .map(|position| assemble(position, entities, &children_of))
            .collect();

        Ok(Hierarchy { roots, orphans })
    }

    fn link(
        &self,
        position: usize,
        entity: &Entity,
        entities: &[Entity],
        index: &HashMap<&str, usize>,
    ) -> Result<Link, HierarchyError> {
        let Some(parent_id) = &entity.parent_id else {
            return Ok(Link::Settled(Placement::Root));
        };

        if !entity.kind.supports_parent() {
            return Err(HierarchyError::ParentNotSupported {
                entity: entity.id.clone(),
                kind: entity.kind.label(),
            });
        }

        let Some(&parent) = index.get(parent_id.as_str()) else {
            return match self.missing_parent {
                MissingParentPolicy::Root => Ok(Link::Settled(Placement::Root)),
                MissingParentPolicy::Orphan => Ok(Link::Settled(Placement::Orphan(
                    OrphanReason::MissingParent,
                ))),
                MissingParentPolicy::Reject => Err(HierarchyError::MissingParent {
                    entity: entity.id.clone(),
                    parent: parent_id.clone(),
                }),
            };
        };

        if parent == position {
            return Ok(Link::Settled(Placement::Orphan(OrphanReason::Cycle)));
        }

        if entities[parent].kind != entity.kind {
            return Ok(Link::Settled(Placement::Orphan(OrphanReason::KindMismatch)));
        }

        Ok(Link::Parent(parent))
    }
}

/// Resolves every parent chain with one walk per entity in total.
///
/// Each walk follows parent links until it reaches a settled entity or
/// re-enters its own path, then unwinds the path assigning placements.
fn resolve(links: &[Link]) -> Vec<Placement> {
    let mut visits = vec![Visit::Unvisited; links.len()];
    let mut placements = vec![Placement::Root; links.len()];
    let mut path: Vec<(usize, usize)> = Vec::new();

    for start in 0..links.len() {
        let mut current = start;
        let mut above = loop {
            match visits[current] {
                Visit::Done => break placements[current],
                Visit::OnPath => {
                    // The path re-entered itself: everything from `current` on is the loop.
                    if let Some(entry) =
                        path.iter().position(|(position, _)| *position == current)
                    {
                        for (member, _) in path.drain(entry..) {
                            visits[member] = Visit::Done;
                            placements[member] = Placement::Orphan(OrphanReason::Cycle);
                        }
                    }
                    break Placement::Orphan(OrphanReason::Cycle);
                }
                Visit::Unvisited => match links[current] {
                    Link::Settled(placement) => {
                        visits[current] = Visit::Done;
                        placements[current] = placement;
                        break placement;
                    }
                    Link::Parent(parent) => {
                        visits[current] = Visit::OnPath;
                        path.push((current, parent));
                        current = parent;
                    }
                },
            }
        };

        while let Some((position, parent)) = path.pop() {
            let placement = above.below(parent);
            visits[position] = Visit::Done;
            placements[position] = placement;
            above = placement;
        }
    }

    placements
}

fn index_by_id(entities: &[Entity]) -> Result<HashMap<&str, usize>, HierarchyError> {
    let mut index = HashMap::with_capacity(entities.len());
    for (position, entity) in entities.iter().enumerate() {
        if index.insert(entity.id.as_str(), position).is_some() {
            return Err(HierarchyError::DuplicateId(entity.id.clone()));
        }
    }
    Ok(index)
}

fn assemble<'a>(
    position: usize,
    entities: &'a [Entity],
    children_of: &[Vec<usize>],
) -> HierarchyNode<'a> {
    HierarchyNode {
        entity: &entities[position],
        children: children_of[position]
            .iter()
            .map(|child| assemble(*child, entities, children_of))
            .collect(),
    }
}
