//! Rigid groups of joined pieces.

use std::collections::{BTreeMap, BTreeSet};

use jigsaw_core::{GridPos, GridSize, Rotation};
use serde::{Deserialize, Serialize};

/// Identifier of a [`Group`], unique within a [`GroupRegistry`].
///
/// Ids are assigned in increasing order and never reused.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
pub struct GroupId(u32);

impl GroupId {
    /// Raw id value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Pieces that move and rotate together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    id: GroupId,
    members: BTreeSet<GridPos>,
    rotation: Rotation,
}

impl Group {
    /// The group's id.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Member pieces, in grid order.
    #[must_use]
    pub fn members(&self) -> &BTreeSet<GridPos> {
        &self.members
    }

    /// Number of member pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`; empty groups are removed from the registry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if `pos` is a member.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        self.members.contains(&pos)
    }

    /// Rotation shared by every member.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

/// The partition of all pieces into groups.
///
/// Every piece of the grid belongs to exactly one group at all times; this
/// holds after construction and after every mutation.
///
/// # Examples
///
/// ```
/// use jigsaw_core::{GridPos, GridSize};
/// use jigsaw_game::GroupRegistry;
///
/// let mut groups = GroupRegistry::new(GridSize::new(2, 2));
/// assert_eq!(groups.len(), 4);
///
/// let a = groups.lookup(GridPos::new(0, 0)).unwrap();
/// let b = groups.lookup(GridPos::new(1, 0)).unwrap();
/// let merged = groups.merge(a, b);
/// assert_eq!(groups.len(), 3);
/// assert_eq!(groups.get(merged).unwrap().len(), 2);
/// assert_eq!(groups.lookup(GridPos::new(1, 0)), Some(merged));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRegistry {
    grid: GridSize,
    groups: BTreeMap<GroupId, Group>,
    piece_to_group: Vec<GroupId>,
    next_id: u32,
}

impl GroupRegistry {
    /// Creates a registry where every piece is alone in its own group.
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        let mut this = Self {
            grid,
            groups: BTreeMap::new(),
            piece_to_group: Vec::with_capacity(grid.len()),
            next_id: 0,
        };
        for pos in grid.positions() {
            let id = this.allocate_id();
            this.groups.insert(
                id,
                Group {
                    id,
                    members: BTreeSet::from([pos]),
                    rotation: Rotation::R0,
                },
            );
            this.piece_to_group.push(id);
        }
        this
    }

    fn allocate_id(&mut self) -> GroupId {
        let id = GroupId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Grid the registry covers.
    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always `false`; a grid has at least four pieces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates over the groups in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.values()
    }

    /// Returns the group with `id`, if it still exists.
    #[must_use]
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Returns the group containing `pos`, or `None` if `pos` is outside the grid.
    #[must_use]
    pub fn lookup(&self, pos: GridPos) -> Option<GroupId> {
        let index = self.grid.index_of(pos)?;
        self.piece_to_group.get(index).copied()
    }

    /// Returns the group containing `pos`.
    #[must_use]
    pub fn group_of(&self, pos: GridPos) -> Option<&Group> {
        self.lookup(pos).and_then(|id| self.get(id))
    }

    /// Moves `members` into a new group sharing `rotation`.
    ///
    /// Members are taken out of their current groups; groups left empty are
    /// removed. Positions outside the grid are ignored. Returns `None` if no
    /// member was valid.
    pub fn create_group<I>(&mut self, members: I, rotation: Rotation) -> Option<GroupId>
    where
        I: IntoIterator<Item = GridPos>,
    {
        let members: BTreeSet<GridPos> = members
            .into_iter()
            .filter(|pos| self.grid.contains(*pos))
            .collect();
        if members.is_empty() {
            return None;
        }
        let id = self.allocate_id();
        for pos in &members {
            self.detach(*pos);
            if let Some(index) = self.grid.index_of(*pos) {
                self.piece_to_group[index] = id;
            }
        }
        self.groups.insert(
            id,
            Group {
                id,
                members,
                rotation,
            },
        );
        debug_assert!(self.is_consistent());
        Some(id)
    }

    fn detach(&mut self, pos: GridPos) {
        let Some(old) = self.lookup(pos) else {
            return;
        };
        if let Some(group) = self.groups.get_mut(&old) {
            group.members.remove(&pos);
            if group.members.is_empty() {
                self.groups.remove(&old);
            }
        }
    }

    /// Merges group `b` into group `a` and returns the surviving id.
    ///
    /// Merging a group with itself, or with a group that no longer exists,
    /// leaves the registry unchanged.
    pub fn merge(&mut self, a: GroupId, b: GroupId) -> GroupId {
        if a == b || !self.groups.contains_key(&a) {
            return a;
        }
        let Some(absorbed) = self.groups.remove(&b) else {
            return a;
        };
        for pos in &absorbed.members {
            if let Some(index) = self.grid.index_of(*pos) {
                self.piece_to_group[index] = a;
            }
        }
        if let Some(group) = self.groups.get_mut(&a) {
            group.members.extend(absorbed.members);
        }
        debug_assert!(self.is_consistent());
        a
    }

    pub(crate) fn set_rotation(&mut self, id: GroupId, rotation: Rotation) {
        if let Some(group) = self.groups.get_mut(&id) {
            group.rotation = rotation;
        }
    }

    /// Returns `true` if every piece is in exactly one group and the reverse
    /// lookup agrees with group membership.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.piece_to_group.len() != self.grid.len() {
            return false;
        }
        let total: usize = self.groups.values().map(Group::len).sum();
        total == self.grid.len()
            && self.groups.values().all(|group| {
                !group.is_empty()
                    && group
                        .members
                        .iter()
                        .all(|pos| self.lookup(*pos) == Some(group.id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: u16, y: u16) -> GridPos {
        GridPos::new(x, y)
    }

    #[test]
    fn test_new_registry_has_singletons() {
        let groups = GroupRegistry::new(GridSize::new(3, 2));
        assert_eq!(groups.len(), 6);
        assert!(groups.is_consistent());
        assert!(groups.iter().all(|g| g.len() == 1));
        assert_eq!(groups.lookup(pos(3, 0)), None);
    }

    #[test]
    fn test_merge_is_union_and_removes_absorbed_group() {
        let mut groups = GroupRegistry::new(GridSize::new(2, 2));
        let a = groups.lookup(pos(0, 0)).unwrap();
        let b = groups.lookup(pos(0, 1)).unwrap();
        let c = groups.lookup(pos(1, 1)).unwrap();
        let ab = groups.merge(a, b);
        let abc = groups.merge(c, ab);
        assert_eq!(abc, c);
        assert!(groups.get(ab).is_none());
        let members: Vec<_> = groups.get(abc).unwrap().members().iter().copied().collect();
        assert_eq!(members, [pos(0, 0), pos(0, 1), pos(1, 1)]);
        assert!(groups.is_consistent());
    }

    #[test]
    fn test_merge_with_self_is_noop() {
        let mut groups = GroupRegistry::new(GridSize::new(2, 2));
        let a = groups.lookup(pos(1, 0)).unwrap();
        let before = groups.clone();
        assert_eq!(groups.merge(a, a), a);
        assert_eq!(groups, before);
    }

    #[test]
    fn test_create_group_takes_members_from_old_groups() {
        let mut groups = GroupRegistry::new(GridSize::new(3, 3));
        let first = groups
            .create_group([pos(0, 0), pos(1, 0), pos(2, 0)], Rotation::R90)
            .unwrap();
        let second = groups.create_group([pos(2, 0), pos(2, 1)], Rotation::R0).unwrap();
        assert!(second > first);
        assert_eq!(groups.get(first).unwrap().len(), 2);
        assert_eq!(groups.get(first).unwrap().rotation(), Rotation::R90);
        assert_eq!(groups.lookup(pos(2, 0)), Some(second));
        assert_eq!(groups.len(), 9 - 3 - 1 + 2);
        assert!(groups.is_consistent());
        assert_eq!(groups.create_group([pos(5, 5)], Rotation::R0), None);
    }
}
