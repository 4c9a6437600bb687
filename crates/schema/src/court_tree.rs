// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{Court, Id};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CourtTreeError {
    #[error("No courts to build a tree from")]
    Empty,
    #[error("Court `{0}` appears more than once")]
    DuplicateCourt(Id),
    #[error("Expected exactly one root court, found {0:?}")]
    RootCount(Vec<Id>),
    #[error("Court `{court}` references unknown parent `{parent}`")]
    UnknownParent { court: Id, parent: Id },
    #[error("Court `{court}` lists child `{child}` more than once")]
    DuplicateChild { court: Id, child: Id },
    #[error("Court `{court}` lists unknown child `{child}`")]
    UnknownChild { court: Id, child: Id },
    #[error("Court `{0}` is part of a parent cycle")]
    Cycle(Id),
    #[error("Court `{child}` has parent `{parent}` but `{parent}` does not list it as a child")]
    ChildNotListed { parent: Id, child: Id },
    #[error("Court `{parent}` lists `{child}` as a child but its parent is {actual:?}")]
    ChildWithOtherParent {
        parent: Id,
        child: Id,
        actual: Option<Id>,
    },
}

/// Validated view over the court hierarchy.
///
/// Built from a flat list of courts, as returned by a `courts` query. The
/// constructor rejects anything that is not a single rooted tree whose
/// `parent` and `childs` references agree.
#[derive(Debug, Clone)]
pub struct CourtTree {
    courts: Vec<Court>,
    index: HashMap<Id, usize>,
    root: usize,
}

impl CourtTree {
    pub fn new(courts: Vec<Court>) -> Result<Self, CourtTreeError> {
        if courts.is_empty() {
            return Err(CourtTreeError::Empty);
        }

        let mut index = HashMap::with_capacity(courts.len());
        for (position, court) in courts.iter().enumerate() {
            if index.insert(court.id.clone(), position).is_some() {
                return Err(CourtTreeError::DuplicateCourt(court.id.clone()));
            }
        }

        let roots: Vec<_> = courts.iter().filter(|c| c.is_root()).collect();
        let root = match roots.as_slice() {
            [root] => index[&root.id],
            _ => {
                return Err(CourtTreeError::RootCount(
                    roots.iter().map(|c| c.id.clone()).collect(),
                ))
            }
        };

        for court in &courts {
            if let Some(parent) = &court.parent {
                let parent_court = index
                    .get(&parent.id)
                    .map(|&position| &courts[position])
                    .ok_or_else(|| CourtTreeError::UnknownParent {
                        court: court.id.clone(),
                        parent: parent.id.clone(),
                    })?;
                if !parent_court.children.iter().any(|c| c.id == court.id) {
                    return Err(CourtTreeError::ChildNotListed {
                        parent: parent.id.clone(),
                        child: court.id.clone(),
                    });
                }
            }
            let mut listed = HashSet::with_capacity(court.children.len());
            for child in &court.children {
                if !listed.insert(&child.id) {
                    return Err(CourtTreeError::DuplicateChild {
                        court: court.id.clone(),
                        child: child.id.clone(),
                    });
                }
                let child_court = index
                    .get(&child.id)
                    .map(|&position| &courts[position])
                    .ok_or_else(|| CourtTreeError::UnknownChild {
                        court: court.id.clone(),
                        child: child.id.clone(),
                    })?;
                let actual = child_court.parent.as_ref().map(|p| p.id.clone());
                if actual.as_ref() != Some(&court.id) {
                    return Err(CourtTreeError::ChildWithOtherParent {
                        parent: court.id.clone(),
                        child: child.id.clone(),
                        actual,
                    });
                }
            }
        }

        let tree = Self {
            courts,
            index,
            root,
        };

        // Any walk towards the root longer than the number of courts revisits a court.
        let limit = tree.courts.len();
        for court in &tree.courts {
            let mut hops = 0;
            let mut current = court;
            while let Some(parent) = tree.parent(current.id.as_str()) {
                hops += 1;
                if hops > limit {
                    return Err(CourtTreeError::Cycle(court.id.clone()));
                }
                current = parent;
            }
        }

        tracing::debug!(courts = tree.courts.len(), "Court tree validated");
        Ok(tree)
    }

    pub fn root(&self) -> &Court {
        &self.courts[self.root]
    }

    pub fn len(&self) -> usize {
        self.courts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Court> {
        self.index.get(id).map(|&position| &self.courts[position])
    }

    pub fn parent(&self, id: &str) -> Option<&Court> {
        self.get(id)?
            .parent
            .as_ref()
            .and_then(|parent| self.get(parent.id.as_str()))
    }

    /// Children in the order the parent lists them.
    pub fn children(&self, id: &str) -> Vec<&Court> {
        self.get(id)
            .map(|court| {
                court
                    .children
                    .iter()
                    .filter_map(|child| self.get(child.id.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Path from the court's parent up to the root.
    pub fn ancestors(&self, id: &str) -> Vec<&Court> {
        std::iter::successors(self.parent(id), |court| self.parent(court.id.as_str())).collect()
    }

    pub fn depth(&self, id: &str) -> Option<usize> {
        self.get(id).map(|_| self.ancestors(id).len())
    }

    /// Pre-order traversal starting at the root, paired with each court's depth.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Court)> + '_ {
        let mut stack = vec![(0, self.root())];
        std::iter::from_fn(move || {
            let (depth, court) = stack.pop()?;
            for child in self.children(court.id.as_str()).into_iter().rev() {
                stack.push((depth + 1, child));
            }
            Some((depth, court))
        })
    }

    pub fn into_courts(self) -> Vec<Court> {
        self.courts
    }
}
