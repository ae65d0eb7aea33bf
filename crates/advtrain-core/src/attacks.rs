//! Ordered (attack, configuration) pairs.

use crate::model::{Attack, AttackRef};
use crate::params::Params;
use std::fmt;
use std::rc::Rc;

/// One configured attack.
#[derive(Clone)]
pub struct AttackSpec {
    pub attack: AttackRef,
    pub params: Params,
}

impl AttackSpec {
    pub fn new(attack: AttackRef, params: Params) -> Self {
        Self { attack, params }
    }

    pub fn name(&self) -> &str {
        self.attack.name()
    }
}

impl fmt::Debug for AttackSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackSpec")
            .field("attack", &self.attack.name())
            .field("params", &self.params)
            .finish()
    }
}

/// Attacks in processing order, one entry per distinct attack instance.
///
/// Identity is the shared instance, not the name: two separately built
/// attacks with the same name are two entries. Adding an instance that is
/// already present keeps its position and replaces its configuration.
#[derive(Debug, Clone, Default)]
pub struct AttackSet {
    specs: Vec<AttackSpec>,
}

impl AttackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attack: AttackRef, params: Params) {
        match self
            .specs
            .iter_mut()
            .find(|spec| Rc::ptr_eq(&spec.attack, &attack))
        {
            Some(existing) => existing.params = params,
            None => self.specs.push(AttackSpec::new(attack, params)),
        }
    }

    pub fn with(mut self, attack: AttackRef, params: Params) -> Self {
        self.insert(attack, params);
        self
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttackSpec> {
        self.specs.iter()
    }

    /// Configuration for `attack`, if it is in the set.
    pub fn params_for(&self, attack: &AttackRef) -> Option<&Params> {
        self.specs
            .iter()
            .find(|spec| Rc::ptr_eq(&spec.attack, attack))
            .map(|spec| &spec.params)
    }
}

impl<'a> IntoIterator for &'a AttackSet {
    type Item = &'a AttackSpec;
    type IntoIter = std::slice::Iter<'a, AttackSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}

/// A single attack runs with an empty configuration.
impl From<AttackRef> for AttackSet {
    fn from(attack: AttackRef) -> Self {
        Self::new().with(attack, Params::new())
    }
}

impl<A: Attack + 'static> From<Rc<A>> for AttackSet {
    fn from(attack: Rc<A>) -> Self {
        AttackSet::from(attack as AttackRef)
    }
}

/// Each listed attack runs with an empty configuration.
impl From<Vec<AttackRef>> for AttackSet {
    fn from(attacks: Vec<AttackRef>) -> Self {
        attacks.into_iter().collect()
    }
}

impl From<Vec<(AttackRef, Params)>> for AttackSet {
    fn from(pairs: Vec<(AttackRef, Params)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl FromIterator<AttackRef> for AttackSet {
    fn from_iter<I: IntoIterator<Item = AttackRef>>(iter: I) -> Self {
        iter.into_iter()
            .map(|attack| (attack, Params::new()))
            .collect()
    }
}

impl FromIterator<(AttackRef, Params)> for AttackSet {
    fn from_iter<I: IntoIterator<Item = (AttackRef, Params)>>(iter: I) -> Self {
        let mut set = AttackSet::new();
        for (attack, params) in iter {
            set.insert(attack, params);
        }
        set
    }
}
