use serde::{Deserialize, Serialize};

use super::domain::{Discipline, InterestPriority};

/// Errors raised while editing a ranked interest list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriorityError {
    #[error("interest `{0}` is already ranked")]
    DuplicateInterest(Discipline),
    #[error("interest `{0}` is not ranked")]
    NotFound(Discipline),
    #[error("interest `{discipline}` has priority {priority}; priorities start at 1")]
    InvalidPriority { discipline: Discipline, priority: u32 },
    #[error("priority {0} is assigned to more than one interest")]
    DuplicatePriority(u32),
}

/// Direction for [`InterestList::move_interest`]; `Up` means towards priority 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// A student's interests ranked 1..N with no gaps and no duplicates.
///
/// Array order and priority order always agree: the entry at index `i` has priority `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterestList {
    entries: Vec<InterestPriority>,
}

impl InterestList {
    /// Build from explicit `(discipline, priority)` pairs. Gaps are compacted; zero or
    /// repeated priorities and repeated disciplines are rejected.
    pub fn from_ranked<I>(pairs: I) -> Result<Self, PriorityError>
    where
        I: IntoIterator<Item = (Discipline, u32)>,
    {
        let mut ranked: Vec<(Discipline, u32)> = Vec::new();

        for (discipline, priority) in pairs {
            if priority == 0 {
                return Err(PriorityError::InvalidPriority {
                    discipline,
                    priority,
                });
            }
            if ranked.iter().any(|(existing, _)| *existing == discipline) {
                return Err(PriorityError::DuplicateInterest(discipline));
            }
            if ranked.iter().any(|(_, existing)| *existing == priority) {
                return Err(PriorityError::DuplicatePriority(priority));
            }
            ranked.push((discipline, priority));
        }

        ranked.sort_by_key(|(_, priority)| *priority);

        let mut list = Self::default();
        for (discipline, _) in ranked {
            list.push(discipline);
        }
        Ok(list)
    }

    /// Append a new interest at the lowest priority.
    pub fn add_interest(&mut self, discipline: Discipline) -> Result<u32, PriorityError> {
        if self.contains(&discipline) {
            return Err(PriorityError::DuplicateInterest(discipline));
        }
        Ok(self.push(discipline))
    }

    /// Remove an interest and close the gap it leaves.
    pub fn remove_interest(&mut self, discipline: &Discipline) -> Result<(), PriorityError> {
        let index = self
            .position(discipline)
            .ok_or_else(|| PriorityError::NotFound(discipline.clone()))?;
        self.entries.remove(index);
        self.renumber();
        Ok(())
    }

    /// Swap with the neighbour in `direction`. Moving past either end is a no-op.
    pub fn move_interest(
        &mut self,
        discipline: &Discipline,
        direction: MoveDirection,
    ) -> Result<(), PriorityError> {
        let index = self
            .position(discipline)
            .ok_or_else(|| PriorityError::NotFound(discipline.clone()))?;

        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.entries.len() => index + 1,
            _ => return Ok(()),
        };

        self.entries.swap(index, target);
        self.renumber();
        Ok(())
    }

    pub fn priority_of(&self, discipline: &Discipline) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.discipline == *discipline)
            .map(|entry| entry.priority)
    }

    pub fn contains(&self, discipline: &Discipline) -> bool {
        self.position(discipline).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InterestPriority> {
        self.entries.iter()
    }

    pub fn disciplines(&self) -> impl Iterator<Item = &Discipline> {
        self.entries.iter().map(|entry| &entry.discipline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invariant check: priorities are exactly 1..=N in array order.
    pub fn is_contiguous(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, entry)| entry.priority as usize == index + 1)
    }

    fn push(&mut self, discipline: Discipline) -> u32 {
        let priority = self.entries.len() as u32 + 1;
        self.entries.push(InterestPriority {
            discipline,
            priority,
        });
        priority
    }

    fn position(&self, discipline: &Discipline) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.discipline == *discipline)
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.priority = index as u32 + 1;
        }
    }
}

impl<'a> IntoIterator for &'a InterestList {
    type Item = &'a InterestPriority;
    type IntoIter = std::slice::Iter<'a, InterestPriority>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
