//! Quota backfill.
//!
//! Fills free term capacity with category placeholders until every quota is
//! met, then pads what is left with [`OPEN_SLOT`](crate::models::OPEN_SLOT)
//! units. Only terms from the cursor onward are touched; earlier terms
//! belong to the student's past.

use crate::models::{Category, CategoryTally, Schedule, ScheduledCourse, TermSlot};

/// Result of quota backfill.
#[derive(Debug, Clone)]
pub struct Backfill {
    /// Schedule with free capacity filled.
    pub schedule: Schedule,
    /// Placeholders per category, assigned and backfilled together.
    pub assigned: CategoryTally,
    /// Quota the horizon could not absorb. Empty when every quota was met.
    pub outstanding: CategoryTally,
}

/// Backfills placeholders for unmet category quotas.
///
/// For each term of the horizon, while the term is under the cap, the first
/// category in priority order with quota left receives its next numbered
/// placeholder. Placeholder numbering continues from the `assigned` count.
pub fn backfill_quotas(
    mut schedule: Schedule,
    assigned: &CategoryTally,
    quotas: &CategoryTally,
    start: TermSlot,
    max_units_per_term: u32,
) -> Backfill {
    let mut assigned = assigned.clone();
    let mut outstanding = CategoryTally::new();
    for category in Category::ALL {
        let remaining = quotas.get(category).saturating_sub(assigned.get(category));
        if remaining > 0 {
            outstanding.set(category, remaining);
        }
    }

    let mut placeholders = 0;
    let mut open_slots = 0;
    for term in start.horizon() {
        let mut units = schedule.units_in(term);
        while units < max_units_per_term {
            let next = Category::ALL
                .into_iter()
                .find(|&category| outstanding.get(category) > 0);
            let entry = match next {
                Some(category) => {
                    outstanding.set(category, outstanding.get(category) - 1);
                    placeholders += 1;
                    ScheduledCourse::placeholder(category, assigned.increment(category))
                }
                None => {
                    open_slots += 1;
                    ScheduledCourse::open_slot()
                }
            };
            units += entry.units;
            schedule.add(term, entry);
        }
    }

    if outstanding.total() > 0 {
        tracing::warn!(
            outstanding = outstanding.total(),
            "category quotas exceed remaining term capacity"
        );
    }
    tracing::debug!(placeholders, open_slots, "backfilled term capacity");

    Backfill {
        schedule,
        assigned,
        outstanding,
    }
}
