use super::Partition;
use crate::error::{GfResult, GroupForgeError};
use crate::roster::Roster;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a trial spreads the roster over the groups. Both strategies are
/// unbiased with respect to group order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Pick a group uniformly at random, retry while it is full.
    #[default]
    Rejection,
    /// Shuffle the capacity-expanded slot list and fill it in roster order.
    SlotShuffle,
}

/// Builds one complete random partition of `roster` into groups with the
/// given capacities. Capacities must sum to the roster size.
pub fn build_random_partition(
    rng: &mut Rng,
    roster: &Roster,
    capacities: &[usize],
    strategy: AssignmentStrategy,
) -> GfResult<Partition> {
    let total: usize = capacities.iter().sum();
    if total != roster.len() {
        return Err(GroupForgeError::Capacity(format!(
            "Capacities sum to {} but the roster has {} individuals",
            total,
            roster.len()
        )));
    }

    let mut partition = Partition::with_capacities(capacities);

    match strategy {
        AssignmentStrategy::Rejection => assign_by_rejection(rng, roster, &mut partition),
        AssignmentStrategy::SlotShuffle => assign_by_slot_shuffle(rng, roster, &mut partition)?,
    }

    partition.verify(roster)?;
    Ok(partition)
}

fn assign_by_rejection(rng: &mut Rng, roster: &Roster, partition: &mut Partition) {
    let group_count = partition.group_count();
    for individual in roster {
        // Terminates: total capacity equals roster size, so a free seat exists.
        loop {
            let g = rng.usize(0..group_count);
            if partition.try_assign(g, individual.clone()) {
                break;
            }
        }
    }
}

fn assign_by_slot_shuffle(
    rng: &mut Rng,
    roster: &Roster,
    partition: &mut Partition,
) -> GfResult<()> {
    let mut seats: Vec<usize> = partition
        .capacities()
        .into_iter()
        .enumerate()
        .flat_map(|(g, cap)| std::iter::repeat(g).take(cap))
        .collect();
    rng.shuffle(&mut seats);

    for (individual, &g) in roster.iter().zip(seats.iter()) {
        if !partition.try_assign(g, individual.clone()) {
            return Err(GroupForgeError::Capacity(format!(
                "Seat in group {} rejected '{}'",
                g + 1,
                individual.name
            )));
        }
    }
    Ok(())
}
