//! Split a shot table into per-position groups.

use log::debug;

use crate::models::{FiringPosition, Shot, ShotGroup};

/// Split shots into left, middle and right groups by identifier prefix.
///
/// Insertion order is preserved within each group. Shots whose identifier
/// does not start with `L`, `M` or `R` belong to no group and are dropped.
pub fn partition<I>(shots: I) -> (ShotGroup, ShotGroup, ShotGroup)
where
    I: IntoIterator<Item = Shot>,
{
    let mut left = ShotGroup::new(FiringPosition::Left);
    let mut middle = ShotGroup::new(FiringPosition::Middle);
    let mut right = ShotGroup::new(FiringPosition::Right);
    let mut dropped = 0usize;

    for shot in shots {
        match shot.firing_position() {
            Some(FiringPosition::Left) => left.push(shot),
            Some(FiringPosition::Middle) => middle.push(shot),
            Some(FiringPosition::Right) => right.push(shot),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Dropped {} shots without a firing position prefix", dropped);
    }

    (left, middle, right)
}
