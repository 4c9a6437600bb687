// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Typed read model of the arbitration subgraph.
//!
//! Every type mirrors the shape selected by the matching fragment of the
//! query catalog, with the subgraph's field names on the wire. Relations
//! are `{ id }` references unless the fragment embeds a snapshot of the
//! related entity.

mod arbitrable;
mod bigint;
mod counter;
mod counts;
mod court;
mod court_tree;
mod dispute;
mod ids;
mod period;
mod policy;
mod round;
mod stake;
mod vote;

pub use crate::{
    arbitrable::Arbitrable,
    bigint::{BigInt, BigIntError},
    counter::{Counter, COUNTER_ID},
    counts::{DisputeCounts, InvariantError},
    court::{Court, CourtSnapshot, PolicyText},
    court_tree::{CourtTree, CourtTreeError},
    dispute::{Dispute, DisputeWithRounds, ProjectedPeriod},
    ids::{EntityRef, Id},
    period::{
        LifecycleError, LifecycleEvent, LifecycleState, Period, PeriodError, TimePeriods,
        TimePeriodsError,
    },
    policy::Policy,
    round::{Round, RoundVote},
    stake::{StakeData, StakeSet},
    vote::{commitment, votes_by_round, CommitError, CommitStatus, Vote},
};
