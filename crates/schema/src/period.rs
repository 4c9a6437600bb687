// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Dispute period state machine.
//!
//! A dispute walks `evidence → commit → vote → appeal → execution` and
//! never skips a period or moves backwards, with one exception: an appeal
//! raised during `appeal` opens a new round and restarts at `evidence`.
//! Once `ruled` is set nothing changes anymore.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::BigInt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Evidence,
    /// Jurors commit `keccak256(choice, salt)`. Courts without hidden votes
    /// still go through this period, it is simply a wait.
    Commit,
    Vote,
    Appeal,
    Execution,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown dispute period `{0}`")]
pub struct PeriodError(pub String);

impl Period {
    pub const ALL: [Period; 5] = [
        Period::Evidence,
        Period::Commit,
        Period::Vote,
        Period::Appeal,
        Period::Execution,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Evidence => "evidence",
            Period::Commit => "commit",
            Period::Vote => "vote",
            Period::Appeal => "appeal",
            Period::Execution => "execution",
        }
    }

    pub fn accepts_commits(self, hidden_votes: bool) -> bool {
        hidden_votes && self == Period::Commit
    }

    /// In hidden-vote courts this is the reveal window, otherwise plain votes are cast.
    pub fn accepts_votes(self) -> bool {
        self == Period::Vote
    }

    fn parse(value: &str) -> Result<Self, PeriodError> {
        match value {
            "evidence" => Ok(Period::Evidence),
            // older deployments label the commit period `cast`
            "commit" | "cast" => Ok(Period::Commit),
            "vote" => Ok(Period::Vote),
            "appeal" => Ok(Period::Appeal),
            "execution" => Ok(Period::Execution),
            // indices are accepted in their canonical form only, no sign or padding
            "0" => Ok(Period::Evidence),
            "1" => Ok(Period::Commit),
            "2" => Ok(Period::Vote),
            "3" => Ok(Period::Appeal),
            "4" => Ok(Period::Execution),
            other => Err(PeriodError(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PeriodVisitor;

        impl de::Visitor<'_> for PeriodVisitor {
            type Value = Period;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a dispute period name or index between 0 and 4")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Period::parse(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Period::from_index(v).ok_or_else(|| E::custom(PeriodError(v.to_string())))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .ok()
                    .and_then(Period::from_index)
                    .ok_or_else(|| E::custom(PeriodError(v.to_string())))
            }
        }

        deserializer.deserialize_any(PeriodVisitor)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expected 5 time periods, one per dispute period, got {0}")]
pub struct TimePeriodsError(pub usize);

/// Duration of every period of a court, in seconds, indexed by [`Period`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimePeriods([BigInt; 5]);

impl TimePeriods {
    pub fn new(durations: [BigInt; 5]) -> Self {
        Self(durations)
    }

    pub fn duration(&self, period: Period) -> &BigInt {
        &self.0[period.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, &BigInt)> {
        Period::ALL.into_iter().zip(self.0.iter())
    }
}

impl TryFrom<Vec<BigInt>> for TimePeriods {
    type Error = TimePeriodsError;

    fn try_from(value: Vec<BigInt>) -> Result<Self, Self::Error> {
        let len = value.len();
        <[BigInt; 5]>::try_from(value)
            .map(Self)
            .map_err(|_| TimePeriodsError(len))
    }
}

impl Serialize for TimePeriods {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TimePeriods {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let durations = Vec::<BigInt>::deserialize(deserializer)?;
        TimePeriods::try_from(durations).map_err(de::Error::custom)
    }
}

/// Event that moves a dispute forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    PassPeriod,
    Appeal,
    Rule,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Dispute is already ruled, `{0:?}` is not allowed")]
    Terminal(LifecycleEvent),
    #[error("There is no period after `{0}`")]
    NoNextPeriod(Period),
    #[error("Appeals are only possible during the appeal period, dispute is in `{0}`")]
    AppealOutsideWindow(Period),
    #[error("A ruling can only be executed during the execution period, dispute is in `{0}`")]
    RulingBeforeExecution(Period),
    #[error("Ruled dispute changed from {before:?} to {after:?}")]
    ChangedAfterRuling {
        before: LifecycleState,
        after: LifecycleState,
    },
    #[error("Rounds went from {before} to {after}")]
    RoundsRemoved { before: usize, after: usize },
    #[error("Period moved backwards from `{from}` to `{to}` within the same round")]
    PeriodRegressed { from: Period, to: Period },
    #[error("New round appeared after the appeal window closed")]
    RoundAfterAppealWindow,
    #[error("Dispute is ruled while still in `{0}`")]
    RuledOutsideExecution(Period),
}

/// The part of a dispute the state machine cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleState {
    pub period: Period,
    pub rounds: usize,
    pub ruled: bool,
}

impl LifecycleState {
    /// State of a freshly created dispute: first round, collecting evidence.
    pub fn created() -> Self {
        Self {
            period: Period::Evidence,
            rounds: 1,
            ruled: false,
        }
    }

    pub fn apply(self, event: LifecycleEvent) -> Result<Self, LifecycleError> {
        if self.ruled {
            return Err(LifecycleError::Terminal(event));
        }
        match event {
            LifecycleEvent::PassPeriod => {
                let period = self
                    .period
                    .next()
                    .ok_or(LifecycleError::NoNextPeriod(self.period))?;
                Ok(Self { period, ..self })
            }
            LifecycleEvent::Appeal => {
                if self.period != Period::Appeal {
                    return Err(LifecycleError::AppealOutsideWindow(self.period));
                }
                Ok(Self {
                    period: Period::Evidence,
                    rounds: self.rounds + 1,
                    ruled: false,
                })
            }
            LifecycleEvent::Rule => {
                if self.period != Period::Execution {
                    return Err(LifecycleError::RulingBeforeExecution(self.period));
                }
                Ok(Self {
                    ruled: true,
                    ..self
                })
            }
        }
    }

    /// Checks that `later`, a newer snapshot of the same dispute, can be
    /// reached from `self` through any sequence of legal events.
    pub fn check_progression(&self, later: &LifecycleState) -> Result<(), LifecycleError> {
        if self.ruled {
            if self != later {
                return Err(LifecycleError::ChangedAfterRuling {
                    before: *self,
                    after: *later,
                });
            }
            return Ok(());
        }
        if later.rounds < self.rounds {
            return Err(LifecycleError::RoundsRemoved {
                before: self.rounds,
                after: later.rounds,
            });
        }
        if later.ruled && later.period != Period::Execution {
            return Err(LifecycleError::RuledOutsideExecution(later.period));
        }
        if later.rounds == self.rounds {
            if later.period < self.period {
                return Err(LifecycleError::PeriodRegressed {
                    from: self.period,
                    to: later.period,
                });
            }
        } else if self.period > Period::Appeal {
            return Err(LifecycleError::RoundAfterAppealWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!("evidence"), Period::Evidence)]
    #[case(json!("commit"), Period::Commit)]
    #[case(json!("cast"), Period::Commit)]
    #[case(json!("vote"), Period::Vote)]
    #[case(json!("appeal"), Period::Appeal)]
    #[case(json!("execution"), Period::Execution)]
    #[case(json!(2), Period::Vote)]
    #[case(json!("4"), Period::Execution)]
    fn decodes_known_periods(#[case] input: serde_json::Value, #[case] expected: Period) {
        assert_eq!(serde_json::from_value::<Period>(input).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("Evidence"))]
    #[case(json!("ruled"))]
    #[case(json!(5))]
    #[case(json!(-1))]
    #[case(json!(""))]
    #[case(json!("+2"))]
    #[case(json!("02"))]
    #[case(json!(" 2"))]
    fn rejects_unknown_periods(#[case] input: serde_json::Value) {
        serde_json::from_value::<Period>(input).unwrap_err();
    }

    #[test]
    fn encodes_canonical_names() {
        assert_eq!(serde_json::to_value(Period::Commit).unwrap(), json!("commit"));
        let back: Period = serde_json::from_value(json!("cast")).unwrap();
        assert_eq!(serde_json::to_value(back).unwrap(), json!("commit"));
    }

    #[test]
    fn periods_advance_strictly_forward() {
        let walked: Vec<_> = std::iter::successors(Some(Period::Evidence), |p| p.next()).collect();
        assert_eq!(walked, Period::ALL);
        assert_eq!(Period::Execution.next(), None);
    }

    #[test]
    fn commits_only_in_hidden_vote_courts() {
        assert!(Period::Commit.accepts_commits(true));
        assert!(!Period::Commit.accepts_commits(false));
        assert!(!Period::Vote.accepts_commits(true));
        assert!(Period::Vote.accepts_votes());
    }

    #[test]
    fn time_periods_require_five_entries() {
        let err = serde_json::from_value::<TimePeriods>(json!(["1", "2", "3", "4"])).unwrap_err();
        assert!(err.to_string().contains("got 4"));
        serde_json::from_value::<TimePeriods>(json!(["1", "2", "3", "4", "5", "6"])).unwrap_err();

        let periods: TimePeriods =
            serde_json::from_value(json!(["280800", "583200", "583200", "388800", "0"])).unwrap();
        assert_eq!(
            periods.duration(Period::Appeal),
            &BigInt::from(388800u64)
        );
    }

    #[test]
    fn full_lifecycle_with_one_appeal() {
        use LifecycleEvent::*;

        let state = [PassPeriod, PassPeriod, PassPeriod, Appeal]
            .into_iter()
            .try_fold(LifecycleState::created(), LifecycleState::apply)
            .unwrap();
        assert_eq!(
            state,
            LifecycleState {
                period: Period::Evidence,
                rounds: 2,
                ruled: false
            }
        );

        let state = [PassPeriod, PassPeriod, PassPeriod, PassPeriod, Rule]
            .into_iter()
            .try_fold(state, LifecycleState::apply)
            .unwrap();
        assert!(state.ruled);
        assert_eq!(state.rounds, 2);

        assert_eq!(
            state.apply(Appeal),
            Err(LifecycleError::Terminal(Appeal))
        );
        assert_eq!(
            state.apply(PassPeriod),
            Err(LifecycleError::Terminal(PassPeriod))
        );
    }

    #[test]
    fn illegal_events_are_rejected() {
        let state = LifecycleState::created();
        assert_eq!(
            state.apply(LifecycleEvent::Appeal),
            Err(LifecycleError::AppealOutsideWindow(Period::Evidence))
        );
        assert_eq!(
            state.apply(LifecycleEvent::Rule),
            Err(LifecycleError::RulingBeforeExecution(Period::Evidence))
        );
        let execution = LifecycleState {
            period: Period::Execution,
            ..state
        };
        assert_eq!(
            execution.apply(LifecycleEvent::PassPeriod),
            Err(LifecycleError::NoNextPeriod(Period::Execution))
        );
    }

    fn state(period: Period, rounds: usize, ruled: bool) -> LifecycleState {
        LifecycleState {
            period,
            rounds,
            ruled,
        }
    }

    #[rstest]
    #[case(state(Period::Evidence, 1, false), state(Period::Vote, 1, false))]
    #[case(state(Period::Vote, 1, false), state(Period::Commit, 2, false))]
    #[case(state(Period::Appeal, 1, false), state(Period::Execution, 3, true))]
    #[case(state(Period::Execution, 2, true), state(Period::Execution, 2, true))]
    fn reachable_progressions(#[case] before: LifecycleState, #[case] after: LifecycleState) {
        before.check_progression(&after).unwrap();
    }

    #[test]
    fn ruled_dispute_gets_no_more_rounds() {
        let ruled = state(Period::Execution, 1, true);
        assert!(matches!(
            ruled.check_progression(&state(Period::Execution, 2, true)),
            Err(LifecycleError::ChangedAfterRuling { .. })
        ));
    }

    #[rstest]
    #[case(
        state(Period::Vote, 2, false),
        state(Period::Vote, 1, false),
        LifecycleError::RoundsRemoved { before: 2, after: 1 }
    )]
    #[case(
        state(Period::Appeal, 1, false),
        state(Period::Vote, 1, false),
        LifecycleError::PeriodRegressed { from: Period::Appeal, to: Period::Vote }
    )]
    #[case(
        state(Period::Execution, 1, false),
        state(Period::Evidence, 2, false),
        LifecycleError::RoundAfterAppealWindow
    )]
    #[case(
        state(Period::Evidence, 1, false),
        state(Period::Appeal, 1, true),
        LifecycleError::RuledOutsideExecution(Period::Appeal)
    )]
    fn unreachable_progressions(
        #[case] before: LifecycleState,
        #[case] after: LifecycleState,
        #[case] expected: LifecycleError,
    ) {
        assert_eq!(before.check_progression(&after), Err(expected));
    }
}
