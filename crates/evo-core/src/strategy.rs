//! Strategies
//!
//! Fixed decision policies for the two-player cooperation game, the
//! payoff matrix, and the per-pair interaction history they read.

use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A single move in the cooperation game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Cooperate,
    Defect,
}

impl Action {
    pub fn is_cooperate(&self) -> bool {
        matches!(self, Action::Cooperate)
    }

    fn as_byte(&self) -> u8 {
        match self {
            Action::Cooperate => 0,
            Action::Defect => 1,
        }
    }
}

/// Payoff matrix for one ordered action pair.
///
/// Classic prisoner's dilemma values: mutual cooperation (3,3),
/// sucker's payoff (0,5), temptation (5,0), mutual defection (1,1).
pub fn payoff(a: Action, b: Action) -> (i64, i64) {
    match (a, b) {
        (Action::Cooperate, Action::Cooperate) => (3, 3),
        (Action::Cooperate, Action::Defect) => (0, 5),
        (Action::Defect, Action::Cooperate) => (5, 0),
        (Action::Defect, Action::Defect) => (1, 1),
    }
}

/// History of interactions between one ordered agent pair.
///
/// Append-only: grows one entry per interaction, never reordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionHistory {
    pub my_actions: Vec<Action>,
    pub opponent_actions: Vec<Action>,
}

impl InteractionHistory {
    pub fn record(&mut self, mine: Action, theirs: Action) {
        self.my_actions.push(mine);
        self.opponent_actions.push(theirs);
    }

    pub fn last_own_action(&self) -> Option<Action> {
        self.my_actions.last().copied()
    }

    pub fn last_opponent_action(&self) -> Option<Action> {
        self.opponent_actions.last().copied()
    }

    pub fn opponent_ever_defected(&self) -> bool {
        self.opponent_actions.contains(&Action::Defect)
    }

    pub fn len(&self) -> usize {
        self.opponent_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opponent_actions.is_empty()
    }
}

/// The closed set of fixed decision policies.
///
/// Each variant is a pure function from the shared history with one
/// opponent to an action, except `Random` which draws from the
/// simulation's RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    AlwaysCooperate,
    AlwaysDefect,
    TitForTat,
    /// Grim trigger: cooperates until betrayed once, then defects forever
    Grudger,
    Random,
    /// Defects only after two consecutive opponent defections
    TitForTwoTats,
    /// Win-stay, lose-shift
    Pavlov,
}

impl StrategyKind {
    /// Display / registry name for this policy.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::AlwaysCooperate => "AlwaysCooperate",
            StrategyKind::AlwaysDefect => "AlwaysDefect",
            StrategyKind::TitForTat => "TitForTat",
            StrategyKind::Grudger => "Grudger",
            StrategyKind::Random => "Random",
            StrategyKind::TitForTwoTats => "TitForTwoTats",
            StrategyKind::Pavlov => "Pavlov",
        }
    }

    /// Returns all fixed policy variants.
    pub fn all() -> &'static [StrategyKind] {
        &[
            StrategyKind::AlwaysCooperate,
            StrategyKind::AlwaysDefect,
            StrategyKind::TitForTat,
            StrategyKind::Grudger,
            StrategyKind::Random,
            StrategyKind::TitForTwoTats,
            StrategyKind::Pavlov,
        ]
    }

    /// Decide an action from the possibly-absent history with one
    /// opponent. Total: never fails, never consults other state.
    pub fn decide(&self, history: Option<&InteractionHistory>, rng: &mut SmallRng) -> Action {
        match self {
            StrategyKind::AlwaysCooperate => Action::Cooperate,
            StrategyKind::AlwaysDefect => Action::Defect,
            StrategyKind::TitForTat => history
                .and_then(|h| h.last_opponent_action())
                .unwrap_or(Action::Cooperate),
            StrategyKind::Grudger => match history {
                Some(h) if h.opponent_ever_defected() => Action::Defect,
                _ => Action::Cooperate,
            },
            StrategyKind::Random => {
                if rng.gen_bool(0.5) {
                    Action::Cooperate
                } else {
                    Action::Defect
                }
            }
            StrategyKind::TitForTwoTats => match history {
                Some(h) if h.len() >= 2 => {
                    let opp = &h.opponent_actions;
                    if opp[opp.len() - 1] == Action::Defect && opp[opp.len() - 2] == Action::Defect
                    {
                        Action::Defect
                    } else {
                        Action::Cooperate
                    }
                }
                _ => Action::Cooperate,
            },
            StrategyKind::Pavlov => match history.and_then(|h| {
                h.last_own_action().map(|mine| (mine, h.last_opponent_action()))
            }) {
                Some((mine, Some(theirs))) => {
                    if mine == theirs {
                        // Win-stay
                        mine
                    } else if mine == Action::Cooperate {
                        Action::Defect
                    } else {
                        Action::Cooperate
                    }
                }
                _ => Action::Cooperate,
            },
        }
    }
}

/// A binding commitment to an action: SHA-256 over the action byte
/// and a 32-byte random salt.
///
/// This is a primitive for a commit-reveal extension; the simulation
/// loop itself never verifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCommitment {
    /// Hex-encoded SHA-256 digest
    pub digest: String,
    /// Opening salt
    pub salt: [u8; 32],
}

/// Commit to an action with a fresh random salt.
pub fn commit_action(action: Action, rng: &mut SmallRng) -> ActionCommitment {
    let mut salt = [0u8; 32];
    rng.fill(&mut salt[..]);
    ActionCommitment {
        digest: commitment_digest(action, &salt),
        salt,
    }
}

/// Recompute the digest for an (action, salt) opening.
pub fn commitment_digest(action: Action, salt: &[u8; 32]) -> String {
    let mut hasher = Sha256::new();
    hasher.update([action.as_byte()]);
    hasher.update(salt);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn history(mine: &[Action], theirs: &[Action]) -> InteractionHistory {
        InteractionHistory {
            my_actions: mine.to_vec(),
            opponent_actions: theirs.to_vec(),
        }
    }

    #[test]
    fn test_payoff_matrix() {
        assert_eq!(payoff(Action::Cooperate, Action::Cooperate), (3, 3));
        assert_eq!(payoff(Action::Cooperate, Action::Defect), (0, 5));
        assert_eq!(payoff(Action::Defect, Action::Cooperate), (5, 0));
        assert_eq!(payoff(Action::Defect, Action::Defect), (1, 1));
    }

    #[test]
    fn test_constants_ignore_history() {
        let mut rng = rng();
        let h = history(&[Action::Defect], &[Action::Defect]);
        assert_eq!(
            StrategyKind::AlwaysCooperate.decide(Some(&h), &mut rng),
            Action::Cooperate
        );
        assert_eq!(
            StrategyKind::AlwaysDefect.decide(None, &mut rng),
            Action::Defect
        );
    }

    #[test]
    fn test_tit_for_tat_mirrors_last_move() {
        let mut rng = rng();
        assert_eq!(
            StrategyKind::TitForTat.decide(None, &mut rng),
            Action::Cooperate
        );

        let h = history(&[Action::Cooperate], &[Action::Defect]);
        assert_eq!(
            StrategyKind::TitForTat.decide(Some(&h), &mut rng),
            Action::Defect
        );

        let h = history(
            &[Action::Cooperate, Action::Defect],
            &[Action::Defect, Action::Cooperate],
        );
        assert_eq!(
            StrategyKind::TitForTat.decide(Some(&h), &mut rng),
            Action::Cooperate
        );
    }

    #[test]
    fn test_grudger_never_forgives() {
        let mut rng = rng();
        let mut h = history(&[Action::Cooperate], &[Action::Defect]);

        // One defection anywhere in the history locks in defection.
        for _ in 0..20 {
            assert_eq!(
                StrategyKind::Grudger.decide(Some(&h), &mut rng),
                Action::Defect
            );
            h.record(Action::Defect, Action::Cooperate);
        }
    }

    #[test]
    fn test_grudger_cooperates_until_betrayed() {
        let mut rng = rng();
        let h = history(
            &[Action::Cooperate, Action::Cooperate],
            &[Action::Cooperate, Action::Cooperate],
        );
        assert_eq!(
            StrategyKind::Grudger.decide(Some(&h), &mut rng),
            Action::Cooperate
        );
    }

    #[test]
    fn test_tit_for_two_tats_needs_two_defections() {
        let mut rng = rng();
        let one = history(&[Action::Cooperate], &[Action::Defect]);
        assert_eq!(
            StrategyKind::TitForTwoTats.decide(Some(&one), &mut rng),
            Action::Cooperate
        );

        let two = history(
            &[Action::Cooperate, Action::Cooperate],
            &[Action::Defect, Action::Defect],
        );
        assert_eq!(
            StrategyKind::TitForTwoTats.decide(Some(&two), &mut rng),
            Action::Defect
        );

        let broken = history(
            &[Action::Cooperate, Action::Cooperate],
            &[Action::Defect, Action::Cooperate],
        );
        assert_eq!(
            StrategyKind::TitForTwoTats.decide(Some(&broken), &mut rng),
            Action::Cooperate
        );
    }

    #[test]
    fn test_pavlov_win_stay_lose_shift() {
        let mut rng = rng();
        assert_eq!(
            StrategyKind::Pavlov.decide(None, &mut rng),
            Action::Cooperate
        );

        // Matched outcome: repeat own last action.
        let won = history(&[Action::Defect], &[Action::Defect]);
        assert_eq!(
            StrategyKind::Pavlov.decide(Some(&won), &mut rng),
            Action::Defect
        );

        // Mismatched outcome: invert own last action.
        let lost = history(&[Action::Cooperate], &[Action::Defect]);
        assert_eq!(
            StrategyKind::Pavlov.decide(Some(&lost), &mut rng),
            Action::Defect
        );
        let tempted = history(&[Action::Defect], &[Action::Cooperate]);
        assert_eq!(
            StrategyKind::Pavlov.decide(Some(&tempted), &mut rng),
            Action::Cooperate
        );
    }

    #[test]
    fn test_commitment_digest_is_reproducible() {
        let mut rng = rng();
        let commitment = commit_action(Action::Cooperate, &mut rng);
        assert_eq!(
            commitment.digest,
            commitment_digest(Action::Cooperate, &commitment.salt)
        );
        // Same salt, different action: different digest.
        assert_ne!(
            commitment.digest,
            commitment_digest(Action::Defect, &commitment.salt)
        );
    }

    #[test]
    fn test_commitments_use_fresh_salt() {
        let mut rng = rng();
        let a = commit_action(Action::Cooperate, &mut rng);
        let b = commit_action(Action::Cooperate, &mut rng);
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }
}
