// How each rostered player reached the current team: the latest transaction
// that added the player there, else the draft that picked the player there.

use std::collections::HashMap;
use std::fmt;

use dynasty_core::model::{DraftKind, DraftSelection, RosterId, Transaction, TransactionKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Acquisition {
    Drafted {
        season: String,
        kind: DraftKind,
        round: u32,
        slot: u32,
    },
    /// `from` is the roster that gave the player up, when recorded.
    Traded { from: Option<RosterId> },
    Waiver { bid: Option<u32> },
    FreeAgent,
    Commissioner,
    Unknown,
}

impl fmt::Display for Acquisition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acquisition::Drafted {
                season,
                kind,
                round,
                slot,
            } => write!(f, "Rd {round}.{slot:02} ({season} {kind})"),
            Acquisition::Traded { .. } => write!(f, "via trade"),
            Acquisition::Waiver { bid: Some(bid) } => write!(f, "${bid} FAAB"),
            Acquisition::Waiver { bid: None } => write!(f, "Waiver claim"),
            Acquisition::FreeAgent => write!(f, "Free agent"),
            Acquisition::Commissioner => write!(f, "Commissioner"),
            Acquisition::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAcquisition {
    pub player_id: String,
    pub acquisition: Acquisition,
    /// When the deciding transaction went through (epoch millis). `None`
    /// for drafted and unknown players.
    pub completed_at: Option<i64>,
}

impl PlayerAcquisition {
    /// Display text, naming the trade partner through `team_name`.
    pub fn describe(&self, team_name: impl Fn(RosterId) -> String) -> String {
        match self.acquisition {
            Acquisition::Traded { from: Some(from) } => format!("from {}", team_name(from)),
            ref other => other.to_string(),
        }
    }
}

fn from_transaction(tx: &Transaction, player_id: &str) -> Acquisition {
    match tx.kind {
        TransactionKind::Trade => Acquisition::Traded {
            from: tx.drops.get(player_id).copied(),
        },
        TransactionKind::Waiver => Acquisition::Waiver { bid: tx.waiver_bid },
        TransactionKind::FreeAgent => Acquisition::FreeAgent,
        TransactionKind::Commissioner => Acquisition::Commissioner,
    }
}

/// Trace each of `player_ids` onto `roster_id`.
///
/// Transactions may come in any order; the most recent one (by completion
/// time) that added the player to this roster decides. Without one, a draft
/// selection by this roster counts. When a player was drafted more than
/// once, the last selection in `selections` is used.
pub fn trace_acquisitions(
    roster_id: RosterId,
    player_ids: &[String],
    transactions: &[Transaction],
    selections: &[DraftSelection],
) -> Vec<PlayerAcquisition> {
    let mut newest_first: Vec<&Transaction> = transactions.iter().collect();
    newest_first.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    let drafted: HashMap<&str, &DraftSelection> = selections
        .iter()
        .map(|s| (s.player_id.as_str(), s))
        .collect();

    player_ids
        .iter()
        .map(|player_id| {
            let added = newest_first
                .iter()
                .find(|tx| tx.adds.get(player_id.as_str()) == Some(&roster_id));
            if let Some(tx) = added {
                return PlayerAcquisition {
                    player_id: player_id.clone(),
                    acquisition: from_transaction(tx, player_id),
                    completed_at: Some(tx.completed_at),
                };
            }

            let acquisition = match drafted.get(player_id.as_str()) {
                Some(pick) if pick.roster_id == roster_id => Acquisition::Drafted {
                    season: pick.season.clone(),
                    kind: pick.kind,
                    round: pick.round,
                    slot: pick.slot,
                },
                _ => Acquisition::Unknown,
            };
            PlayerAcquisition {
                player_id: player_id.clone(),
                acquisition,
                completed_at: None,
            }
        })
        .collect()
}

/// Count of acquisitions per source label, in first-seen order.
pub fn acquisition_mix(acquisitions: &[PlayerAcquisition]) -> Vec<(&'static str, usize)> {
    let mut mix: Vec<(&'static str, usize)> = Vec::new();
    for a in acquisitions {
        let label = match a.acquisition {
            Acquisition::Drafted { .. } => "drafted",
            Acquisition::Traded { .. } => "traded",
            Acquisition::Waiver { .. } => "waiver",
            Acquisition::FreeAgent => "free agent",
            Acquisition::Commissioner => "commissioner",
            Acquisition::Unknown => "unknown",
        };
        match mix.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => mix.push((label, 1)),
        }
    }
    mix
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tx(
        id: &str,
        kind: TransactionKind,
        completed_at: i64,
        adds: &[(&str, RosterId)],
        drops: &[(&str, RosterId)],
        waiver_bid: Option<u32>,
    ) -> Transaction {
        let map = |list: &[(&str, RosterId)]| -> BTreeMap<String, RosterId> {
            list.iter().map(|(p, r)| (p.to_string(), *r)).collect()
        };
        Transaction {
            id: id.to_string(),
            kind,
            completed_at,
            roster_ids: Vec::new(),
            adds: map(adds),
            drops: map(drops),
            waiver_bid,
        }
    }

    fn pick(player: &str, roster_id: RosterId, round: u32, slot: u32) -> DraftSelection {
        DraftSelection {
            season: "2023".into(),
            kind: DraftKind::Startup,
            round,
            slot,
            roster_id,
            player_id: player.into(),
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn team_name(roster_id: RosterId) -> String {
        format!("Team {roster_id}")
    }

    #[test]
    fn latest_add_to_this_roster_decides() {
        let transactions = vec![
            // Newer claim listed first; input order must not matter.
            tx("t3", TransactionKind::Waiver, 300, &[("p1", 1)], &[], Some(15)),
            tx("t1", TransactionKind::FreeAgent, 100, &[("p1", 1)], &[], None),
            tx("t2", TransactionKind::Trade, 200, &[("p2", 1), ("p9", 2)], &[("p2", 2), ("p9", 1)], None),
            // Added to another roster: ignored for roster 1.
            tx("t4", TransactionKind::FreeAgent, 400, &[("p3", 2)], &[], None),
        ];
        let selections = vec![pick("p3", 1, 1, 3), pick("p4", 2, 2, 1)];
        let got = trace_acquisitions(1, &ids(&["p1", "p2", "p3", "p4"]), &transactions, &selections);

        assert_eq!(got[0].acquisition, Acquisition::Waiver { bid: Some(15) });
        assert_eq!(got[0].completed_at, Some(300));
        assert_eq!(got[0].describe(team_name), "$15 FAAB");

        assert_eq!(got[1].acquisition, Acquisition::Traded { from: Some(2) });
        assert_eq!(got[1].describe(team_name), "from Team 2");

        assert_eq!(got[2].describe(team_name), "Rd 1.03 (2023 Startup)");
        assert_eq!(got[2].completed_at, None);

        // Drafted by someone else and never moved here.
        assert_eq!(got[3].acquisition, Acquisition::Unknown);
    }

    #[test]
    fn descriptions_without_details() {
        let transactions = vec![
            tx("t1", TransactionKind::Trade, 100, &[("p1", 1)], &[], None),
            tx("t2", TransactionKind::Waiver, 100, &[("p2", 1)], &[], None),
            tx("t3", TransactionKind::Commissioner, 100, &[("p3", 1)], &[], None),
        ];
        let got = trace_acquisitions(1, &ids(&["p1", "p2", "p3"]), &transactions, &[]);
        let text: Vec<String> = got.iter().map(|a| a.describe(team_name)).collect();
        assert_eq!(text, vec!["via trade", "Waiver claim", "Commissioner"]);
    }

    #[test]
    fn later_draft_selection_wins() {
        let selections = vec![pick("p1", 2, 1, 1), pick("p1", 1, 3, 10)];
        let got = trace_acquisitions(1, &ids(&["p1"]), &[], &selections);
        assert_eq!(got[0].describe(team_name), "Rd 3.10 (2023 Startup)");
    }

    #[test]
    fn mix_counts_in_first_seen_order() {
        let transactions = vec![
            tx("t1", TransactionKind::FreeAgent, 100, &[("p1", 1), ("p3", 1)], &[], None),
        ];
        let got = trace_acquisitions(1, &ids(&["p1", "p2", "p3"]), &transactions, &[]);
        assert_eq!(acquisition_mix(&got), vec![("free agent", 2), ("unknown", 1)]);
    }
}
