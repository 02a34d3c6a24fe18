use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AnalysisSnapshot {
    #[serde(default)]
    pub graph: Option<TransactionGraph>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suspicious_accounts: Vec<FlaggedAccount>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fraud_rings: Vec<FraudRing>,
    #[serde(default)]
    pub summary: Option<Summary>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TransactionGraph {
    pub nodes: Vec<AccountNode>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<TransferEdge>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountNode {
    pub id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TransferEdge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl TransferEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            amount: None,
            transaction_id: None,
        }
    }
}

/// A suspicious account as reported by the analysis service. The same shape
/// doubles as the selection record handed to the investigation panel.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FlaggedAccount {
    pub account_id: String,
    #[serde(default)]
    pub suspicion_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detected_patterns: Vec<String>,
    #[serde(default)]
    pub ring_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_legit: bool,
}

impl FlaggedAccount {
    /// Record for a node that the analysis did not flag.
    pub fn legit(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            suspicion_score: None,
            detected_patterns: Vec::new(),
            ring_id: None,
            is_legit: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FraudRing {
    pub ring_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_accounts: Vec<String>,
    #[serde(default)]
    pub pattern_type: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    #[serde(default)]
    pub total_accounts_analyzed: Option<u64>,
    #[serde(default)]
    pub suspicious_accounts_flagged: Option<u64>,
    #[serde(default)]
    pub fraud_rings_detected: Option<u64>,
    #[serde(default)]
    pub processing_time_seconds: Option<f64>,
}

impl AnalysisSnapshot {
    /// The graph to draw: the service graph when present, otherwise one built
    /// from the ring memberships so rings stay visible.
    pub fn display_graph(&self) -> Option<TransactionGraph> {
        if let Some(graph) = &self.graph {
            return Some(graph.clone());
        }

        if self.fraud_rings.is_empty() {
            None
        } else {
            Some(ring_fallback_graph(&self.fraud_rings))
        }
    }

    /// Flagged accounts plus ring members that were not listed individually,
    /// so the fallback graph still marks every ring member as suspicious.
    pub fn flagged_accounts(&self) -> Vec<FlaggedAccount> {
        let mut accounts = self.suspicious_accounts.clone();
        if self.graph.is_some() {
            return accounts;
        }

        let mut known = accounts
            .iter()
            .map(|account| account.account_id.clone())
            .collect::<HashSet<_>>();
        for ring in &self.fraud_rings {
            for member in &ring.member_accounts {
                if known.insert(member.clone()) {
                    accounts.push(FlaggedAccount {
                        account_id: member.clone(),
                        suspicion_score: ring.risk_score,
                        detected_patterns: ring.pattern_type.iter().cloned().collect(),
                        ring_id: Some(ring.ring_id.clone()),
                        is_legit: false,
                    });
                }
            }
        }
        accounts
    }
}

pub fn ring_fallback_graph(rings: &[FraudRing]) -> TransactionGraph {
    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for ring in rings {
        let members = &ring.member_accounts;
        for member in members {
            if seen.insert(member.as_str()) {
                nodes.push(AccountNode { id: member.clone() });
            }
        }

        // A single-member ring gets a self-loop so it still shows as a ring.
        for (index, member) in members.iter().enumerate() {
            let next = &members[(index + 1) % members.len()];
            edges.push(TransferEdge::new(member.clone(), next.clone()));
        }
    }

    TransactionGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_fields_default_when_null_or_missing() {
        let raw = r#"{
            "suspicious_accounts": [
                {"account_id": "A1", "suspicion_score": null, "detected_patterns": null, "ring_id": null},
                {"account_id": "A2"}
            ],
            "fraud_rings": null
        }"#;
        let snapshot: AnalysisSnapshot = serde_json::from_str(raw).expect("parse");

        assert!(snapshot.graph.is_none());
        assert!(snapshot.fraud_rings.is_empty());
        assert_eq!(snapshot.suspicious_accounts.len(), 2);
        assert!(snapshot.suspicious_accounts[0].detected_patterns.is_empty());
        assert_eq!(snapshot.suspicious_accounts[1].suspicion_score, None);
        assert!(!snapshot.suspicious_accounts[1].is_legit);
    }

    #[test]
    fn edge_extras_from_the_service_are_accepted() {
        let raw = r#"{"graph": {"nodes": [{"id": "A"}, {"id": "B"}],
            "edges": [{"source": "A", "target": "B", "amount": 12.5, "transaction_id": "T9"}]}}"#;
        let snapshot: AnalysisSnapshot = serde_json::from_str(raw).expect("parse");
        let graph = snapshot.graph.expect("graph");

        assert_eq!(graph.edges[0].amount, Some(12.5));
        assert_eq!(graph.edges[0].transaction_id.as_deref(), Some("T9"));
    }

    #[test]
    fn ring_fallback_links_members_cyclically() {
        let rings = vec![FraudRing {
            ring_id: "RING_001".into(),
            member_accounts: vec!["A".into(), "B".into(), "C".into()],
            pattern_type: Some("cycle".into()),
            risk_score: Some(98.5),
        }];
        let graph = ring_fallback_graph(&rings);

        assert_eq!(graph.nodes.len(), 3);
        let pairs = graph
            .edges
            .iter()
            .map(|edge| (edge.source.as_str(), edge.target.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![("A", "B"), ("B", "C"), ("C", "A")]);
    }

    #[test]
    fn single_member_ring_links_to_itself() {
        let rings = vec![FraudRing {
            ring_id: "RING_003".into(),
            member_accounts: vec!["SOLO".into()],
            pattern_type: None,
            risk_score: None,
        }];
        let graph = ring_fallback_graph(&rings);

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source, "SOLO");
        assert_eq!(graph.edges[0].target, "SOLO");
    }

    #[test]
    fn fallback_marks_unlisted_ring_members_as_flagged() {
        let snapshot = AnalysisSnapshot {
            fraud_rings: vec![FraudRing {
                ring_id: "RING_002".into(),
                member_accounts: vec!["X".into(), "Y".into()],
                pattern_type: Some("smurfing_fan_in".into()),
                risk_score: Some(87.0),
            }],
            suspicious_accounts: vec![FlaggedAccount {
                account_id: "X".into(),
                suspicion_score: Some(90.0),
                detected_patterns: vec!["high_velocity_smurfing_fan_in".into()],
                ring_id: Some("RING_002".into()),
                is_legit: false,
            }],
            ..Default::default()
        };

        let flagged = snapshot.flagged_accounts();
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].suspicion_score, Some(90.0));
        assert_eq!(flagged[1].account_id, "Y");
        assert_eq!(flagged[1].ring_id.as_deref(), Some("RING_002"));
        assert!(snapshot.display_graph().is_some());
    }

    #[test]
    fn no_graph_and_no_rings_means_nothing_to_draw() {
        assert!(AnalysisSnapshot::default().display_graph().is_none());
    }
}
