use super::graph::RenderNode;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum RingHighlight {
    #[default]
    Idle,
    RingActive(String),
}

impl RingHighlight {
    pub(in crate::app) fn active_ring(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::RingActive(ring_id) => Some(ring_id.as_str()),
        }
    }

    pub(in crate::app) fn is_active(&self) -> bool {
        matches!(self, Self::RingActive(_))
    }

    /// Highlight after a node click: the clicked account's ring, or idle for
    /// unflagged accounts and flagged accounts outside any ring.
    pub(in crate::app) fn for_selection(ring_id: Option<&str>) -> Self {
        match ring_id {
            Some(ring_id) => Self::RingActive(ring_id.to_owned()),
            None => Self::Idle,
        }
    }

    pub(in crate::app) fn contains(&self, node: &RenderNode) -> bool {
        match (self.active_ring(), node.ring_id.as_deref()) {
            (Some(active), Some(ring)) => active == ring,
            _ => false,
        }
    }

    pub(in crate::app) fn contains_edge(&self, source: &RenderNode, target: &RenderNode) -> bool {
        self.contains(source) && self.contains(target)
    }
}
