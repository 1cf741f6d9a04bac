use crate::mode::EffectiveMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Admit,
    Deny,
}

impl Decision {
    pub fn is_admit(&self) -> bool {
        matches!(self, Decision::Admit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Admit => "admit",
            Decision::Deny => "deny",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission for one candidate under an already-resolved mode.
///
/// `enable` only looks at `deny`, `filter` only looks at `allow`. Matching is exact
/// string equality.
pub fn decide(mode: EffectiveMode, allow: &[String], deny: &[String], candidate: &str) -> Decision {
    let admitted = match mode {
        EffectiveMode::Disable => false,
        EffectiveMode::Enable => !deny.iter().any(|d| d == candidate),
        EffectiveMode::Filter => allow.iter().any(|a| a == candidate),
    };
    if admitted {
        Decision::Admit
    } else {
        Decision::Deny
    }
}
