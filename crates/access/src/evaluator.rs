//! Access evaluation: ordered first-match-wins rule dispatch, default-deny,
//! and an append-only decision trail.

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use sentra_core::{DomainResult, RuleId};

use crate::cache::PredicateCache;
use crate::rule::{AccessRule, EvaluationContext};

/// One decision record. Produced exactly once per [`AccessEvaluator::check`]
/// call; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessAuditEntry {
    /// The matching rule, or `None` for a default-deny.
    pub rule_id: Option<RuleId>,
    pub action: String,
    pub allowed: bool,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

const REASON_MATCHED: &str = "matched";
const REASON_NO_RULE: &str = "no rule matched";

/// Rules and the predicate cache built for them travel together so a reader
/// can never pair old rules with a cache compiled for new ones.
struct RuleSet {
    rules: Vec<AccessRule>,
    cache: PredicateCache,
}

/// Evaluates actions against an ordered rule list.
///
/// Rules for an action form a disjunction evaluated in configured order; the
/// first match allows and short-circuits. No match means deny — there is no
/// explicit deny-rule type, denial is purely the fallback.
///
/// `check` takes `&self` and is safe to call concurrently; `set_rules`
/// swaps the rule set and a fresh cache atomically. The audit trail survives
/// rule replacement.
pub struct AccessEvaluator {
    state: RwLock<Arc<RuleSet>>,
    trail: Mutex<Vec<AccessAuditEntry>>,
    cache_ttl: Duration,
}

impl AccessEvaluator {
    pub fn new() -> Self {
        Self::with_cache_ttl(PredicateCache::DEFAULT_TTL)
    }

    pub fn with_cache_ttl(cache_ttl: Duration) -> Self {
        Self {
            state: RwLock::new(Arc::new(RuleSet {
                rules: Vec::new(),
                cache: PredicateCache::new(cache_ttl),
            })),
            trail: Mutex::new(Vec::new()),
            cache_ttl,
        }
    }

    /// Replace the rule set wholesale.
    ///
    /// Every rule is validated first; on any malformed rule the previous set
    /// stays installed. On success the new rules and a fresh predicate cache
    /// are installed together. The audit trail is not cleared.
    pub fn set_rules(&self, rules: Vec<AccessRule>) -> DomainResult<()> {
        for rule in &rules {
            rule.validate()?;
        }

        let next = Arc::new(RuleSet {
            rules,
            cache: PredicateCache::new(self.cache_ttl),
        });
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = next;
        Ok(())
    }

    /// Snapshot of the configured rules, in evaluation order.
    pub fn rules(&self) -> Vec<AccessRule> {
        self.current().rules.clone()
    }

    /// Can this context perform `action`?
    ///
    /// Exact, case-sensitive action match; first matching rule allows.
    pub fn check(&self, action: &str, ctx: &EvaluationContext) -> bool {
        let state = self.current();

        for rule in state.rules.iter().filter(|r| r.action == action) {
            let predicate = state.cache.get_or_compile(rule);
            if predicate(ctx) {
                debug!(action, rule_id = %rule.id, "access allowed");
                self.append(AccessAuditEntry {
                    rule_id: Some(rule.id.clone()),
                    action: action.to_owned(),
                    allowed: true,
                    reason: REASON_MATCHED.to_owned(),
                    timestamp: Utc::now(),
                });
                return true;
            }
        }

        debug!(action, "access denied: no rule matched");
        self.append(AccessAuditEntry {
            rule_id: None,
            action: action.to_owned(),
            allowed: false,
            reason: REASON_NO_RULE.to_owned(),
            timestamp: Utc::now(),
        });
        false
    }

    /// Defensive copy of every decision recorded so far.
    pub fn audit_trail(&self) -> Vec<AccessAuditEntry> {
        self.trail
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn current(&self) -> Arc<RuleSet> {
        Arc::clone(&self.state.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn append(&self, entry: AccessAuditEntry) {
        self.trail
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry);
    }
}

impl Default for AccessEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
