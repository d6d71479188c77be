//! Compiled-predicate cache.
//!
//! Compilation turns a declarative rule into a boolean closure; the cache
//! memoizes those closures per rule id with a TTL. Entries are only ever a
//! performance concern: an expired or missing entry triggers recompilation,
//! never a different decision.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use sentra_core::RuleId;

use crate::condition::{evaluate_condition, Condition};
use crate::rule::{AccessRule, ConditionScope, EvaluationContext};

/// Executable form of a rule.
pub type Predicate = dyn Fn(&EvaluationContext) -> bool + Send + Sync;

/// Compile a rule into a predicate.
///
/// One check per condition across the three scopes; the predicate is their
/// conjunction. A rule with no conditions compiles to a predicate that is
/// always true (vacuous truth). Compilation never fails.
pub fn compile(rule: &AccessRule) -> Arc<Predicate> {
    let checks: Vec<(ConditionScope, Condition)> = rule
        .conditions()
        .map(|(scope, condition)| (scope, condition.clone()))
        .collect();

    Arc::new(move |ctx: &EvaluationContext| {
        checks
            .iter()
            .all(|(scope, condition)| evaluate_condition(ctx.slice(*scope), condition))
    })
}

struct CacheEntry {
    predicate: Arc<Predicate>,
    compiled_at: Instant,
}

/// TTL-bounded get-or-create cache for compiled predicates, keyed by rule id.
///
/// Owned by one evaluator; replacing the rule set replaces the cache
/// wholesale rather than invalidating entries selectively.
pub struct PredicateCache {
    ttl: Duration,
    entries: Mutex<HashMap<RuleId, CacheEntry>>,
}

impl PredicateCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<RuleId, CacheEntry>> {
        // A poisoned lock only means another thread panicked mid-insert;
        // the map itself is still a valid cache.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the cached predicate for `rule`, compiling on miss or expiry.
    pub fn get_or_compile(&self, rule: &AccessRule) -> Arc<Predicate> {
        let mut entries = self.lock();
        match entries.get(&rule.id) {
            Some(entry) if entry.compiled_at.elapsed() < self.ttl => {
                Arc::clone(&entry.predicate)
            }
            _ => {
                let predicate = compile(rule);
                entries.insert(
                    rule.id.clone(),
                    CacheEntry {
                        predicate: Arc::clone(&predicate),
                        compiled_at: Instant::now(),
                    },
                );
                predicate
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

impl Default for PredicateCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionOperator, ConditionValue};
    use serde_json::json;

    fn admin_rule() -> AccessRule {
        AccessRule::new("r1", "edit").with_user_condition(Condition::new(
            "role",
            ConditionOperator::Eq,
            ConditionValue::Str("admin".into()),
        ))
    }

    fn ctx(role: &str) -> EvaluationContext {
        EvaluationContext::for_user(json!({"role": role}).as_object().cloned().unwrap())
    }

    #[test]
    fn compiled_predicate_matches_its_conditions() {
        let predicate = compile(&admin_rule());
        assert!(predicate(&ctx("admin")));
        assert!(!predicate(&ctx("guest")));
    }

    #[test]
    fn conditionless_rule_compiles_to_always_true() {
        let predicate = compile(&AccessRule::new("open", "read"));
        assert!(predicate(&EvaluationContext::default()));
    }

    #[test]
    fn cache_reuses_fresh_entries() {
        let cache = PredicateCache::default();
        let rule = admin_rule();

        let first = cache.get_or_compile(&rule);
        let second = cache.get_or_compile(&rule);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entries_are_recompiled() {
        let cache = PredicateCache::new(Duration::ZERO);
        let rule = admin_rule();

        let first = cache.get_or_compile(&rule);
        let second = cache.get_or_compile(&rule);
        // New closure, same behavior.
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(first(&ctx("admin")) && second(&ctx("admin")));
    }
}
