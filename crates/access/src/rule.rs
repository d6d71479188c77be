//! Declarative access rules and the context they evaluate against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sentra_core::{DomainError, DomainResult, RuleId};

use crate::condition::Condition;

/// Which slice of the evaluation context a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionScope {
    User,
    Resource,
    Environment,
}

/// A declarative rule: `action` is allowed when every condition in every
/// scope holds (conjunction). An empty condition list is vacuously true for
/// its scope. Multiple rules for the same action form a disjunction, first
/// match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRule {
    pub id: RuleId,
    pub action: String,
    #[serde(default, rename = "user")]
    pub user_conditions: Vec<Condition>,
    #[serde(default, rename = "resource")]
    pub resource_conditions: Vec<Condition>,
    #[serde(default, rename = "environment")]
    pub environment_conditions: Vec<Condition>,
}

impl AccessRule {
    pub fn new(id: impl Into<RuleId>, action: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            user_conditions: Vec::new(),
            resource_conditions: Vec::new(),
            environment_conditions: Vec::new(),
        }
    }

    pub fn with_user_condition(mut self, condition: Condition) -> Self {
        self.user_conditions.push(condition);
        self
    }

    pub fn with_resource_condition(mut self, condition: Condition) -> Self {
        self.resource_conditions.push(condition);
        self
    }

    pub fn with_environment_condition(mut self, condition: Condition) -> Self {
        self.environment_conditions.push(condition);
        self
    }

    /// Conditions of every scope, tagged with their scope.
    pub fn conditions(&self) -> impl Iterator<Item = (ConditionScope, &Condition)> {
        let user = self
            .user_conditions
            .iter()
            .map(|c| (ConditionScope::User, c));
        let resource = self
            .resource_conditions
            .iter()
            .map(|c| (ConditionScope::Resource, c));
        let environment = self
            .environment_conditions
            .iter()
            .map(|c| (ConditionScope::Environment, c));
        user.chain(resource).chain(environment)
    }

    /// Reject malformed operator/value pairings at load time.
    pub fn validate(&self) -> DomainResult<()> {
        if self.action.is_empty() {
            return Err(DomainError::validation(format!(
                "rule '{}': empty action",
                self.id
            )));
        }
        for (_, condition) in self.conditions() {
            condition.validate().map_err(|e| {
                DomainError::validation(format!("rule '{}': {}", self.id, e))
            })?;
        }
        Ok(())
    }
}

static EMPTY: std::sync::LazyLock<Map<String, Value>> = std::sync::LazyLock::new(Map::new);

/// Attributes a rule evaluates against. The resource and environment slices
/// are optional; when absent, conditions on them see an empty map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    pub user: Map<String, Value>,
    #[serde(default)]
    pub resource: Option<Map<String, Value>>,
    #[serde(default)]
    pub environment: Option<Map<String, Value>>,
}

impl EvaluationContext {
    pub fn for_user(user: Map<String, Value>) -> Self {
        Self {
            user,
            resource: None,
            environment: None,
        }
    }

    pub fn with_resource(mut self, resource: Map<String, Value>) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_environment(mut self, environment: Map<String, Value>) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn slice(&self, scope: ConditionScope) -> &Map<String, Value> {
        match scope {
            ConditionScope::User => &self.user,
            ConditionScope::Resource => self.resource.as_ref().unwrap_or(&EMPTY),
            ConditionScope::Environment => self.environment.as_ref().unwrap_or(&EMPTY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionOperator, ConditionValue};
    use serde_json::json;

    #[test]
    fn deserializes_the_wire_shape() {
        let rule: AccessRule = serde_json::from_value(json!({
            "id": "r1",
            "action": "edit",
            "user": [{"field": "role", "operator": "eq", "value": "admin"}]
        }))
        .unwrap();

        assert_eq!(rule.id.as_str(), "r1");
        assert_eq!(rule.action, "edit");
        assert_eq!(rule.user_conditions.len(), 1);
        assert!(rule.resource_conditions.is_empty());
        assert!(rule.environment_conditions.is_empty());
        rule.validate().unwrap();
    }

    #[test]
    fn validate_rejects_malformed_numeric_condition() {
        let rule = AccessRule::new("r1", "edit").with_user_condition(Condition::new(
            "age",
            ConditionOperator::Gt,
            ConditionValue::Str("18".into()),
        ));

        let err = rule.validate().unwrap_err();
        assert!(err.to_string().contains("r1"));
    }

    #[test]
    fn missing_slices_read_as_empty_maps() {
        let ctx = EvaluationContext::for_user(Map::new());
        assert!(ctx.slice(ConditionScope::Resource).is_empty());
        assert!(ctx.slice(ConditionScope::Environment).is_empty());
    }
}
