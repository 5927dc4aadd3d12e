use std::collections::HashSet;

use crate::schema::{ScoutConfig, ToolName};

use super::helpers::{validate_not_blank, validate_range, validate_range_f64};

/// Validate the `[model]` section.
pub(crate) fn validate_model(errors: &mut Vec<String>, config: &ScoutConfig) {
    let model = &config.model;

    validate_not_blank(errors, "model.name", &model.name);
    validate_not_blank(errors, "model.system_instruction", &model.system_instruction);

    let mut seen = HashSet::new();
    for tool in &model.tools {
        if !seen.insert(*tool) {
            errors.push(format!("model.tools lists '{}' more than once", tool.as_str()));
        }
    }

    if let Some(temperature) = model.temperature {
        validate_range_f64(errors, "model.temperature", temperature, 0.0, 2.0);
    }
    if let Some(max) = model.max_output_tokens {
        validate_range(errors, "model.max_output_tokens", max.into(), 1, 65_536);
    }
    if let Some(budget) = model.thinking_budget {
        validate_range(errors, "model.thinking_budget", budget.into(), -1, 32_768);
    }
    if let Some(threshold) = model.dynamic_threshold {
        validate_range_f64(errors, "model.dynamic_threshold", threshold, 0.0, 1.0);
        if !model.tools.contains(&ToolName::GoogleSearchRetrieval) {
            errors.push(
                "model.dynamic_threshold is set but google_search_retrieval is not enabled".into(),
            );
        }
    }
}
