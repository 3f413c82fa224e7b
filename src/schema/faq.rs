//! FAQPage contract

use serde_json::Value;

use super::checks::{child, FieldChecker, Object};
use crate::contracts::ValidationResult;

/// Validate a FAQPage document
pub fn validate_faq(doc: &Object) -> ValidationResult {
    let mut checker = FieldChecker::new();

    checker.context(doc);
    checker.type_in(doc, &["FAQPage"], "");
    if let Some(entities) = checker.required(doc, "mainEntity", "") {
        checker.non_empty_array(entities, "mainEntity", check_question);
    }

    checker.finish()
}

fn check_question(checker: &mut FieldChecker, question: &Value, path: &str) {
    let Some(question) = checker.object(question, path) else {
        return;
    };
    checker.type_in(question, &["Question"], path);
    checker.required_text(question, "name", path);

    if let Some(answer) = checker.required(question, "acceptedAnswer", path) {
        let answer_path = child(path, "acceptedAnswer");
        if let Some(answer) = checker.object(answer, &answer_path) {
            checker.type_in(answer, &["Answer"], &answer_path);
            checker.required_text(answer, "text", &answer_path);
        }
    }
}
