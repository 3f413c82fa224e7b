//! Organization contract for site-wide markup

use serde_json::Value;

use super::checks::{child, FieldChecker, Object};
use crate::contracts::ValidationResult;

/// Validate an Organization document
pub fn validate_organization(doc: &Object) -> ValidationResult {
    let mut checker = FieldChecker::new();

    checker.context(doc);
    checker.type_in(doc, &["Organization"], "");
    checker.required_text(doc, "name", "");
    if let Some(url) = checker.required(doc, "url", "") {
        checker.url(url, "url");
    }
    if let Some(logo) = checker.required(doc, "logo", "") {
        checker.logo(logo, "logo");
    }

    if let Some(contacts) = FieldChecker::optional(doc, "contactPoint") {
        checker.array(contacts, "contactPoint", check_contact_point);
    }
    if let Some(same_as) = FieldChecker::optional(doc, "sameAs") {
        checker.array(same_as, "sameAs", |checker, link, path| checker.url(link, path));
    }

    checker.finish()
}

fn check_contact_point(checker: &mut FieldChecker, contact: &Value, path: &str) {
    let Some(contact) = checker.object(contact, path) else {
        return;
    };
    checker.type_in(contact, &["ContactPoint"], path);
    if let Some(kind) = checker.required(contact, "contactType", path) {
        checker.string(kind, &child(path, "contactType"));
    }
    for key in ["telephone", "areaServed"] {
        if let Some(value) = FieldChecker::optional(contact, key) {
            checker.string(value, &child(path, key));
        }
    }
    if let Some(email) = FieldChecker::optional(contact, "email") {
        checker.email(email, &child(path, "email"));
    }
    if let Some(languages) = FieldChecker::optional(contact, "availableLanguage") {
        let languages_path = child(path, "availableLanguage");
        match languages {
            Value::Array(_) => checker.array(languages, &languages_path, |checker, lang, path| {
                checker.string(lang, path);
            }),
            _ => {
                checker.string(languages, &languages_path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_organization() -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "Organization",
            "name": "Purrify",
            "url": "https://purrify.ca",
            "logo": "https://purrify.ca/images/Logos/logo.png"
        })
    }

    fn validate(value: &Value) -> ValidationResult {
        validate_organization(value.as_object().unwrap())
    }

    #[test]
    fn test_valid_organization() {
        let result = validate(&valid_organization());
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_required_fields() {
        for field in ["name", "url", "logo"] {
            let mut org = valid_organization();
            org.as_object_mut().unwrap().remove(field);
            let result = validate(&org);
            assert!(!result.is_valid, "{}", field);
            assert_eq!(result.errors[0].field, field);
        }
    }

    #[test]
    fn test_image_object_logo() {
        let mut org = valid_organization();
        org["logo"] = json!({
            "@type": "ImageObject",
            "url": "https://purrify.ca/images/Logos/logo.png",
            "width": "512",
            "height": 512
        });
        assert!(validate(&org).is_valid);
    }

    #[test]
    fn test_contact_point() {
        let mut org = valid_organization();
        org["contactPoint"] = json!([{
            "@type": "ContactPoint",
            "telephone": "+1-555-123-4567",
            "contactType": "customer service",
            "email": "support@purrify.ca",
            "availableLanguage": ["English", "French"]
        }]);
        assert!(validate(&org).is_valid);

        org["contactPoint"] = json!([{ "@type": "ContactPoint", "telephone": "+1-555-123-4567" }]);
        let result = validate(&org);
        assert_eq!(result.errors[0].field, "contactPoint[0].contactType");
    }

    #[test]
    fn test_same_as_links() {
        let mut org = valid_organization();
        org["sameAs"] = json!(["https://twitter.com/purrifyhq", "https://facebook.com/purrify"]);
        assert!(validate(&org).is_valid);

        org["sameAs"] = json!(["purrify on twitter"]);
        let result = validate(&org);
        assert_eq!(result.errors[0].field, "sameAs[0]");
    }
}
