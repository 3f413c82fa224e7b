//! Article-family contract: Article, BlogPosting, NewsArticle

use serde_json::Value;

use super::checks::{child, FieldChecker, Object};
use super::SchemaKind;
use crate::contracts::ValidationResult;

/// Longest headline accepted for article rich results
pub const HEADLINE_MAX_LENGTH: usize = 110;

const AUTHOR_TYPES: [&str; 2] = ["Person", "Organization"];

/// Validate an Article, BlogPosting or NewsArticle document
pub fn validate_article(doc: &Object) -> ValidationResult {
    let mut checker = FieldChecker::new();
    let family: Vec<&str> = SchemaKind::ARTICLE_FAMILY.iter().map(SchemaKind::as_str).collect();

    checker.context(doc);
    checker.type_in(doc, &family, "");

    if let Some(headline) = checker.required_text(doc, "headline", "") {
        checker.max_chars(headline, HEADLINE_MAX_LENGTH, "headline");
    }
    if let Some(image) = checker.required(doc, "image", "") {
        checker.url_or_urls(image, "image");
    }

    let published = checker
        .required(doc, "datePublished", "")
        .and_then(|value| checker.date_time(value, "datePublished"));

    if let Some(author) = checker.required(doc, "author", "") {
        checker.one_or_many(author, "author", check_author);
    }

    if let Some(modified) = FieldChecker::optional(doc, "dateModified") {
        let modified = checker.date_time(modified, "dateModified");
        if let (Some(published), Some(modified)) = (published, modified) {
            if modified.is_before(&published) {
                checker.warning(
                    "dateModified",
                    format!(
                        "dateModified ({}) is earlier than datePublished ({})",
                        modified, published
                    ),
                    "Set dateModified to the last edit, on or after datePublished",
                );
            }
        }
    }

    if let Some(publisher) = FieldChecker::optional(doc, "publisher") {
        if let Some(publisher) = checker.object(publisher, "publisher") {
            check_organization_ref(&mut checker, publisher, "publisher");
        }
    }

    if let Some(description) = FieldChecker::optional(doc, "description") {
        checker.non_empty_string(description, "description");
    }

    checker.finish()
}

fn check_author(checker: &mut FieldChecker, author: &Object, path: &str) {
    checker.type_in(author, &AUTHOR_TYPES, path);
    checker.required_text(author, "name", path);
    match author.get("@type").and_then(Value::as_str) {
        Some("Organization") => check_organization_extras(checker, author, path),
        _ => {
            if let Some(url) = FieldChecker::optional(author, "url") {
                checker.url(url, &child(path, "url"));
            }
        }
    }
}

/// Embedded Organization reference (publisher or author)
fn check_organization_ref(checker: &mut FieldChecker, org: &Object, path: &str) {
    checker.type_in(org, &["Organization"], path);
    checker.required_text(org, "name", path);
    check_organization_extras(checker, org, path);
}

fn check_organization_extras(checker: &mut FieldChecker, org: &Object, path: &str) {
    if let Some(url) = FieldChecker::optional(org, "url") {
        checker.url(url, &child(path, "url"));
    }
    if let Some(logo) = FieldChecker::optional(org, "logo") {
        checker.logo(logo, &child(path, "logo"));
    }
}
