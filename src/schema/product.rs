//! Product rich-result contract

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::checks::{child, FieldChecker, Object};
use crate::contracts::ValidationResult;

static CURRENCY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency pattern"));

static AVAILABILITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https://schema\.org/(InStock|OutOfStock|PreOrder|Discontinued|LimitedAvailability|OnlineOnly|SoldOut)$",
    )
    .expect("valid availability pattern")
});

static CONDITION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://schema\.org/(NewCondition|UsedCondition|RefurbishedCondition|DamagedCondition)$")
        .expect("valid item condition pattern")
});

const IDENTIFIER_KEYS: [&str; 7] = ["sku", "mpn", "gtin", "gtin8", "gtin12", "gtin13", "gtin14"];

/// Validate a Product document
pub fn validate_product(doc: &Object) -> ValidationResult {
    let mut checker = FieldChecker::new();

    checker.context(doc);
    checker.type_in(doc, &["Product"], "");
    checker.required_text(doc, "name", "");
    if let Some(image) = checker.required(doc, "image", "") {
        checker.url_or_urls(image, "image");
    }
    checker.required_text(doc, "description", "");
    if let Some(offers) = checker.required(doc, "offers", "") {
        checker.one_or_many(offers, "offers", check_offer);
    }

    if let Some(brand) = FieldChecker::optional(doc, "brand") {
        if let Some(brand) = checker.object(brand, "brand") {
            checker.type_in(brand, &["Brand"], "brand");
            checker.required_text(brand, "name", "brand");
        }
    }

    if let Some(rating) = FieldChecker::optional(doc, "aggregateRating") {
        if let Some(rating) = checker.object(rating, "aggregateRating") {
            check_aggregate_rating(&mut checker, rating);
        }
    }

    if let Some(review) = FieldChecker::optional(doc, "review") {
        check_reviews(&mut checker, review);
    }

    for key in IDENTIFIER_KEYS {
        if let Some(value) = FieldChecker::optional(doc, key) {
            checker.string(value, key);
        }
    }

    checker.finish()
}

fn check_offer(checker: &mut FieldChecker, offer: &Object, path: &str) {
    checker.type_in(offer, &["Offer"], path);

    if let Some(price) = checker.required(offer, "price", path) {
        checker.number_or_string(price, &child(path, "price"));
    }
    if let Some(currency) = checker.required(offer, "priceCurrency", path) {
        checker.pattern(
            currency,
            &CURRENCY_PATTERN,
            &child(path, "priceCurrency"),
            "Use a 3-letter ISO 4217 currency code such as CAD or USD",
        );
    }
    if let Some(availability) = checker.required(offer, "availability", path) {
        checker.pattern(
            availability,
            &AVAILABILITY_PATTERN,
            &child(path, "availability"),
            "Use a schema.org availability URL such as https://schema.org/InStock",
        );
    }

    if let Some(url) = FieldChecker::optional(offer, "url") {
        checker.url(url, &child(path, "url"));
    }
    if let Some(valid_until) = FieldChecker::optional(offer, "priceValidUntil") {
        checker.date(valid_until, &child(path, "priceValidUntil"));
    }
    if let Some(condition) = FieldChecker::optional(offer, "itemCondition") {
        checker.pattern(
            condition,
            &CONDITION_PATTERN,
            &child(path, "itemCondition"),
            "Use a schema.org condition URL such as https://schema.org/NewCondition",
        );
    }
}

fn check_aggregate_rating(checker: &mut FieldChecker, rating: &Object) {
    let path = "aggregateRating";
    checker.type_in(rating, &["AggregateRating"], path);
    for key in ["ratingValue", "reviewCount"] {
        if let Some(value) = checker.required(rating, key, path) {
            checker.number_or_string(value, &child(path, key));
        }
    }
    for key in ["bestRating", "worstRating"] {
        if let Some(value) = FieldChecker::optional(rating, key) {
            checker.number_or_string(value, &child(path, key));
        }
    }
}

fn check_reviews(checker: &mut FieldChecker, review: &Value) {
    match review {
        // an empty review list is allowed
        Value::Array(items) if items.is_empty() => {}
        _ => checker.one_or_many(review, "review", check_review),
    }
}

fn check_review(checker: &mut FieldChecker, review: &Object, path: &str) {
    checker.type_in(review, &["Review"], path);

    if let Some(author) = checker.required(review, "author", path) {
        let author_path = child(path, "author");
        if let Some(author) = checker.object(author, &author_path) {
            checker.type_in(author, &["Person"], &author_path);
            checker.required_text(author, "name", &author_path);
        }
    }

    if let Some(rating) = checker.required(review, "reviewRating", path) {
        let rating_path = child(path, "reviewRating");
        if let Some(rating) = checker.object(rating, &rating_path) {
            checker.type_in(rating, &["Rating"], &rating_path);
            if let Some(value) = checker.required(rating, "ratingValue", &rating_path) {
                checker.number_or_string(value, &child(&rating_path, "ratingValue"));
            }
        }
    }

    if let Some(body) = FieldChecker::optional(review, "reviewBody") {
        checker.non_empty_string(body, &child(path, "reviewBody"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_product() -> Value {
        json!({
            "@context": "https://schema.org",
            "@type": "Product",
            "name": "Purrify Standard Pack",
            "image": "https://purrify.ca/images/products/standard.jpg",
            "description": "Activated carbon cat litter deodorizer",
            "brand": { "@type": "Brand", "name": "Purrify" },
            "offers": {
                "@type": "Offer",
                "price": "24.99",
                "priceCurrency": "CAD",
                "availability": "https://schema.org/InStock"
            }
        })
    }

    fn validate(value: &Value) -> ValidationResult {
        validate_product(value.as_object().unwrap())
    }

    #[test]
    fn test_valid_product() {
        let result = validate(&valid_product());
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_required_fields_named() {
        for field in ["@context", "name", "image", "description", "offers"] {
            let mut product = valid_product();
            product.as_object_mut().unwrap().remove(field);
            let result = validate(&product);
            assert!(!result.is_valid);
            assert!(result.errors.iter().any(|e| e.message.contains(field)), "{}", field);
            assert!(result.errors[0].fix.is_some());
        }
    }

    #[test]
    fn test_offer_array_and_numeric_price() {
        let mut product = valid_product();
        product["offers"] = json!([
            { "@type": "Offer", "price": 24.99, "priceCurrency": "CAD", "availability": "https://schema.org/InStock" },
            { "@type": "Offer", "price": "39.99", "priceCurrency": "USD", "availability": "https://schema.org/PreOrder" }
        ]);
        assert!(validate(&product).is_valid);
    }

    #[test]
    fn test_bad_offer_fields() {
        let mut product = valid_product();
        product["offers"] = json!([{
            "@type": "Offer",
            "price": "24.99",
            "priceCurrency": "cad",
            "availability": "InStock"
        }]);
        let result = validate(&product);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["offers[0].priceCurrency", "offers[0].availability"]);
    }

    #[test]
    fn test_aggregate_rating() {
        let mut product = valid_product();
        product["aggregateRating"] = json!({
            "@type": "AggregateRating",
            "ratingValue": "4.8",
            "reviewCount": "127"
        });
        assert!(validate(&product).is_valid);

        product["aggregateRating"] = json!({ "@type": "AggregateRating", "ratingValue": 4.8 });
        let result = validate(&product);
        assert_eq!(result.errors[0].field, "aggregateRating.reviewCount");
    }

    #[test]
    fn test_brand_requires_name() {
        let mut product = valid_product();
        product["brand"] = json!({ "@type": "Brand" });
        let result = validate(&product);
        assert_eq!(result.errors[0].field, "brand.name");
    }

    #[test]
    fn test_review_shape() {
        let mut product = valid_product();
        product["review"] = json!({
            "@type": "Review",
            "author": { "@type": "Person", "name": "Jamie" },
            "reviewRating": { "@type": "Rating", "ratingValue": 5 }
        });
        assert!(validate(&product).is_valid);

        product["review"] = json!([{ "@type": "Review", "author": { "@type": "Person", "name": "Jamie" } }]);
        let result = validate(&product);
        assert_eq!(result.errors[0].field, "review[0].reviewRating");
    }
}
