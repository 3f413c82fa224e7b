//! Integration tests for the structured-data scanner

use std::fs;
use std::path::Path;

use seo_content_gate::scanner::scan_path;

const VALID_FAQ_PAGE: &str = r#"<!doctype html>
<html><head>
<script type="application/ld+json">
{
  "@context": "https://schema.org",
  "@type": "FAQPage",
  "mainEntity": [{
    "@type": "Question",
    "name": "How long does Purrify last?",
    "acceptedAnswer": {"@type": "Answer", "text": "About 7 days per application."}
  }]
}
</script>
</head><body></body></html>"#;

const BROKEN_PRODUCT_COMPONENT: &str = r#"export default function Product() {
  return (
    <>
      <script type="application/ld+json" dangerouslySetInnerHTML={{ __html: JSON.stringify(productSchema) }} />
      <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "Product", "name": "Purrify Trial"}
      </script>
    </>
  );
}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn test_scan_reports_per_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "public/faq.html", VALID_FAQ_PAGE);
    write(dir.path(), "app/product/page.tsx", BROKEN_PRODUCT_COMPONENT);
    write(dir.path(), "app/layout.tsx", "export default function Layout() { return null; }");

    let report = scan_path(dir.path()).unwrap();

    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.files.len(), 2);
    assert!(!report.passed());

    let faq = report.files.iter().find(|f| f.path.ends_with("faq.html")).unwrap();
    assert!(faq.passed(), "{:?}", faq.result.errors);
    assert_eq!(faq.documents, 1);

    let product = report.files.iter().find(|f| f.path.ends_with("page.tsx")).unwrap();
    assert!(!product.passed());
    assert_eq!(product.skipped_blocks, 1);
    assert_eq!(product.blocks, 1);
    assert!(product.result.errors.iter().any(|e| e.message.contains("offers")));
    assert!(product.result.errors.iter().all(|e| e.message.starts_with("Schema 1: ")));

    assert_eq!(report.failed_files().count(), 1);
    assert!(report.total_errors() > 0);
}

#[test]
fn test_scan_skips_dependency_and_hidden_dirs() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "node_modules/pkg/index.html", BROKEN_PRODUCT_COMPONENT);
    write(dir.path(), ".next/server/page.html", BROKEN_PRODUCT_COMPONENT);
    write(dir.path(), "public/faq.html", VALID_FAQ_PAGE);

    let report = scan_path(dir.path()).unwrap();
    assert_eq!(report.files_scanned, 1);
    assert!(report.passed());
}

#[test]
fn test_scan_json_ld_files_and_graphs() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "data/site.json",
        r#"{
          "@context": "https://schema.org",
          "@graph": [
            {"@type": "Organization", "name": "Purrify", "url": "https://purrify.ca", "logo": "https://purrify.ca/logo.png"},
            {"@type": "Organization", "name": "Purrify Labs"}
          ]
        }"#,
    );
    write(dir.path(), "package.json", r#"{"name": "site", "private": true}"#);

    let report = scan_path(dir.path()).unwrap();
    assert_eq!(report.files.len(), 1);

    let site = &report.files[0];
    assert_eq!(site.documents, 2);
    assert!(!site.passed());
    assert!(site.result.errors.iter().all(|e| e.message.starts_with("Schema 2: ")));
}

#[test]
fn test_scan_single_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "faq.html", VALID_FAQ_PAGE);

    let report = scan_path(&dir.path().join("faq.html")).unwrap();
    assert_eq!(report.files_scanned, 1);
    assert!(report.passed());
}
