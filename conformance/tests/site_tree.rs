//! Conformance runs over small generated sites.

use std::fs;
use std::path::Path;

use danis_conformance::{run_all, Severity, SiteTree};
use tempfile::TempDir;

const META: &str = "<meta name=\"description\" content=\"d\">\
    <meta property=\"og:title\" content=\"t\">\
    <meta property=\"og:description\" content=\"d\">\
    <meta property=\"og:url\" content=\"https://danisphotography.com/\">\
    <meta property=\"og:image\" content=\"https://danisphotography.com/og.jpg\">";

fn page(title: &str, body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>{title}</title>{META}</head><body>{body}</body></html>")
}

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A site with every precached asset, an offline page and working links.
fn complete_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "index.html",
        &page(
            "Home",
            "<nav><a href=\"/gallery.html\">Gallery</a><a href=\"about/\">About</a>\
             <a href=\"https://instagram.com/danis\">IG</a><a href=\"/images/cover.jpg\">Cover</a></nav>\
             <main><p>home</p></main>",
        ),
    );
    write(root, "gallery.html", &page("Gallery", "<main><a href=\"index.html#top\">Back</a></main>"));
    write(root, "about/index.html", &page("About", "<main><p>about</p></main>"));
    write(root, "offline.html", &page("Offline", "<main><p>offline</p></main>"));
    for asset in [
        "css/style.css",
        "js/script.js",
        "favicon-32x32.png",
        "favicon-16x16.png",
        "apple-touch-icon.png",
        "site.webmanifest",
    ] {
        write(root, asset, "x");
    }
    dir
}

#[test]
fn complete_site_passes() {
    let dir = complete_site();
    let report = run_all(&SiteTree::new(dir.path().to_path_buf())).unwrap();
    assert!(report.all_passed(), "{report}");
    assert_eq!(report.count(Severity::Warning), 0, "{report}");
    let links = report.results_for("site/links").next().unwrap();
    assert_eq!(links.message, "all 3 intercepted links resolve");
}

#[test]
fn broken_intercepted_link_fails() {
    let dir = complete_site();
    write(dir.path(), "contact.html", &page("Contact", "<main><a href=\"/prices.html\">Prices</a></main>"));

    let report = run_all(&SiteTree::new(dir.path().to_path_buf())).unwrap();

    let links = report.results_for("site/links").next().unwrap();
    assert_eq!(links.severity, Severity::Failure);
    assert_eq!(links.details, vec!["contact.html: /prices.html"]);
}

#[test]
fn missing_precached_asset_fails() {
    let dir = complete_site();
    fs::remove_file(dir.path().join("css/style.css")).unwrap();

    let report = run_all(&SiteTree::new(dir.path().to_path_buf())).unwrap();

    let manifest = report.results_for("site/manifest").next().unwrap();
    assert!(manifest.is_failure());
    assert_eq!(manifest.details, vec!["/css/style.css"]);
}

#[test]
fn missing_landmark_and_metadata_only_warn() {
    let dir = complete_site();
    write(
        dir.path(),
        "plain.html",
        "<html><head><title>Plain</title></head><body><p>plain</p></body></html>",
    );

    let report = run_all(&SiteTree::new(dir.path().to_path_buf())).unwrap();

    assert!(report.all_passed(), "{report}");
    let landmark = report.results_for("site/landmark").next().unwrap();
    assert_eq!(landmark.severity, Severity::Warning);
    assert_eq!(landmark.details, vec!["plain.html"]);
    let metadata = report.results_for("site/metadata").next().unwrap();
    assert_eq!(metadata.severity, Severity::Warning);
    assert!(metadata.details[0].starts_with("plain.html: missing description, og:title"));
}

#[test]
fn untitled_page_fails() {
    let dir = complete_site();
    write(dir.path(), "blank.html", "<html><body><main></main></body></html>");

    let report = run_all(&SiteTree::new(dir.path().to_path_buf())).unwrap();

    let title = report.results_for("site/title").next().unwrap();
    assert!(title.is_failure());
    assert_eq!(title.details, vec!["blank.html"]);
}

#[test]
fn fallback_outside_the_manifest_warns() {
    let dir = complete_site();
    let mut site = SiteTree::new(dir.path().to_path_buf());
    site.worker.manifest.retain(|p| p != "/offline.html");

    let report = run_all(&site).unwrap();

    let fallback = report.results_for("site/offline-fallback").next().unwrap();
    assert_eq!(fallback.severity, Severity::Warning);
}

#[test]
fn missing_public_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    let site = SiteTree::new(dir.path().join("public"));
    assert!(run_all(&site).is_err());
}
