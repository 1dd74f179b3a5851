//! Checks for the catalog shipped in `platform-definitions/`.

use handlehunt_platforms::{PlatformCategory, PlatformLoader, PlatformRegistry};
use std::path::PathBuf;

fn bundled_catalog() -> PlatformRegistry {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../platform-definitions");
    let loader = PlatformLoader::new(dir).expect("catalog directory exists");
    PlatformRegistry::load_from(&loader).expect("catalog loads")
}

#[test]
fn test_bundled_catalog_is_complete() {
    let registry = bundled_catalog();
    assert_eq!(registry.len(), 34);

    for name in ["GitHub", "Instagram", "Twitter", "WeHeartIt", "Reddit", "Steam"] {
        assert!(registry.contains(name), "missing {name}");
    }
}

#[test]
fn test_bundled_catalog_categories() {
    let counts = bundled_catalog().count_by_category();
    assert_eq!(counts.get(&PlatformCategory::Social), Some(&12));
    assert_eq!(counts.get(&PlatformCategory::Developer), Some(&4));
    assert_eq!(counts.values().sum::<usize>(), 34);
}

#[test]
fn test_subdomain_platforms() {
    let registry = bundled_catalog();

    let tumblr = registry.get("Tumblr").expect("Tumblr defined");
    assert!(tumblr.username_in_host());
    assert_eq!(tumblr.profile_url("eren"), "https://eren.tumblr.com");

    let github = registry.get("GitHub").expect("GitHub defined");
    assert!(!github.username_in_host());
    assert_eq!(github.profile_url("eren"), "https://github.com/eren");
}
