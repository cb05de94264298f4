mod common;

use common::{DocRoot, hosts};
use vhttpd::http::vhost::ResolveError;

#[tokio::test]
async fn test_resolve_existing_file() {
    let root = DocRoot::new("vhost-file");
    let path = root.file("index.html", "<h1>hi</h1>");
    let hosts = hosts(&[("a.com", &root)]);

    let resolved = hosts.resolve("a.com", "/index.html").await.unwrap();

    assert_eq!(resolved.path, path);
    assert_eq!(resolved.size, 11);
}

#[tokio::test]
async fn test_resolve_trailing_slash_matches_explicit_index() {
    let root = DocRoot::new("vhost-slash");
    root.file("index.html", "root");
    root.file("docs/index.html", "docs");
    let hosts = hosts(&[("a.com", &root)]);

    for (slash, explicit) in [("/", "/index.html"), ("/docs/", "/docs/index.html")] {
        let a = hosts.resolve("a.com", slash).await.unwrap();
        let b = hosts.resolve("a.com", explicit).await.unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test]
async fn test_resolve_trailing_slash_without_index_is_not_found() {
    let root = DocRoot::new("vhost-noindex");
    root.dir("empty");
    let hosts = hosts(&[("a.com", &root)]);

    let result = hosts.resolve("a.com", "/empty/").await;

    assert!(matches!(result, Err(ResolveError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_directory_without_slash_serves_index() {
    let root = DocRoot::new("vhost-dir");
    let index = root.file("blog/index.html", "blog");
    let hosts = hosts(&[("a.com", &root)]);

    let resolved = hosts.resolve("a.com", "/blog").await.unwrap();

    assert_eq!(resolved.path, index);
    assert_eq!(resolved.size, 4);
}

#[tokio::test]
async fn test_resolve_directory_without_index_is_not_found() {
    let root = DocRoot::new("vhost-dir-noindex");
    root.file("assets/app.js", "x");
    let hosts = hosts(&[("a.com", &root)]);

    let result = hosts.resolve("a.com", "/assets").await;

    assert!(matches!(result, Err(ResolveError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_index_that_is_a_directory() {
    let root = DocRoot::new("vhost-index-dir");
    root.dir("odd/index.html");
    let hosts = hosts(&[("a.com", &root)]);

    let result = hosts.resolve("a.com", "/odd").await;

    assert!(matches!(result, Err(ResolveError::IsDirectory(_))));
}

#[tokio::test]
async fn test_resolve_missing_file() {
    let root = DocRoot::new("vhost-missing");
    let hosts = hosts(&[("a.com", &root)]);

    let result = hosts.resolve("a.com", "/missing.html").await;

    assert!(matches!(result, Err(ResolveError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_unknown_host() {
    let root = DocRoot::new("vhost-unknown");
    root.file("index.html", "x");
    let hosts = hosts(&[("a.com", &root)]);

    assert!(matches!(
        hosts.resolve("b.com", "/index.html").await,
        Err(ResolveError::UnknownHost(h)) if h == "b.com"
    ));
    assert!(matches!(
        hosts.resolve("", "/index.html").await,
        Err(ResolveError::UnknownHost(_))
    ));
}

#[tokio::test]
async fn test_resolve_hosts_are_isolated() {
    let a = DocRoot::new("vhost-iso-a");
    let b = DocRoot::new("vhost-iso-b");
    a.file("only-a.html", "a");
    b.file("index.html", "bb");
    let hosts = hosts(&[("a.com", &a), ("b.com", &b)]);

    assert!(hosts.resolve("a.com", "/only-a.html").await.is_ok());
    assert!(hosts.resolve("b.com", "/only-a.html").await.is_err());
    assert_eq!(hosts.resolve("b.com", "/").await.unwrap().size, 2);
}

#[tokio::test]
async fn test_resolve_traversal_stays_in_root() {
    let outer = DocRoot::new("vhost-outer");
    outer.file("secret.txt", "secret");
    let root = DocRoot::new("vhost-inner");
    root.file("index.html", "home");
    let hosts = hosts(&[("a.com", &root)]);

    let outer_name = outer.path.file_name().unwrap().to_str().unwrap();
    let target = format!("/../{outer_name}/secret.txt");

    assert!(hosts.resolve("a.com", &target).await.is_err());

    let resolved = hosts.resolve("a.com", "/../../../index.html").await.unwrap();
    assert!(resolved.path.starts_with(root.root()));
}

#[tokio::test]
async fn test_resolve_cleans_dot_segments() {
    let root = DocRoot::new("vhost-dots");
    let page = root.file("a/page.html", "p");
    let hosts = hosts(&[("a.com", &root)]);

    let resolved = hosts.resolve("a.com", "/a/./b/../page.html").await.unwrap();

    assert_eq!(resolved.path, page);
}
