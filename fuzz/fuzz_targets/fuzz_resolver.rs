#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use loadmap::config::{ConfigBuilder, PackageId};
use loadmap::resolver::Resolver;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (name, parent) = text.split_once('\n').unwrap_or((text, ""));

    let config = ConfigBuilder::new()
        .default_extensions(true)
        .base_url("https://cdn.example.com/")
        .path("github:*", "lib/github/*")
        .path("npm:*", "lib/npm/*")
        .alias("components/jquery", "github:components/jquery@2.1.4")
        .scoped(
            "github:twbs/bootstrap@3.3.5",
            "jquery",
            "github:components/jquery@2.1.4",
        )
        .build();
    let resolver = Resolver::new(Arc::new(config));
    let parent = PackageId::parse(parent).ok();

    if let Ok(resolved) = resolver.resolve(name, parent.as_ref()) {
        if let Some(parent) = &parent {
            if name.starts_with("./") || name.starts_with("../") {
                assert!(resolved.id.starts_with(&parent.package_key()));
            }
        }
    }
});
