use acl_manager::{
    AclConfig, AclManager, AclType, CachingGroupProvider, ConfigAclParser, GroupCacheConfig,
    StaticGroupProvider,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

fn directory() -> StaticGroupProvider {
    let mut provider = StaticGroupProvider::new();
    for i in 0..100 {
        provider = provider.with_user(format!("user{}", i), [format!("group{}", i % 10)]);
    }
    provider
}

fn am_config() -> AclConfig {
    let users: Vec<String> = (0..20).map(|i| format!("user{}", i)).collect();
    AclConfig::new()
        .with_acl(AclType::AmView, format!("{} group7,group8", users.join(",")))
        .with_acl(AclType::AmModify, "user1,user2 group9")
}

fn bench_check_access(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let am = AclManager::new(Arc::new(directory()), "admin", Some(&am_config())).unwrap();

    let mut group = c.benchmark_group("check_access");
    for (name, user) in [("owner", "admin"), ("user_listed", "user5"), ("group_listed", "user97"), ("denied", "user33")] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &user, |b, &user| {
            b.iter(|| rt.block_on(am.check_access(black_box(user), AclType::AmView)));
        });
    }
    group.finish();
}

fn bench_check_access_cached(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let provider = CachingGroupProvider::new(directory(), GroupCacheConfig::default());
    let am = AclManager::new(Arc::new(provider), "admin", Some(&am_config())).unwrap();

    // Warm up cache
    rt.block_on(am.check_access("user97", AclType::AmView));

    c.bench_function("check_access_group_cached", |b| {
        b.iter(|| rt.block_on(am.check_access(black_box("user97"), AclType::AmView)));
    });
}

fn bench_derive(c: &mut Criterion) {
    let am = AclManager::new(Arc::new(directory()), "admin", Some(&am_config())).unwrap();
    let dag_config = AclConfig::new()
        .with_acl(AclType::DagView, "user50,user51 group3")
        .with_acl(AclType::DagModify, "user50");

    c.bench_function("derive_dag_manager", |b| {
        b.iter(|| am.derive(Some(black_box("dagowner")), Some(&dag_config)).unwrap());
    });
}

fn bench_render(c: &mut Criterion) {
    let am = AclManager::new(Arc::new(directory()), "admin", Some(&am_config())).unwrap();

    c.bench_function("to_application_acls", |b| {
        b.iter(|| black_box(am.to_application_acls()));
    });
}

fn bench_parse_value(c: &mut Criterion) {
    let value = (0..50)
        .map(|i| format!("user{}", i))
        .collect::<Vec<_>>()
        .join(",")
        + " group1,group2,group3";

    c.bench_function("parse_acl_value", |b| {
        b.iter(|| ConfigAclParser::parse_value(black_box(&value)));
    });
}

criterion_group!(
    benches,
    bench_check_access,
    bench_check_access_cached,
    bench_derive,
    bench_render,
    bench_parse_value
);
criterion_main!(benches);
