use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use http::Method;
use typed_route::router::{RouteEntry, Router};
use typed_route::server::parse_query_params;

fn route_table() -> Vec<RouteEntry> {
    [
        (Method::GET, "/"),
        (Method::GET, "/people"),
        (Method::GET, "/users"),
        (Method::POST, "/users"),
        (Method::GET, "/users/:userID"),
        (Method::PATCH, "/users/:userID"),
        (Method::DELETE, "/users/:userID"),
        (Method::GET, "/users/:userID/posts/:postID"),
        (Method::GET, "/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}"),
        (Method::GET, "/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}"),
    ]
    .into_iter()
    .map(|(method, path)| RouteEntry::new(method, path))
    .collect()
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = Router::new(route_table()).expect("route table compiles");
    c.bench_function("route_match", |b| {
        let test_paths = [
            (Method::GET, "/users"),
            (Method::GET, "/users/5f0c2d6e-6f4e-4c55-9a7e-2b8f8f1d0c11"),
            (Method::PATCH, "/users/5f0c2d6e-6f4e-4c55-9a7e-2b8f8f1d0c11"),
            (Method::GET, "/users/1/posts/2"),
            (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
            (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
            (Method::GET, "/missing/route"),
        ];
        b.iter(|| {
            for (method, path) in test_paths.iter() {
                let res = router.route(method.clone(), path);
                black_box(&res);
            }
        })
    });
}

fn bench_query_parse(c: &mut Criterion) {
    c.bench_function("query_parse", |b| {
        b.iter(|| {
            let params = parse_query_params(black_box("name=Alice%20Smith&limit=20&sort=desc"));
            black_box(&params);
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_query_parse);
criterion_main!(benches);
