use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tidy_uri::{
    normalize::{normalize, remove_dot_segments, NormalizeOptions},
    query, Uri,
};

criterion_group!(
    benches,
    bench_parse,
    bench_to_string,
    bench_normalize,
    bench_normalize_all,
    bench_remove_dot_segments,
    bench_query_sort,
);
criterion_main!(benches);

const PARSE_CASE: &str = "https://user@example.com/search?q=%E6%B5%8B%E8%AF%95#fragment";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Uri::parse(black_box(PARSE_CASE))));
}

fn bench_to_string(c: &mut Criterion) {
    let uri = Uri::parse(PARSE_CASE).unwrap();
    c.bench_function("to_string", |b| b.iter(|| black_box(&uri).to_string()));
}

const NORMALIZE_CASE: &str = "HTTP://www.Example.COM:80/a/./b/../c//%7euser/%c2%b1?z=1&y=2&x=3#top";

fn bench_normalize(c: &mut Criterion) {
    let uri = Uri::parse(NORMALIZE_CASE).unwrap();
    c.bench_function("normalize", |b| b.iter(|| black_box(&uri).normalize()));
}

fn bench_normalize_all(c: &mut Criterion) {
    let uri = Uri::parse(NORMALIZE_CASE).unwrap();
    let options = NormalizeOptions {
        force_https: true,
        remove_fragment: true,
        sort_query: true,
        trailing_slash: true,
        ..NormalizeOptions::default()
    };
    c.bench_function("normalize_all", |b| {
        b.iter(|| normalize(black_box(&uri), &options))
    });
}

const PATH_CASE: &str = "/a/b/c/./../../g/./h/../i/j/k/../../l/.";

fn bench_remove_dot_segments(c: &mut Criterion) {
    c.bench_function("remove_dot_segments", |b| {
        b.iter(|| remove_dot_segments(black_box(PATH_CASE)))
    });
}

const QUERY_CASE: &str = "zeta=1&eta=2&theta=3&alpha=a+b&beta=%E2%9C%93&gamma=&delta=x";

fn bench_query_sort(c: &mut Criterion) {
    c.bench_function("query_sort", |b| {
        b.iter(|| {
            let mut data = query::decode(black_box(QUERY_CASE));
            data.sort();
            query::encode(&data)
        })
    });
}
