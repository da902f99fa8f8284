//! Benchmark the listing pipeline over a 1000-item catalog.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use mc_catalog::{Catalog, ListCriteria, SqliteCatalogStore};
use mc_core::{MediaKind, NewMedia};
use mc_db::pool::init_memory_pool;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

fn setup(rt: &Runtime) -> Catalog {
    let pool = init_memory_pool().expect("pool");
    let catalog = Catalog::new(Arc::new(SqliteCatalogStore::new(pool)));
    let cancel = CancellationToken::new();

    rt.block_on(async {
        for i in 0..1000 {
            let draft = NewMedia {
                title: format!("Item {i:04}"),
                release_year: 1950 + (i % 70),
                kind: if i % 3 == 0 {
                    MediaKind::Series
                } else {
                    MediaKind::Movie
                },
                genre: Some("Drama".into()),
                rating: Some(f64::from(i % 11)),
                watched: i % 2 == 0,
            };
            catalog.add_media(draft, &cancel).await.expect("add");
        }
    });

    catalog
}

fn bench_list(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");
    let catalog = setup(&rt);
    let cancel = CancellationToken::new();

    let default_page = ListCriteria::default();
    c.bench_function("list_default_page", |b| {
        b.iter(|| rt.block_on(catalog.list_media(&default_page, &cancel)).unwrap())
    });

    let searched = ListCriteria {
        search: Some("item 0".into()),
        kind: Some(MediaKind::Movie),
        year_from: Some(1960),
        year_to: Some(2000),
        sort_by: Some("title".into()),
        ascending: false,
        ..Default::default()
    };
    c.bench_function("list_search_sort_title", |b| {
        b.iter(|| rt.block_on(catalog.list_media(&searched, &cancel)).unwrap())
    });

    let by_rating = ListCriteria {
        sort_by: Some("rating".into()),
        page: 5,
        page_size: 50,
        ..Default::default()
    };
    c.bench_function("list_sort_rating_page5", |b| {
        b.iter(|| rt.block_on(catalog.list_media(&by_rating, &cancel)).unwrap())
    });
}

criterion_group!(benches, bench_list);
criterion_main!(benches);
