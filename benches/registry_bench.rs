use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dock_plugin_host::flags::{classify, PluginFlags, Slot};
use dock_plugin_host::registry::{EmbedRegistry, PopupRegistry};
use dock_plugin_host::widget::WindowHandle;

/// Benchmark slot classification over every flag word of interest
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for (name, flags) in [
        ("quick", PluginFlags::TYPE_QUICK),
        ("tool", PluginFlags::TYPE_TOOL),
        ("unadapted", PluginFlags::UNADAPTED),
        ("all", PluginFlags::all()),
    ] {
        group.bench_function(name, |b| b.iter(|| classify(black_box(flags))));
    }

    group.finish();
}

/// Benchmark handle lookup in populated registries
fn bench_registry_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_get");

    for size in &[16u64, 128, 1024] {
        group.bench_with_input(BenchmarkId::new("embed", size), size, |b, &size| {
            let registry = EmbedRegistry::new();
            for id in 0..size {
                let wrapper = registry.get(WindowHandle(id));
                wrapper.set_item_key(&format!("item-{id}"));
                wrapper.set_slot(Slot::Tray);
            }

            b.iter(|| registry.get(black_box(WindowHandle(size / 2))));
        });

        group.bench_with_input(BenchmarkId::new("popup", size), size, |b, &size| {
            let registry = PopupRegistry::new();
            for id in 0..size {
                registry.get(WindowHandle(id));
            }

            b.iter(|| registry.get(black_box(WindowHandle(size / 2))));
        });
    }

    group.finish();
}

/// Benchmark the duplicate check done before every embedding
fn bench_registry_contains(c: &mut Criterion) {
    let registry = EmbedRegistry::new();
    for id in 0..256u64 {
        let wrapper = registry.get(WindowHandle(id));
        wrapper.set_item_key(&format!("item-{id}"));
        wrapper.set_slot(Slot::Quick);
    }

    c.bench_function("embed_contains_miss", |b| {
        b.iter(|| registry.contains(black_box("item-missing"), Slot::Quick))
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_registry_get,
    bench_registry_contains
);
criterion_main!(benches);
